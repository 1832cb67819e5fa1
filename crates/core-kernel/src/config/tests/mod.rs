// Configuration test module
#[cfg(test)]
mod repository_tests;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::config::KernelConfig;

    #[test]
    fn test_kernel_config_defaults_loader_to_local() {
        let config: KernelConfig = serde_json::from_value(json!({
            "env": "production",
            "token": "ark",
            "network": "testnet",
            "version": "0"
        }))
        .unwrap();

        assert_eq!(config.config_loader, "local");
        assert_eq!(config.options, serde_json::Value::Null);
        assert_eq!(config, KernelConfig::new("production", "ark", "testnet", "0"));
    }

    #[test]
    fn test_kernel_config_reads_camel_case_loader() {
        let config: KernelConfig = serde_json::from_value(json!({
            "token": "ark",
            "network": "devnet",
            "configLoader": "remote",
            "options": { "url": "http://localhost" }
        }))
        .unwrap();

        assert_eq!(config.config_loader, "remote");
        assert_eq!(config.options["url"], "http://localhost");
        assert_eq!(config.env, "");
    }

    #[test]
    fn test_kernel_config_seed_tree() {
        let seed = KernelConfig::new("development", "ark", "devnet", "1.2.3").to_value();
        assert_eq!(seed["token"], "ark");
        assert_eq!(seed["configLoader"], "local");
    }
}
