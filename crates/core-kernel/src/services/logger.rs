use log::Level;

/// Severity-named logging interface handed to providers.
///
/// The eight levels collapse onto the five `log` levels: everything above
/// `error` logs as [`Level::Error`], `notice` logs as [`Level::Info`].
pub trait Logger: Send + Sync {
    fn emergency(&self, message: &str);
    fn alert(&self, message: &str);
    fn critical(&self, message: &str);
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
    fn notice(&self, message: &str);
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
}

/// Logger driver forwarding to the `log` facade under a fixed target
#[derive(Debug, Clone)]
pub struct LogFacadeLogger {
    target: String,
}

impl LogFacadeLogger {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    fn emit(&self, level: Level, label: &str, message: &str) {
        log::log!(target: self.target.as_str(), level, "[{}] {}", label, message);
    }
}

impl Default for LogFacadeLogger {
    fn default() -> Self {
        Self::new(crate::kernel::constants::APP_NAME)
    }
}

impl Logger for LogFacadeLogger {
    fn emergency(&self, message: &str) {
        self.emit(Level::Error, "emergency", message);
    }

    fn alert(&self, message: &str) {
        self.emit(Level::Error, "alert", message);
    }

    fn critical(&self, message: &str) {
        self.emit(Level::Error, "critical", message);
    }

    fn error(&self, message: &str) {
        self.emit(Level::Error, "error", message);
    }

    fn warning(&self, message: &str) {
        self.emit(Level::Warn, "warning", message);
    }

    fn notice(&self, message: &str) {
        self.emit(Level::Info, "notice", message);
    }

    fn info(&self, message: &str) {
        self.emit(Level::Info, "info", message);
    }

    fn debug(&self, message: &str) {
        self.emit(Level::Debug, "debug", message);
    }
}
