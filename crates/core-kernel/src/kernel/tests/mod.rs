// Kernel test module
#[cfg(test)]
mod bootstrap_tests;
#[cfg(test)]
mod namespace_tests;
