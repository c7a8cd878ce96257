//! Logging utilities
//!
//! Provides logging setup for processes embedding the namespace layer.

use env_logger::Env;
use log::debug;

/// Setup logging; `RUST_LOG` wins over `default_level`.
///
/// Calling it again once a logger is installed has no effect.
pub fn setup_logging(default_level: &str) {
    let env = Env::default().default_filter_or(default_level);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        debug!("Logger already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_twice() {
        setup_logging("debug");
        setup_logging("info");
        log::info!("logger still usable");
    }
}
