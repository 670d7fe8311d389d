//! Logging helpers

/// Initialize the logger
///
/// `RUST_LOG` wins over `level` when it is set.
///
/// # Parameters
///
/// * `level` - Fallback log level (error, warn, info, debug, trace)
pub fn init_logger(level: &str) {
    let env = env_logger::Env::default()
        .filter_or("RUST_LOG", level);

    // A second initialisation (tests, embedding applications) is not an error.
    let _ = env_logger::Builder::from_env(env).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_twice() {
        init_logger("debug");
        init_logger("info");
        log::debug!("logger initialised");
    }
}
