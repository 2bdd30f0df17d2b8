// Logging Tests

#[cfg(test)]
mod tests {
    use crate::logging::*;

    mod log_level_tests {
        use super::*;

        #[test]
        fn should_order_levels() {
            assert!(LogLevel::Debug < LogLevel::Info);
            assert!(LogLevel::Info < LogLevel::Warn);
            assert!(LogLevel::Warn < LogLevel::Error);
        }

        #[test]
        fn should_default_to_warn() {
            assert_eq!(LogLevel::default(), LogLevel::Warn);
        }

        #[test]
        fn should_deserialize_lowercase_names() {
            let level: LogLevel = serde_json::from_str("\"debug\"").unwrap();
            assert_eq!(level, LogLevel::Debug);
            assert!(serde_json::from_str::<LogLevel>("\"Verbose\"").is_err());
        }
    }

    mod console_logger_tests {
        use super::*;

        #[test]
        fn should_check_level_enabled() {
            let logger = ConsoleLogger::new(LogLevel::Info);

            assert!(!logger.is_enabled(LogLevel::Debug));
            assert!(logger.is_enabled(LogLevel::Info));
            assert!(logger.is_enabled(LogLevel::Error));
        }
    }

    mod null_logger_tests {
        use super::*;

        #[test]
        fn should_only_report_error_level() {
            let logger = NullLogger::new();
            assert_eq!(logger.level(), LogLevel::Error);
            logger.debug("ignored");
            logger.error("ignored");
        }
    }
}
