// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants and Display formatting
// ═══════════════════════════════════════════════════════════════════

use portfolio_tracker_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            operation: "fetch portfolio".into(),
            message: "service unavailable".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error (fetch portfolio): service unavailable"
        );
    }

    #[test]
    fn api_error_empty_message() {
        let err = CoreError::Api {
            operation: "fetch metrics".into(),
            message: String::new(),
        };
        assert_eq!(err.to_string(), "API error (fetch metrics): ");
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn validation() {
        let err = CoreError::Validation("quantity must be a positive number, got -3".into());
        assert_eq!(
            err.to_string(),
            "Validation failed: quantity must be a positive number, got -3"
        );
    }

    #[test]
    fn config() {
        let err = CoreError::Config("api_base_url must not be empty".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: api_base_url must not be empty"
        );
    }
}

// ── Trait conformance ───────────────────────────────────────────────

mod traits {
    use super::*;

    #[test]
    fn is_a_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(CoreError::Network("timeout".into()));
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn debug_formatting_names_the_variant() {
        let err = CoreError::Validation("bad input".into());
        assert!(format!("{err:?}").contains("Validation"));
    }
}
