//! Tests for configuration loading and validation (src/config.rs).

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use crate::config::{WatchConfig, ENV_API_TOKEN, ENV_WEBHOOK_URL};

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    /// A configuration that passes validation.
    fn valid_config() -> WatchConfig {
        let mut config = WatchConfig::default();
        config.store.base_url = "https://api.pages.example/v1".to_string();
        config.store.token = "secret".to_string();
        config.store.database_id = "db-1".to_string();
        config.webhook.url = "https://hooks.example/abc".to_string();
        config
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
            [store]
            base_url = "https://api.pages.example/v1"
            token = "tok"
            database_id = "db-1"
            request_timeout_secs = 5

            [webhook]
            url = "https://hooks.example/abc"
            username = "watcher"

            [poll]
            interval_secs = 30
            quiet_period_secs = 300
            "#,
        );

        let config = WatchConfig::load(file.path()).unwrap();

        assert_eq!(config.store.database_id, "db-1");
        assert_eq!(config.store.request_timeout_secs, 5);
        assert_eq!(config.webhook.username, "watcher");
        assert_eq!(config.poll.interval_secs, 30);
        assert_eq!(config.poll.quiet_period_secs, 300);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let file = write_config(
            r#"
            [store]
            base_url = "https://api.pages.example/v1"
            "#,
        );

        let config = WatchConfig::load(file.path()).unwrap();

        assert_eq!(config.store.request_timeout_secs, 10);
        assert_eq!(config.webhook.username, "pagewatch");
        assert_eq!(config.poll.interval_secs, 60);
        assert_eq!(config.poll.quiet_period_secs, 120);
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(WatchConfig::load(std::path::Path::new("/nonexistent/pagewatch.toml")).is_err());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let file = write_config("not [valid toml");
        assert!(WatchConfig::load(file.path()).is_err());
    }

    // -----------------------------------------------------------------------
    // Environment overrides
    // -----------------------------------------------------------------------

    #[test]
    fn test_env_overrides_replace_secrets() {
        let mut config = valid_config();

        config.override_from(|name| match name {
            n if n == ENV_API_TOKEN => Some("env-token".to_string()),
            n if n == ENV_WEBHOOK_URL => Some("https://hooks.example/env".to_string()),
            _ => None,
        });

        assert_eq!(config.store.token, "env-token");
        assert_eq!(config.webhook.url, "https://hooks.example/env");
    }

    #[test]
    fn test_absent_env_vars_leave_file_values() {
        let mut config = valid_config();

        config.override_from(|_| None);

        assert_eq!(config.store.token, "secret");
        assert_eq!(config.webhook.url, "https://hooks.example/abc");
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_token_rejected() {
        let mut config = valid_config();
        config.store.token = String::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_database_id_rejected() {
        let mut config = valid_config();
        config.store.database_id = String::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_webhook_url_rejected() {
        let mut config = valid_config();
        config.webhook.url = String::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = valid_config();
        config.poll.interval_secs = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_quiet_period_allowed() {
        let mut config = valid_config();
        config.poll.quiet_period_secs = 0;

        // Quiet period zero just means "flush changes immediately".
        assert!(config.validate().is_ok());
    }
}
