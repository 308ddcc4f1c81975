#[cfg(test)]
mod tests {
    use chrono::Duration;
    use std::path::PathBuf;
    use storehouse::libs::app::App;
    use storehouse::libs::config::{AuthConfig, Config, CONFIG_FILE_NAME};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Config file and data directory inside a fresh temporary directory.
    struct ConfigTestContext {
        temp_dir: TempDir,
        config_path: PathBuf,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
            ConfigTestContext { temp_dir, config_path }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_nonexistent_config(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.config_path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.auth_or_default(), AuthConfig { max_attempts: 3, lockout_minutes: 30 });
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read(ctx: &mut ConfigTestContext) {
        let config = Config {
            data_dir: Some(ctx.temp_dir.path().join("data")),
            auth: Some(AuthConfig {
                max_attempts: 5,
                lockout_minutes: 10,
            }),
        };
        config.save_to(&ctx.config_path).unwrap();

        assert_eq!(Config::read_from(&ctx.config_path).unwrap(), config);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_invalid_json_is_an_error(ctx: &mut ConfigTestContext) {
        std::fs::write(&ctx.config_path, "{ not json").unwrap();
        assert!(Config::read_from(&ctx.config_path).is_err());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_negative_lockout_is_an_error(ctx: &mut ConfigTestContext) {
        std::fs::write(&ctx.config_path, r#"{"auth":{"max_attempts":3,"lockout_minutes":-5}}"#).unwrap();
        assert!(Config::read_from(&ctx.config_path).is_err());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_app_follows_config(ctx: &mut ConfigTestContext) {
        let data_dir = ctx.temp_dir.path().join("nested").join("data");
        let config = Config {
            data_dir: Some(data_dir.clone()),
            auth: Some(AuthConfig {
                max_attempts: 2,
                lockout_minutes: 15,
            }),
        };

        let app = App::from_config(&config).unwrap();
        assert_eq!(app.data_dir(), data_dir.as_path());
        assert!(data_dir.join("users.csv").exists());
        assert_eq!(app.policy().max_attempts, 2);
        assert_eq!(app.policy().lockout, Duration::minutes(15));
    }
}
