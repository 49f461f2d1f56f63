use rust_decimal::Decimal;
use serde::Deserialize;
use skyport_shared::Masked;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub fares: FareConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// Bearer token issued by the backend's login endpoint.
    #[serde(default)]
    pub token: Option<Masked<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FareConfig {
    /// Per-seat fare for bookings whose route cannot be resolved.
    pub fallback_fare: Decimal,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with_env(None)
    }

    /// Like [`Config::load`], but reads `SKYPORT__*` variables from `vars`
    /// instead of the process environment when given.
    pub fn load_with_env(
        vars: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .set_default("backend.base_url", "http://localhost:5000/api")?
            .set_default("backend.timeout_seconds", 10_i64)?
            .set_default("fares.fallback_fare", 2500_i64)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `SKYPORT__BACKEND__BASE_URL=https://api.example.com/api`
            .add_source(
                config::Environment::with_prefix("SKYPORT")
                    .separator("__")
                    .try_parsing(true)
                    .source(vars),
            )
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::load_with_env(Some(vars(&[]))).unwrap();
        assert_eq!(config.backend.timeout(), Duration::from_secs(10));
        assert_eq!(config.fares.fallback_fare, dec!(2500));
        assert!(config.session.token.is_none());
    }

    #[test]
    fn test_environment_overrides() {
        let config = Config::load_with_env(Some(vars(&[
            ("SKYPORT__BACKEND__BASE_URL", "https://api.example.com/api"),
            ("SKYPORT__FARES__FALLBACK_FARE", "3100"),
            ("SKYPORT__SESSION__TOKEN", "abc.def.ghi"),
        ])))
        .unwrap();

        assert_eq!(config.backend.base_url, "https://api.example.com/api");
        assert_eq!(config.fares.fallback_fare, dec!(3100));
        assert_eq!(
            config.session.token.as_ref().map(|t| t.expose().as_str()),
            Some("abc.def.ghi")
        );
        assert!(!format!("{:?}", config).contains("abc.def.ghi"));
    }
}
