//! # Tracker configuration
//!
//! [`TrackerConfig`] gathers the few settings the tracker needs at startup. Defaults are built
//! in; a TOML file can override any subset of them:
//!
//! ```toml
//! feed_url = "https://nasa-public-data.s3.amazonaws.com/iss-coords/current/ISS_OEM/ISS.OEM_J2K_EPH.xml"
//! # read the feed from disk instead of the network
//! feed_path = "ISS.OEM_J2K_EPH.xml"
//! # omit to disable reverse geocoding
//! geocoder_url = "https://nominatim.openstreetmap.org/reverse"
//! user_agent = "iss_tracker/0.1"
//! http_timeout_secs = 10
//! ```
//!
//! Command-line flags of the `iss_tracker` binary are applied on top of the file.
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::{
    constants::{ISS_OEM_URL, NOMINATIM_REVERSE_URL},
    tracker_errors::TrackerError,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    pub feed_url: String,
    pub feed_path: Option<Utf8PathBuf>,
    pub geocoder_url: Option<String>,
    pub user_agent: String,
    pub http_timeout_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            feed_url: ISS_OEM_URL.to_string(),
            feed_path: None,
            geocoder_url: Some(NOMINATIM_REVERSE_URL.to_string()),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            http_timeout_secs: 10,
        }
    }
}

impl TrackerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, TrackerError> {
        let config: TrackerConfig = toml::from_str(text)?;
        if config.http_timeout_secs == 0 {
            return Err(TrackerError::InvalidConfig(
                "http_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(config)
    }

    /// Read a configuration file.
    ///
    /// Arguments
    /// ---------
    /// * `path`: a TOML file, keys missing from it keep their default value
    pub fn load(path: &Utf8Path) -> Result<Self, TrackerError> {
        let text = std::fs::read_to_string(path)?;
        TrackerConfig::from_toml_str(&text)
    }
}

#[cfg(test)]
mod config_test {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();
        assert_eq!(config.feed_url, ISS_OEM_URL);
        assert_eq!(config.feed_path, None);
        assert_eq!(config.geocoder_url.as_deref(), Some(NOMINATIM_REVERSE_URL));
        assert!(config.user_agent.starts_with("iss_tracker/"));
        assert_eq!(TrackerConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_partial_override() {
        let config = TrackerConfig::from_toml_str(
            r#"
feed_path = "tests/data/iss_sample.xml"
http_timeout_secs = 3
"#,
        )
        .unwrap();
        assert_eq!(
            config.feed_path,
            Some(Utf8PathBuf::from("tests/data/iss_sample.xml"))
        );
        assert_eq!(config.http_timeout_secs, 3);
        assert_eq!(config.feed_url, ISS_OEM_URL);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            TrackerConfig::from_toml_str("http_timeout_secs = 0"),
            Err(TrackerError::InvalidConfig(_))
        ));
        assert!(matches!(
            TrackerConfig::from_toml_str("unknown_key = true"),
            Err(TrackerError::InvalidConfig(_))
        ));
        assert!(matches!(
            TrackerConfig::load(Utf8Path::new("does/not/exist.toml")),
            Err(TrackerError::IoError(_))
        ));
    }
}
