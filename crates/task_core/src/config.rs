use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::paths;

/// Connection settings for the hosted backend.
///
/// Values are resolved from `{app_data_dir}/config.json`, then a local
/// `config.toml`, with `SUPABASE_URL` / `SUPABASE_ANON_KEY` environment
/// variables overriding either. Missing values are not validated here; they
/// surface as remote-call failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub supabase_url: String,
    #[serde(default)]
    pub supabase_anon_key: String,
}

const CONFIG_FILE_PATH: &str = "config.toml";

fn config_json_path() -> PathBuf {
    paths::app_data_dir().join("config.json")
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        let mut config = Config {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
        };

        let mut loaded = false;
        let json_path = config_json_path();
        if json_path.exists() {
            if let Ok(content) = std::fs::read_to_string(&json_path) {
                if let Ok(file_config) = serde_json::from_str::<Config>(&content) {
                    config = file_config;
                    loaded = true;
                }
            }
        }

        if !loaded && std::path::Path::new(CONFIG_FILE_PATH).exists() {
            if let Ok(content) = std::fs::read_to_string(CONFIG_FILE_PATH) {
                if let Ok(file_config) = toml::from_str::<Config>(&content) {
                    config = file_config;
                }
            }
        }

        if let Ok(url) = std::env::var("SUPABASE_URL") {
            config.supabase_url = url;
        }
        if let Ok(key) = std::env::var("SUPABASE_ANON_KEY") {
            config.supabase_anon_key = key;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_files_parse_with_defaults() {
        let config: Config = toml::from_str(r#"supabase_url = "https://proj.supabase.co""#)
            .expect("partial config");

        assert_eq!(config.supabase_url, "https://proj.supabase.co");
        assert!(config.supabase_anon_key.is_empty());
    }

    #[test]
    fn json_config_round_trip() {
        let config = Config {
            supabase_url: "https://proj.supabase.co".to_string(),
            supabase_anon_key: "anon-key".to_string(),
        };
        let serialized = serde_json::to_string(&config).expect("serialize");
        let loaded: Config = serde_json::from_str(&serialized).expect("deserialize");

        assert_eq!(loaded.supabase_url, config.supabase_url);
        assert_eq!(loaded.supabase_anon_key, config.supabase_anon_key);
    }
}
