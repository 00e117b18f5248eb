use std::{env, path::PathBuf};

pub const DEFAULT_STORAGE_BUCKET: &str = "academy-assets";
pub const DEFAULT_CACHE_PREFIX: &str = "talons";

/// Connection settings for the remote record service.
///
/// Missing settings are a supported mode, not an error: [`RemoteConfig::is_configured`] simply returns false
/// and everything runs against the local cache.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct RemoteConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    #[serde(default = "default_bucket")]
    pub storage_bucket: String,
}

fn default_bucket() -> String {
    DEFAULT_STORAGE_BUCKET.to_string()
}

impl RemoteConfig {
    pub fn new(supabase_url: impl Into<String>, supabase_anon_key: impl Into<String>) -> Self {
        Self {
            supabase_url: supabase_url.into().trim().to_string(),
            supabase_anon_key: supabase_anon_key.into().trim().to_string(),
            storage_bucket: default_bucket(),
        }
    }

    /// Reads `SUPABASE_URL`, `SUPABASE_ANON_KEY` and optionally `SUPABASE_STORAGE_BUCKET`,
    /// loading a `.env` file first if there is one.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            log::info!("No .env file loaded: {e}");
        }

        let read = |key: &str| {
            env::var(key).unwrap_or_else(|_| {
                log::info!("{key} not set, remote record service stays disabled");
                String::new()
            })
        };

        let mut config = Self::new(read("SUPABASE_URL"), read("SUPABASE_ANON_KEY"));
        if let Ok(bucket) = env::var("SUPABASE_STORAGE_BUCKET") {
            let bucket = bucket.trim();
            if !bucket.is_empty() {
                config.storage_bucket = bucket.to_string();
            }
        }
        config
    }

    /// Presence and shape check only. Never touches the network.
    pub fn is_configured(&self) -> bool {
        let url = self.supabase_url.as_str();
        let key = self.supabase_anon_key.as_str();

        if url.contains(char::is_whitespace) || key.contains(char::is_whitespace) {
            log::error!("Remote config contains whitespace, check SUPABASE_URL and SUPABASE_ANON_KEY");
            return false;
        }

        url.len() > "https://".len()
            && url.starts_with("https://")
            && !url.contains("placeholder")
            && !key.is_empty()
    }

    pub(crate) fn base_url(&self) -> &str {
        self.supabase_url.trim_end_matches('/')
    }
}

/// Where the durable local cache lives and how its keys are namespaced.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CacheConfig {
    pub directory: PathBuf,
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    DEFAULT_CACHE_PREFIX.to_string()
}

impl CacheConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            prefix: default_prefix(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_requires_https_and_key() {
        assert!(RemoteConfig::new("https://abc.supabase.co", "anon").is_configured());
        assert!(!RemoteConfig::new("http://abc.supabase.co", "anon").is_configured());
        assert!(!RemoteConfig::new("https://abc.supabase.co", "").is_configured());
        assert!(!RemoteConfig::new("", "anon").is_configured());
        assert!(!RemoteConfig::new("https://", "anon").is_configured());
        assert!(!RemoteConfig::default().is_configured());
    }

    #[test]
    fn test_placeholder_and_whitespace_are_rejected() {
        assert!(!RemoteConfig::new("https://placeholder.supabase.co", "anon").is_configured());

        let mut config = RemoteConfig::new("https://abc.supabase.co", "anon");
        config.supabase_anon_key = "an on".to_string();
        assert!(!config.is_configured());
    }

    #[test]
    fn test_new_trims_values() {
        let config = RemoteConfig::new("  https://abc.supabase.co/ \n", " key ");
        assert_eq!(config.supabase_url, "https://abc.supabase.co/");
        assert_eq!(config.supabase_anon_key, "key");
        assert_eq!(config.base_url(), "https://abc.supabase.co");
        assert!(config.is_configured());
    }
}
