use std::path::PathBuf;

use crate::sites::SupportedSites;

#[derive(Clone)]
pub struct AppConfig {
    /// Origin the layer runs under, e.g. `"http://localhost:5000"`.
    pub origin: String,
    /// Base URL of the remote parser. Relative values resolve against `origin`.
    pub api_url: String,
    pub data_dir: PathBuf,
    /// Key prefix for the cache; empty means the whole store is ours.
    pub cache_namespace: String,
    pub supported_sites: SupportedSites,
    pub history_limit: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
}

impl AppConfig {
    /// Effective base URL of the remote parser, without a trailing slash.
    #[must_use]
    pub fn api_base_url(&self) -> String {
        let api_url = self.api_url.trim_end_matches('/');
        if api_url.contains("://") {
            api_url.to_string()
        } else {
            format!(
                "{}/{}",
                self.origin.trim_end_matches('/'),
                api_url.trim_start_matches('/')
            )
            .trim_end_matches('/')
            .to_string()
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("origin", &self.origin)
            .field("api_url", &self.api_url)
            .field("data_dir", &self.data_dir)
            .field("cache_namespace", &self.cache_namespace)
            .field(
                "supported_sites",
                &self
                    .supported_sites
                    .rules()
                    .iter()
                    .map(|r| r.tag.as_str())
                    .collect::<Vec<_>>(),
            )
            .field("history_limit", &self.history_limit)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("log_level", &self.log_level)
            .finish()
    }
}
