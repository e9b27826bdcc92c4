use std::net::SocketAddr;

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub user_agent: String,
    pub accept_language: String,
    pub max_workers: usize,
    pub default_max_results: usize,
    pub search_timeout_secs: u64,
    pub detail_timeout_secs: u64,
    pub registry_timeout_secs: u64,
    pub registry_base_url: String,
    pub registry_api_key: Option<String>,
    pub session_ttl_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("user_agent", &self.user_agent)
            .field("accept_language", &self.accept_language)
            .field("max_workers", &self.max_workers)
            .field("default_max_results", &self.default_max_results)
            .field("search_timeout_secs", &self.search_timeout_secs)
            .field("detail_timeout_secs", &self.detail_timeout_secs)
            .field("registry_timeout_secs", &self.registry_timeout_secs)
            .field("registry_base_url", &self.registry_base_url)
            .field(
                "registry_api_key",
                &self.registry_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("session_ttl_secs", &self.session_ttl_secs)
            .finish()
    }
}
