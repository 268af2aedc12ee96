use serde::Deserialize;

/// Origin of the live KOBIS site
pub const DEFAULT_ORIGIN: &str = "https://www.kobis.or.kr";

/// Main configuration structure for Kobis-Scraper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Returns a default configuration pointed at another origin
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                origin: origin.into(),
            },
            ..Self::default()
        }
    }
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Scheme and host every endpoint path and image URL is prefixed with
    #[serde(default = "default_origin")]
    pub origin: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name sent in the User-Agent header
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Version sent in the User-Agent header
    #[serde(default = "default_agent_version")]
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            version: default_agent_version(),
        }
    }
}

/// HTTP client behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout (seconds)
    #[serde(default = "default_timeout_secs", rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(
        default = "default_connect_timeout_secs",
        rename = "connect-timeout-secs"
    )]
    pub connect_timeout_secs: u64,

    /// Extra attempts after a network-level failure. Zero disables retrying.
    #[serde(default, rename = "max-retries")]
    pub max_retries: u32,

    /// Fixed delay between attempts (milliseconds)
    #[serde(default = "default_retry_delay_ms", rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Detail popup cache configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    /// Maximum cached popups; 0 keeps every popup for the process lifetime
    #[serde(default, rename = "max-entries")]
    pub max_entries: usize,
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

fn default_agent_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_agent_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_retry_delay_ms() -> u64 {
    500
}
