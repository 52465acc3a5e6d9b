use serde::Deserialize;

/// Identification header sent with every fetch
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.87 Safari/537.36";

/// Main configuration structure for Site-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header value sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Number of crawl jobs that may run at the same time
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Optional cap on the number of pages fetched by one job
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u64>,

    /// Optional wall-clock budget for one job (seconds)
    #[serde(rename = "job-deadline", default)]
    pub job_deadline: Option<u64>,

    /// Order in which the frontier hands out URLs
    #[serde(rename = "frontier-order", default)]
    pub frontier_order: FrontierOrder,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            workers: default_workers(),
            request_timeout: default_request_timeout(),
            max_pages: None,
            job_deadline: None,
            frontier_order: FrontierOrder::default(),
        }
    }
}

/// Frontier pop order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontierOrder {
    /// Push and pop from the same end (depth-leaning)
    #[default]
    Lifo,
    /// Pop from the opposite end (breadth-first)
    Fifo,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory for extracted text and external-link files
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_workers() -> u32 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_data_dir() -> String {
    "data".to_string()
}
