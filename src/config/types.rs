use serde::Deserialize;
use std::path::PathBuf;

/// User agent sent by default, the browser string the mirror has always used
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 OPR/106.0.0.0";

/// Main configuration structure for Sumi-Mirror
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// The site being mirrored
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Crawl scope prefix; also the seed URL
    #[serde(rename = "base-url")]
    pub base_url: String,
}

/// Where crawl state and downloaded pages live on disk
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Folder holding every other storage path
    #[serde(rename = "project-folder")]
    pub project_folder: String,

    /// Line file of every discovered URL
    #[serde(rename = "frontier-file")]
    pub frontier_file: String,

    /// Line file of every URL whose crawl completed
    #[serde(rename = "visited-file")]
    pub visited_file: String,

    /// Line file with one entry per failed fetch attempt
    #[serde(rename = "failed-file", default = "default_failed_file")]
    pub failed_file: String,

    /// Folder receiving one `<index>.html` per downloaded page
    #[serde(rename = "artifact-folder")]
    pub artifact_folder: String,
}

impl StorageConfig {
    pub fn project_path(&self) -> PathBuf {
        PathBuf::from(&self.project_folder)
    }

    pub fn frontier_path(&self) -> PathBuf {
        self.project_path().join(&self.frontier_file)
    }

    pub fn visited_path(&self) -> PathBuf {
        self.project_path().join(&self.visited_file)
    }

    pub fn failed_path(&self) -> PathBuf {
        self.project_path().join(&self.failed_file)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.project_path().join(&self.artifact_folder)
    }
}

/// How the start of a round is chosen after a restart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResumeMode {
    /// Every frontier entry not yet visited, tracked by index
    #[default]
    Pending,

    /// Everything after the frontier position of the last visited URL
    LastVisited,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent workers per round
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Pause between rounds (milliseconds)
    #[serde(rename = "round-pause-ms", default = "default_round_pause_ms")]
    pub round_pause_ms: u64,

    /// Redirect hops followed before a fetch fails
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: u32,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Failed attempts after which a URL is given up on; unbounded when unset
    #[serde(rename = "max-attempts", default)]
    pub max_attempts: Option<u32>,

    /// Stop after this many rounds even if pages remain
    #[serde(rename = "max-rounds", default)]
    pub max_rounds: Option<u32>,

    /// `pending` (default) dispatches every unvisited entry; `last-visited`
    /// restarts after the last visited URL, the classic resume behavior
    #[serde(rename = "resume-mode", default)]
    pub resume_mode: ResumeMode,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            round_pause_ms: default_round_pause_ms(),
            max_redirects: default_max_redirects(),
            request_timeout_secs: default_request_timeout_secs(),
            max_attempts: None,
            max_rounds: None,
            resume_mode: ResumeMode::default(),
        }
    }
}

/// Identifying header configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Value of the `User-Agent` header sent with every request
    #[serde(default = "default_user_agent")]
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: default_user_agent(),
        }
    }
}

fn default_failed_file() -> String {
    "failed_urls.txt".to_string()
}

fn default_workers() -> u32 {
    10
}

fn default_round_pause_ms() -> u64 {
    1000
}

fn default_max_redirects() -> u32 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
