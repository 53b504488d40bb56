//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: The frontier, visited list and failure log behind one owner
//! - `RoundPlan`: The jobs selected for a round from a snapshot of the state
//! - `resume_index`: Where a crawl continues from after a restart
//! - `UrlStatus`: Pending / visited / exhausted status of a frontier entry

mod crawl_state;
mod resume;
mod url_status;

// Re-export main types
pub use crawl_state::{CommitReport, CrawlState, Job, RoundPlan};
pub use resume::resume_index;
pub use url_status::UrlStatus;
