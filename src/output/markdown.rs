//! Markdown summary generation
//!
//! This module generates a human-readable markdown report of a mirror's
//! progress, including counts, pending URLs and URLs that were given up on.

use crate::output::stats::CrawlStatistics;
use chrono::Utc;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Writes a markdown summary of the crawl statistics
///
/// # Arguments
///
/// * `stats` - Statistics loaded from the stores
/// * `base_url` - The mirrored site
/// * `config_hash` - SHA-256 of the configuration file
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_summary(
    stats: &CrawlStatistics,
    base_url: &str,
    config_hash: &str,
    output_path: &Path,
) -> io::Result<()> {
    let markdown = format_markdown_summary(stats, base_url, config_hash);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats crawl statistics as markdown
pub fn format_markdown_summary(stats: &CrawlStatistics, base_url: &str, config_hash: &str) -> String {
    let mut md = String::new();

    md.push_str("# Sumi-Mirror Crawl Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Site**: {}\n", base_url));
    md.push_str(&format!(
        "- **Generated**: {}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("- **Config Hash**: {}\n\n", config_hash));

    md.push_str("## Progress\n\n");
    md.push_str("| Measure | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Discovered | {} |\n", stats.total));
    md.push_str(&format!("| Visited | {} |\n", stats.visited));
    md.push_str(&format!("| Pending | {} |\n", stats.pending));
    md.push_str(&format!("| Out of attempts | {} |\n", stats.exhausted));
    md.push_str(&format!("| Failed attempts | {} |\n", stats.failed_attempts));
    md.push_str(&format!("| Pages saved | {} |\n\n", stats.artifacts));
    md.push_str(&format!(
        "**Completion**: {:.2}% (resume index {})\n\n",
        stats.completion(),
        stats.resume_index
    ));

    if !stats.pending_urls.is_empty() {
        md.push_str("## Pending URLs\n\n");
        for url in stats.pending_urls.iter().take(100) {
            md.push_str(&format!("- {}\n", url));
        }
        if stats.pending_urls.len() > 100 {
            md.push_str(&format!(
                "\n... and {} more\n",
                stats.pending_urls.len() - 100
            ));
        }
        md.push('\n');
    }

    if !stats.exhausted_urls.is_empty() {
        md.push_str("## Out of Attempts\n\n");
        for url in &stats.exhausted_urls {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    md.push_str("---\n\n");
    md.push_str("*Generated by Sumi-Mirror*\n");

    md
}
