/// Computes the frontier index a crawl continues from after a restart
///
/// Completion is recorded by value, so the position is recovered by looking up
/// the most recently visited URL in the frontier and continuing right after
/// it. This assumes the visited list covers a contiguous frontier prefix;
/// when workers finish out of order that assumption can fail and entries
/// before the returned index may still be unvisited.
///
/// # Returns
///
/// * `0` - Nothing has been visited yet
/// * `i + 1` - The last visited URL sits at frontier position `i`
/// * `frontier.len()` - The last visited URL is the final frontier entry, or
///   is not in the frontier at all (nothing pending)
///
/// # Examples
///
/// ```
/// use sumi_mirror::state::resume_index;
///
/// let frontier = vec!["https://x.com/".to_string(), "https://x.com/a".to_string()];
/// let visited = vec!["https://x.com/".to_string()];
/// assert_eq!(resume_index(&frontier, &visited), 1);
/// ```
pub fn resume_index(frontier: &[String], visited: &[String]) -> usize {
    let Some(last) = visited.last() else {
        return 0;
    };

    match frontier.iter().position(|url| url == last) {
        Some(i) if i + 1 < frontier.len() => i + 1,
        _ => frontier.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(paths: &[&str]) -> Vec<String> {
        paths
            .iter()
            .map(|p| format!("https://x.com/{}", p))
            .collect()
    }

    #[test]
    fn test_empty_visited_starts_at_zero() {
        assert_eq!(resume_index(&urls(&["", "a"]), &[]), 0);
        assert_eq!(resume_index(&[], &[]), 0);
    }

    #[test]
    fn test_resumes_after_last_visited() {
        let frontier = urls(&["", "a", "b"]);

        assert_eq!(resume_index(&frontier, &urls(&[""])), 1);
        assert_eq!(resume_index(&frontier, &urls(&["", "a"])), 2);
    }

    #[test]
    fn test_last_visited_at_end_means_nothing_pending() {
        let frontier = urls(&["", "a", "b"]);
        assert_eq!(resume_index(&frontier, &urls(&["", "a", "b"])), 3);
    }

    #[test]
    fn test_unknown_last_visited_means_nothing_pending() {
        let frontier = urls(&["", "a"]);
        assert_eq!(resume_index(&frontier, &urls(&["", "elsewhere"])), 2);
    }

    #[test]
    fn test_only_last_visited_entry_matters() {
        // Out-of-order completion: "b" finished after "a" was skipped
        let frontier = urls(&["", "a", "b", "c"]);
        assert_eq!(resume_index(&frontier, &urls(&["", "b"])), 3);
    }
}
