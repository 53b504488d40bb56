use crate::{UrlError, UrlResult};
use url::Url;

/// The crawl scope: every URL the mirror downloads starts with this prefix
///
/// Scope checks are plain string prefix tests on the base URL exactly as
/// configured; no further normalization is applied, so two URLs are the same
/// page only if they are byte-identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    prefix: String,
    scheme: String,
}

impl Scope {
    /// Creates a scope from the configured base URL
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_mirror::url::Scope;
    ///
    /// let scope = Scope::new("https://x.com/").unwrap();
    /// assert_eq!(scope.resolve("/a/b"), Some("https://x.com/a/b".to_string()));
    /// assert_eq!(scope.resolve("https://other.com/"), None);
    /// ```
    pub fn new(base_url: &str) -> UrlResult<Self> {
        let prefix = base_url.trim();
        let parsed = Url::parse(prefix).map_err(|e| UrlError::Parse(e.to_string()))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(UrlError::InvalidScheme(parsed.scheme().to_string()));
        }

        Ok(Self {
            prefix: prefix.to_string(),
            scheme: parsed.scheme().to_string(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if the URL falls under the scope prefix
    pub fn contains(&self, url: &str) -> bool {
        url.starts_with(&self.prefix)
    }

    /// Rewrites a link target to absolute form and keeps it if in scope
    ///
    /// # Rules
    ///
    /// 1. Surrounding whitespace is trimmed
    /// 2. `//host/path` takes the scope's scheme (a host must follow the `//`)
    /// 3. `/path` is joined onto the prefix with exactly one `/`
    /// 4. Anything else is used as written
    /// 5. The result is kept only if it starts with the prefix
    ///
    /// Targets with control characters (line breaks inside an attribute) are
    /// dropped; they cannot be stored one per line.
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.chars().any(char::is_control) {
            return None;
        }

        let host_relative = href.strip_prefix("//").filter(|rest| !rest.starts_with('/'));

        let absolute = if let Some(rest) = host_relative {
            format!("{}://{}", self.scheme, rest)
        } else if href.starts_with('/') {
            format!(
                "{}/{}",
                self.prefix.trim_end_matches('/'),
                href.trim_start_matches('/')
            )
        } else {
            href.to_string()
        };

        if self.contains(&absolute) {
            Some(absolute)
        } else {
            None
        }
    }
}
