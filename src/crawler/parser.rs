//! HTML link extraction
//!
//! Parses a downloaded page and returns the in-scope link targets it carries.
//! html5ever recovers from malformed markup, so any byte sequence yields a
//! document; only building the selector can fail.

use crate::url::Scope;
use crate::MirrorError;
use scraper::{Html, Selector};

/// Extracts in-scope links from HTML documents
pub struct LinkExtractor {
    scope: Scope,
    anchors: Selector,
}

impl LinkExtractor {
    pub fn new(scope: Scope) -> Result<Self, MirrorError> {
        let anchors = Selector::parse("a[href]").map_err(|e| MirrorError::HtmlParse {
            message: format!("invalid anchor selector: {:?}", e),
        })?;

        Ok(Self { scope, anchors })
    }

    /// Returns every in-scope `<a href>` target in document order
    ///
    /// Path-absolute targets are rewritten onto the scope prefix (see
    /// [`Scope::resolve`]). Duplicates are kept; the frontier deduplicates.
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_mirror::crawler::LinkExtractor;
    /// use sumi_mirror::url::Scope;
    ///
    /// let extractor = LinkExtractor::new(Scope::new("https://x.com/").unwrap()).unwrap();
    /// let links = extractor.extract(r#"<a href="/a">A</a><a href="https://other.com/">B</a>"#);
    /// assert_eq!(links, vec!["https://x.com/a".to_string()]);
    /// ```
    pub fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);

        document
            .select(&self.anchors)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| self.scope.resolve(href))
            .collect()
    }

    /// Like [`LinkExtractor::extract`], decoding the body as UTF-8 (lossily)
    pub fn extract_bytes(&self, body: &[u8]) -> Vec<String> {
        self.extract(&String::from_utf8_lossy(body))
    }
}
