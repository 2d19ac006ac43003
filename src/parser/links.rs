//! Media link extraction from Nitter listing pages.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, trace};
use url::Url;

/// Path prefix of Nitter's media proxy endpoints.
pub const MEDIA_PATH_PREFIX: &str = "/pic/";

/// Query parameter selecting the image variant.
pub const QUALITY_PARAM: &str = "name";

/// Value of [`QUALITY_PARAM`] requesting the full-resolution original.
pub const ORIGINAL_QUALITY: &str = "orig";

/// Anchors pointing at the media proxy.
#[allow(clippy::expect_used)]
static MEDIA_ANCHOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!(r#"a[href^="{MEDIA_PATH_PREFIX}"]"#))
        .expect("media anchor selector is valid") // Static pattern, safe to panic
});

/// Turns listing-page markup into absolute, original-quality media URLs.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    base: Url,
}

impl LinkExtractor {
    /// Creates an extractor resolving relative links against `base` (the instance URL).
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Returns media URLs in document order; duplicates are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use nitter_dl::parser::LinkExtractor;
    /// use url::Url;
    ///
    /// let extractor = LinkExtractor::new(Url::parse("https://nitter.net").unwrap());
    /// let links = extractor.extract(r#"<a href="/pic/media%2Fxyz.jpg">photo</a>"#);
    /// assert_eq!(links, vec!["https://nitter.net/pic/media%2Fxyz.jpg?name=orig"]);
    /// ```
    #[tracing::instrument(skip(self, html), fields(html_len = html.len()))]
    #[must_use]
    pub fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut links = Vec::new();

        for anchor in document.select(&MEDIA_ANCHOR) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            match self.base.join(href) {
                Ok(url) => {
                    let url = with_original_quality(url);
                    trace!(url = %url, "found media link");
                    links.push(url.to_string());
                }
                Err(e) => debug!(href, error = %e, "skipping unresolvable media link"),
            }
        }

        debug!(links = links.len(), "extracted media links");
        links
    }
}

/// Adds `name=orig` unless the URL already selects a variant.
///
/// An existing `name` parameter is left as-is, whatever its value.
#[must_use]
pub fn with_original_quality(mut url: Url) -> Url {
    if url.query_pairs().any(|(key, _)| key == QUALITY_PARAM) {
        return url;
    }
    let marker = format!("{QUALITY_PARAM}={ORIGINAL_QUALITY}");
    let query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{existing}&{marker}"),
        _ => marker,
    };
    url.set_query(Some(&query));
    url
}
