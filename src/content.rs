//! Page content inspection.
//!
//! Fetches the target page and derives risk signals from its HTML. These
//! signals feed the safety score alongside the URL-shape heuristics; they
//! never influence the fail-closed boolean verdict, which is reserved for
//! the external providers.

use std::sync::LazyLock;
use std::time::Duration;

use log::{debug, error, warn};
use scraper::{Html, Selector};

use crate::config::constants::{
    CONTENT_FETCH_TIMEOUT_SECS, MIN_EXTERNAL_LINKS, PHISHING_KEYWORDS, SCRIPT_OBFUSCATION_MARKERS,
};
use crate::error::{InitializationError, ProviderError};
use crate::initialization::init_client;
use crate::target::Target;

static SCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_static("script"));

static HIDDEN_SENSITIVE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_static(r#"input[type="hidden"][name*="card"], input[type="hidden"][name*="password"]"#)
});

static INVISIBLE_INPUT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_static(r#"div[style*="display:none"] input"#));

static ABSOLUTE_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_static(r#"a[href^="http"]"#));

/// Parses a static CSS selector, falling back to one that matches nothing.
fn parse_static(selector: &str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|e| {
        error!("failed to parse CSS selector '{selector}': {e}");
        Selector::parse("*:not(*)").expect("fallback selector must parse")
    })
}

/// Risk signals derived from the target page's HTML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentSignals {
    /// The page could not be retrieved at all.
    pub fetch_failed: bool,
    /// Inline script text carries obfuscation markers (`eval(`, `escape(`,
    /// `unescape(`).
    pub obfuscated_scripts: bool,
    /// Hidden inputs named after card or password data, or inputs nested
    /// inside invisible containers.
    pub hidden_sensitive_fields: bool,
    /// Credential-harvesting vocabulary on a page with almost no outbound
    /// links.
    pub phishing_content: bool,
}

impl ContentSignals {
    /// Signals for a page that could not be fetched.
    pub fn fetch_failure() -> Self {
        Self {
            fetch_failed: true,
            ..Self::default()
        }
    }

    /// Derives all signals from raw HTML.
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);

        let script_text: String = document
            .select(&SCRIPT_SELECTOR)
            .flat_map(|s| s.text())
            .collect();
        let obfuscated_scripts = SCRIPT_OBFUSCATION_MARKERS
            .iter()
            .any(|marker| script_text.contains(marker));

        let hidden_sensitive_fields = document
            .select(&HIDDEN_SENSITIVE_SELECTOR)
            .next()
            .is_some()
            || document.select(&INVISIBLE_INPUT_SELECTOR).next().is_some();

        // Phishing pages pair credential vocabulary with a link graph that
        // goes nowhere; legitimate login pages link out far more.
        let lowered = html.to_ascii_lowercase();
        let has_keywords = PHISHING_KEYWORDS
            .iter()
            .any(|keyword| lowered.contains(keyword));
        let absolute_links = document.select(&ABSOLUTE_LINK_SELECTOR).count();
        let phishing_content = has_keywords && absolute_links < MIN_EXTERNAL_LINKS;

        Self {
            fetch_failed: false,
            obfuscated_scripts,
            hidden_sensitive_fields,
            phishing_content,
        }
    }
}

/// Fetches target pages and derives [`ContentSignals`] from them.
///
/// Uses its own short-timeout HTTP client: the page fetch contacts the
/// suspect host directly, and a hanging page must not stall the assessment.
pub struct ContentAnalyzer {
    http: reqwest::Client,
}

impl ContentAnalyzer {
    /// Builds the analyzer and its HTTP client.
    pub fn new() -> Result<Self, InitializationError> {
        Ok(Self {
            http: init_client(Duration::from_secs(CONTENT_FETCH_TIMEOUT_SECS))?,
        })
    }

    /// Fetches the target page and derives its signals.
    ///
    /// Fetch failures are themselves a signal (`fetch_failed`), never an
    /// error: an unreachable or refusing page is suspicious, not fatal.
    pub async fn inspect(&self, target: &Target) -> ContentSignals {
        match self.try_fetch(target).await {
            Ok(html) => {
                let signals = ContentSignals::from_html(&html);
                debug!("content signals for {}: {signals:?}", target.normalized);
                signals
            }
            Err(e) => {
                warn!("content inspection failed for {}: {e}", target.normalized);
                ContentSignals::fetch_failure()
            }
        }
    }

    async fn try_fetch(&self, target: &Target) -> Result<String, ProviderError> {
        let response = self.http.get(&target.normalized).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_page_has_no_signals() {
        let html = r#"<html><body>
            <p>Welcome to our documentation.</p>
            <a href="https://a.example">a</a>
            <a href="https://b.example">b</a>
            <a href="https://c.example">c</a>
        </body></html>"#;
        assert_eq!(ContentSignals::from_html(html), ContentSignals::default());
    }

    #[test]
    fn test_obfuscated_script_detected() {
        let html = r#"<html><script>var x = eval(atob(p));</script></html>"#;
        assert!(ContentSignals::from_html(html).obfuscated_scripts);
    }

    #[test]
    fn test_script_markers_in_body_text_do_not_count() {
        // Only script element text is inspected for obfuscation markers.
        let html = r#"<html><body><p>docs about eval( usage</p>
            <a href="https://a.example">a</a>
            <a href="https://b.example">b</a>
            <a href="https://c.example">c</a>
        </body></html>"#;
        assert!(!ContentSignals::from_html(html).obfuscated_scripts);
    }

    #[test]
    fn test_hidden_sensitive_field_detected() {
        let html = r#"<html><form>
            <input type="hidden" name="cardNumber" value="">
        </form></html>"#;
        assert!(ContentSignals::from_html(html).hidden_sensitive_fields);
    }

    #[test]
    fn test_invisible_input_detected() {
        let html = r#"<html><div style="display:none"><input name="q"></div></html>"#;
        assert!(ContentSignals::from_html(html).hidden_sensitive_fields);
    }

    #[test]
    fn test_phishing_keywords_with_few_links() {
        let html = r#"<html><body>
            <h1>Verify your account password</h1>
            <a href="https://only.example">continue</a>
        </body></html>"#;
        assert!(ContentSignals::from_html(html).phishing_content);
    }

    #[test]
    fn test_phishing_keywords_with_many_links_do_not_count() {
        // Credential vocabulary alone is normal for a real login page that
        // links out to the rest of the site.
        let html = r#"<html><body>
            <h1>Sign in to your account</h1>
            <a href="https://a.example">a</a>
            <a href="https://b.example">b</a>
            <a href="https://c.example">c</a>
        </body></html>"#;
        assert!(!ContentSignals::from_html(html).phishing_content);
    }

    #[test]
    fn test_fetch_failure_signal() {
        let signals = ContentSignals::fetch_failure();
        assert!(signals.fetch_failed);
        assert!(!signals.obfuscated_scripts);
    }
}
