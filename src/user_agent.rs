//! User-Agent string for outgoing requests.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/nitter-dl";

/// Default User-Agent for page and image requests (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("nitter-dl/{version} (+{PROJECT_UA_URL})")
}
