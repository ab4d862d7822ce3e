//! Normalization of user-entered URLs.
//!
//! Users paste all kinds of things: documentation pages with fragments,
//! links with tracking query strings, bare hosts without a scheme. The
//! input is normalized once at entry and everything downstream works on
//! the resulting [`NormalizedInput`].

use crate::{Error, Result};
use url::Url;

/// Message surfaced when the input cannot be turned into a URL.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid URL format. Please provide a valid URL.";

/// A user-supplied URL after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    literal: String,
    origin: ParsedOrigin,
}

impl NormalizedInput {
    /// The normalized input string itself (fragment, query and trailing
    /// slashes removed, `https://` prefixed when the scheme was missing).
    #[must_use]
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// The parsed components of the input.
    #[must_use]
    pub const fn origin(&self) -> &ParsedOrigin {
        &self.origin
    }
}

/// Immutable `{scheme, host, port?, path}` view of a normalized input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOrigin {
    scheme: String,
    host: String,
    port: Option<u16>,
    path: String,
}

impl ParsedOrigin {
    fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str().filter(|h| !h.is_empty())?;
        Some(Self {
            scheme: url.scheme().to_string(),
            host: host.to_string(),
            port: url.port(),
            path: url.path().trim_end_matches('/').to_string(),
        })
    }

    /// URL scheme (`http` or `https`).
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host name or address. IPv6 addresses keep their brackets.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit, non-default port.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// `scheme://host[:port]` with no trailing slash.
    #[must_use]
    pub fn base(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{port}", self.scheme, self.host),
            None => format!("{}://{}", self.scheme, self.host),
        }
    }

    /// Path without trailing slash; empty for the root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the input points at the host root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Non-empty path segments, in order.
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        self.path.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// Path with its last segment dropped (`/a/b/c` → `/a/b`).
    ///
    /// Empty when the path has fewer than two segments.
    #[must_use]
    pub fn parent_path(&self) -> String {
        let segments = self.segments();
        if segments.len() > 1 {
            format!("/{}", segments[..segments.len() - 1].join("/"))
        } else {
            String::new()
        }
    }

    /// Every ancestor of the path, from the immediate parent up to the
    /// root. The root is represented as an empty string so that joining
    /// `"{ancestor}/file"` never yields a double slash.
    #[must_use]
    pub fn ancestors(&self) -> Vec<String> {
        let segments = self.segments();
        (0..segments.len())
            .rev()
            .map(|depth| {
                if depth == 0 {
                    String::new()
                } else {
                    format!("/{}", segments[..depth].join("/"))
                }
            })
            .collect()
    }
}

/// Normalize a raw user-entered string.
///
/// Steps: trim, drop the fragment, drop the query string, strip trailing
/// slashes, then parse. A string that does not parse as an `http`/`https`
/// URL and carries no scheme separator is retried with `https://`
/// prefixed.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] when neither attempt yields an
/// `http`/`https` URL with a host.
///
/// # Examples
///
/// ```rust
/// use specfind_core::input::normalize;
///
/// let input = normalize("petstore.example.com/api/docs/?tab=1#top")?;
/// assert_eq!(input.literal(), "https://petstore.example.com/api/docs");
/// assert_eq!(input.origin().path(), "/api/docs");
/// # Ok::<(), specfind_core::Error>(())
/// ```
pub fn normalize(raw: &str) -> Result<NormalizedInput> {
    let trimmed = raw.trim();
    let without_fragment = trimmed.split('#').next().unwrap_or_default();
    let without_query = without_fragment.split('?').next().unwrap_or_default();
    let literal = without_query.trim_end_matches('/');

    if literal.is_empty() {
        return Err(Error::InvalidUrl("empty input".to_string()));
    }

    if let Some(origin) = parse_http(literal) {
        return Ok(NormalizedInput {
            literal: literal.to_string(),
            origin,
        });
    }

    if has_explicit_scheme(literal) {
        return Err(Error::InvalidUrl(format!(
            "'{literal}' is not an http or https URL"
        )));
    }

    let prefixed = format!("https://{literal}");
    parse_http(&prefixed)
        .map(|origin| NormalizedInput {
            literal: prefixed.clone(),
            origin,
        })
        .ok_or_else(|| Error::InvalidUrl(format!("'{literal}' could not be parsed as a URL")))
}

/// Whether the text before the first `://` is a syntactically valid scheme.
fn has_explicit_scheme(literal: &str) -> bool {
    let Some((scheme, _)) = literal.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn parse_http(candidate: &str) -> Option<ParsedOrigin> {
    let url = Url::parse(candidate).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    ParsedOrigin::from_url(&url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_fragment_query_and_trailing_slashes() {
        let input = normalize("  https://api.example.com/docs///?x=1#section ").unwrap();
        assert_eq!(input.literal(), "https://api.example.com/docs");
        assert_eq!(input.origin().path(), "/docs");
    }

    #[test]
    fn test_fragment_before_query_is_dropped_whole() {
        let input = normalize("https://example.com/a#frag?not=query").unwrap();
        assert_eq!(input.literal(), "https://example.com/a");
    }

    #[test]
    fn test_missing_scheme_gets_https() {
        let input = normalize("example.com/api/docs").unwrap();
        assert_eq!(input.literal(), "https://example.com/api/docs");
        assert_eq!(input.origin().scheme(), "https");
        assert_eq!(input.origin().host(), "example.com");
    }

    #[test]
    fn test_host_with_port_and_no_scheme() {
        // `localhost:3000/docs` parses as scheme `localhost`; it must be retried
        let input = normalize("localhost:3000/docs").unwrap();
        assert_eq!(input.literal(), "https://localhost:3000/docs");
        assert_eq!(input.origin().port(), Some(3000));
        assert_eq!(input.origin().base(), "https://localhost:3000");
    }

    #[test]
    fn test_http_scheme_is_kept() {
        let input = normalize("http://127.0.0.1:8080/swagger").unwrap();
        assert_eq!(input.origin().base(), "http://127.0.0.1:8080");
        assert_eq!(input.origin().path(), "/swagger");
    }

    #[test]
    fn test_root_url_has_empty_path() {
        let input = normalize("https://example.com/").unwrap();
        assert_eq!(input.literal(), "https://example.com");
        assert!(input.origin().is_root());
        assert!(input.origin().segments().is_empty());
        assert!(input.origin().ancestors().is_empty());
    }

    #[test]
    fn test_default_port_is_omitted() {
        let input = normalize("https://example.com:443/docs").unwrap();
        assert_eq!(input.origin().port(), None);
        assert_eq!(input.origin().base(), "https://example.com");
    }

    #[test]
    fn test_ipv6_host_keeps_brackets() {
        let input = normalize("http://[::1]:9000/docs").unwrap();
        assert_eq!(input.origin().base(), "http://[::1]:9000");
    }

    #[test]
    fn test_rejects_empty_input() {
        assert!(matches!(normalize("   "), Err(Error::InvalidUrl(_))));
        assert!(matches!(normalize("///"), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_unsupported_scheme() {
        assert!(matches!(
            normalize("ftp://example.com/spec.json"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_nested_url_in_path_gets_https() {
        let input = normalize("example.com/redirect/https://api.example.com/openapi.json").unwrap();
        assert_eq!(
            input.literal(),
            "https://example.com/redirect/https://api.example.com/openapi.json"
        );
        assert_eq!(input.origin().host(), "example.com");
    }

    #[test]
    fn test_explicit_scheme_detection() {
        assert!(has_explicit_scheme("ftp://example.com"));
        assert!(has_explicit_scheme("git+ssh://host/repo"));
        assert!(!has_explicit_scheme("example.com/x/https://y"));
        assert!(!has_explicit_scheme("1ftp://host"));
        assert!(!has_explicit_scheme("://host"));
        assert!(!has_explicit_scheme("example.com"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(normalize("not a url at all"), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_parent_path_and_ancestors() {
        let input = normalize("https://example.com/a/b/c").unwrap();
        let origin = input.origin();
        assert_eq!(origin.segments(), vec!["a", "b", "c"]);
        assert_eq!(origin.parent_path(), "/a/b");
        assert_eq!(origin.ancestors(), vec!["/a/b", "/a", ""]);
    }

    #[test]
    fn test_single_segment_has_no_parent() {
        let input = normalize("https://example.com/docs").unwrap();
        assert_eq!(input.origin().parent_path(), "");
        assert_eq!(input.origin().ancestors(), vec![""]);
    }
}
