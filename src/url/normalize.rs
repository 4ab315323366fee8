use crate::UrlError;
use url::Url;

/// Parses a raw string into a fetchable crawl URL
///
/// # Rules
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Only `http` and `https` are crawlable
/// 3. A host is required
/// 4. The fragment is dropped (it never reaches the server)
///
/// Scheme and host are lowercased by the parser itself; the query is kept so
/// the page is fetched exactly as linked.
///
/// # Examples
///
/// ```
/// use squid::url::parse_target_url;
///
/// let url = parse_target_url("HTTP://Example.COM/Page?q=1#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/Page?q=1");
/// ```
pub fn parse_target_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Returns the site root of a URL: `scheme://host[:port]`
///
/// Default ports are omitted, so `http://a.com:80/` and `http://a.com/` share a root.
pub fn site_root(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Builds the identity used for deduplication: `scheme://host[:port]path`
///
/// Query, fragment and credentials are not part of the identity.
///
/// # Examples
///
/// ```
/// use squid::url::canonical_key;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/a/b?page=2#x").unwrap();
/// assert_eq!(canonical_key(&url), "https://example.com/a/b");
/// ```
pub fn canonical_key(url: &Url) -> String {
    format!("{}{}", site_root(url), url.path())
}

/// Returns the location of robots.txt for the site serving `url`
///
/// Path and query of the original URL are discarded.
pub fn robots_url(url: &Url) -> String {
    format!("{}/robots.txt", site_root(url))
}
