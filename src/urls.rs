//! URL helpers: seed normalization, link resolution, and host scoping
//!
//! A crawl is scoped to the hostname of its seed domain. Links resolve
//! against the page they were found on; only http(s) URLs whose hostname
//! equals the crawl host or is one of its subdomains stay in scope.

use url::Url;

/// Normalizes a configured domain into a seed URL
///
/// Schemeless entries get `http://` prepended; entries that already carry a
/// scheme are left alone.
pub fn normalize_seed(domain: &str) -> String {
    let domain = domain.trim();
    if domain.contains("://") {
        domain.to_string()
    } else {
        format!("http://{}", domain)
    }
}

/// Resolves an href against a base URL
///
/// Returns `None` for empty or malformed references; malformed links are
/// silently discarded by the traversal.
pub fn resolve(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok()
}

/// Returns true if `url` is an http(s) URL on the crawl host or one of its
/// subdomains
///
/// `host` is a bare hostname (no port); ports on the candidate are ignored.
pub fn in_scope(url: &Url, host: &str) -> bool {
    if url.scheme() != "http" && url.scheme() != "https" {
        return false;
    }
    match url.host_str() {
        Some(h) => {
            let h = h.to_ascii_lowercase();
            let host = host.to_ascii_lowercase();
            h == host || h.ends_with(&format!(".{}", host))
        }
        None => false,
    }
}
