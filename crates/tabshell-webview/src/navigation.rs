//! Navigation policy shared by the wry handlers.

/// `scheme://authority` of a hierarchical URL, or `None` for URLs without
/// an authority (`about:blank`, `data:`).
pub fn origin(url: &str) -> Option<&str> {
    let url = url.trim();
    let scheme_end = url.find("://")?;
    let rest = &url[scheme_end + 3..];
    let authority_len = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    if authority_len == 0 {
        return None;
    }
    Some(&url[..scheme_end + 3 + authority_len])
}

/// Whether two URLs share an origin (ASCII case-insensitive).
pub fn same_origin(a: &str, b: &str) -> bool {
    match (origin(a), origin(b)) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

/// Chrome surfaces may only show their own page: inline HTML (`about:`)
/// or the configured dev server's origin.
pub fn is_chrome_navigation_allowed(url: &str, dev_server: Option<&str>) -> bool {
    if url.starts_with("about:") {
        return true;
    }
    dev_server.is_some_and(|server| same_origin(url, server))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_extraction() {
        assert_eq!(origin("https://a.test/path?q#f"), Some("https://a.test"));
        assert_eq!(origin("http://localhost:5173"), Some("http://localhost:5173"));
        assert_eq!(origin("https://a.test#x"), Some("https://a.test"));
        assert_eq!(origin("about:blank"), None);
        assert_eq!(origin("file:///etc/hosts"), None);
    }

    #[test]
    fn same_origin_comparison() {
        assert!(same_origin("https://a.test/x", "HTTPS://A.TEST/#y"));
        assert!(!same_origin("https://a.test/", "https://b.test/"));
        assert!(!same_origin("https://a.test/", "http://a.test/"));
        assert!(!same_origin("about:blank", "about:blank"));
    }

    #[test]
    fn chrome_is_locked_to_its_page() {
        assert!(is_chrome_navigation_allowed("about:blank", None));
        assert!(!is_chrome_navigation_allowed("https://evil.test/", None));
        let dev = Some("http://localhost:5173");
        assert!(is_chrome_navigation_allowed("http://localhost:5173/index.html", dev));
        assert!(!is_chrome_navigation_allowed("http://localhost:8080/", dev));
        assert!(!is_chrome_navigation_allowed("javascript:alert(1)", dev));
    }
}
