//! URL and title canonicalization used for dedup and cluster keys.
//! Pure functions, no side effects.

use url::Url;

/// Reduce a URL to a comparable `host + path` form: leading "www." and one
/// trailing slash stripped, scheme/port/query/fragment dropped. Unparseable
/// input falls back to the lower-cased raw string rather than failing.
pub fn canonical_url(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match Url::parse(raw) {
        Ok(u) => {
            let host = u.host_str().unwrap_or("");
            let host = host.strip_prefix("www.").unwrap_or(host);
            let path = u.path();
            let path = path.strip_suffix('/').unwrap_or(path);
            format!("{host}{path}")
        }
        Err(_) => raw.to_lowercase(),
    }
}

/// Lower-case, collapse whitespace runs to single spaces, trim the ends.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_url_strips_www_and_trailing_slash() {
        assert_eq!(canonical_url("http://www.x.com/a/"), "x.com/a");
        assert_eq!(canonical_url("http://x.com/a"), "x.com/a");
    }

    #[test]
    fn canonical_url_drops_scheme_port_query_fragment() {
        assert_eq!(
            canonical_url("https://example.com:8080/path?q=1#frag"),
            "example.com/path"
        );
    }

    #[test]
    fn canonical_url_strips_only_leading_www() {
        assert_eq!(canonical_url("http://www.www.x.com/"), "www.x.com");
        assert_eq!(canonical_url("http://wwwx.com/a"), "wwwx.com/a");
    }

    #[test]
    fn canonical_url_falls_back_to_lowercased_raw() {
        assert_eq!(canonical_url("Not A Url"), "not a url");
        assert_eq!(canonical_url(""), "");
    }

    #[test]
    fn canonical_url_is_deterministic() {
        let url = "https://www.Example.com/Some/Path/";
        assert_eq!(canonical_url(url), canonical_url(url));
    }

    #[test]
    fn normalize_title_collapses_whitespace() {
        assert_eq!(normalize_title("  Foo   BAR\tbaz \n"), "foo bar baz");
        assert_eq!(normalize_title(""), "");
        assert_eq!(
            normalize_title("Breaking News"),
            normalize_title("breaking\t news")
        );
    }
}
