//! Canonical form for submitted URLs.
//!
//! Every cache key and every validation input goes through [`normalize_url`],
//! so two spellings of the same page always land on the same cache entry.

/// Collapses repeated slashes in the path of `raw`.
///
/// With a `://` present the input is split on its first occurrence; the part
/// after it is split on `/` into the host and path segments, empty segments
/// are dropped, and the result is rebuilt as `scheme://host/path`. This also
/// removes a trailing slash and gives a bare host a single trailing `/`.
///
/// Without a `://` the whole input is treated as a path and only runs of
/// slashes are collapsed.
///
/// The function is idempotent. Query strings and fragments are not parsed:
/// a `//` inside a query string is collapsed like any other. That is a known
/// limitation, not something callers should rely on.
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    match raw.split_once("://") {
        Some((scheme, rest)) => {
            let mut segments = rest.split('/');
            let host = segments.next().unwrap_or_default();
            let path = segments
                .filter(|segment| !segment.is_empty())
                .collect::<Vec<_>>()
                .join("/");
            format!("{scheme}://{host}/{path}")
        }
        None => collapse_slashes(raw),
    }
}

fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_was_slash = false;
    for ch in path.chars() {
        if ch == '/' {
            if previous_was_slash {
                continue;
            }
            previous_was_slash = true;
        } else {
            previous_was_slash = false;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[path = "url_test.rs"]
mod tests;
