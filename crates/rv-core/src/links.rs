use crate::error::ConfigError;
use crate::pagination::PageWindow;
use url::Url;
use url::form_urlencoded;

const PAGE_PARAM: &str = "page";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// Builds absolute prev/next links for a listing. `path_and_query` is the
/// request target as received; only its `page` parameter is rewritten, and the
/// result is rooted at `base` so links stay valid behind a reverse proxy.
pub fn build_links(
    base: &Url,
    path_and_query: &str,
    window: &PageWindow,
) -> Result<PageLinks, ConfigError> {
    let prev = if window.has_prev() {
        Some(page_url(base, path_and_query, window.page - 1)?)
    } else {
        None
    };
    let next = if window.has_next() {
        Some(page_url(base, path_and_query, window.page + 1)?)
    } else {
        None
    };
    Ok(PageLinks { prev, next })
}

fn page_url(base: &Url, path_and_query: &str, page: u64) -> Result<String, ConfigError> {
    if base.cannot_be_a_base() {
        return Err(ConfigError::InvalidPageUrl {
            message: format!("{base} cannot carry a path"),
        });
    }

    let (path, query) = match path_and_query.split_once('?') {
        Some((path, query)) => (path, query),
        None => (path_and_query, ""),
    };

    let mut url = base.clone();
    url.set_fragment(None);
    let prefix = base.path().trim_end_matches('/');
    if path.starts_with('/') {
        url.set_path(&format!("{prefix}{path}"));
    } else {
        url.set_path(&format!("{prefix}/{path}"));
    }

    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    let position = pairs.iter().position(|(key, _)| key == PAGE_PARAM);
    pairs.retain(|(key, _)| key != PAGE_PARAM);
    let entry = (PAGE_PARAM.to_string(), page.to_string());
    match position {
        Some(index) => pairs.insert(index, entry),
        None => pairs.push(entry),
    }

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs.iter().map(|(key, value)| (key.as_str(), value.as_str())));
    Ok(url.into())
}
