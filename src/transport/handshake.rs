use url::form_urlencoded;

/// Extracts the subscribed article from an upgrade request's query string.
///
/// Returns `None` when the `article_id` parameter is missing or empty; such
/// requests are refused before any registry mutation.
pub fn article_id(query: Option<&str>) -> Option<String> {
    let query = query?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "article_id")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
