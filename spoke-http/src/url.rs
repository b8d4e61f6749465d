//! URL assembly helpers

use crate::errors::HttpError;

/// Join a base URL and an endpoint path with exactly one `/` between them.
///
/// An empty endpoint returns the base unchanged.
pub fn join_url(base: &str, endpoint: &str) -> String {
    if endpoint.is_empty() {
        return base.to_string();
    }
    if base.is_empty() {
        return endpoint.to_string();
    }

    match (base.ends_with('/'), endpoint.starts_with('/')) {
        (true, true) => format!("{}{}", base, &endpoint[1..]),
        (false, false) => format!("{}/{}", base, endpoint),
        _ => format!("{}{}", base, endpoint),
    }
}

/// Append `segment` as one percent-encoded path segment, so characters such
/// as `/` or `?` inside it cannot change the path or start a query.
pub fn append_path_segment(base: &str, segment: &str) -> Result<String, HttpError> {
    let mut url = ::url::Url::parse(base)
        .map_err(|e| HttpError::InvalidUrl(format!("{}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| HttpError::InvalidUrl(format!("{} cannot have a path", base)))?
        .pop_if_empty()
        .push(segment);
    Ok(url.into())
}

/// Append `key=value` pairs as a query string, percent-encoding values
pub fn with_query(url: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let query = params
        .iter()
        .map(|(key, value)| {
            let encoded: String = ::url::form_urlencoded::byte_serialize(value.as_bytes()).collect();
            format!("{}={}", key, encoded)
        })
        .collect::<Vec<_>>()
        .join("&");

    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, query)
}
