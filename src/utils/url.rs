//! Base URL handling for endpoint construction

/// Strip trailing slashes so endpoint paths can be appended with a single `/`.
///
/// ```
/// use parley::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:11434/"), "http://localhost:11434");
/// assert_eq!(normalize_base_url("http://gpu-box:3000"), "http://gpu-box:3000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join an already-normalized base URL and an API path such as `api/tags`.
///
/// ```
/// use parley::utils::url::endpoint_url;
///
/// assert_eq!(
///     endpoint_url("http://localhost:11434", "/api/chat"),
///     "http://localhost:11434/api/chat"
/// );
/// ```
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        normalize_base_url(base_url),
        path.trim_start_matches('/')
    )
}
