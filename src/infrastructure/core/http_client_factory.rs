use reqwest::Client;
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates the HTTP client used for dataset downloads.
    ///
    /// Redirects are followed (reqwest default, up to 10 hops). No retries:
    /// a failed download surfaces to the caller as-is.
    pub fn create_client() -> Client {
        Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(Duration::from_secs(300))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}

/// Last non-empty path segment of `url`, used as the local file name.
pub fn file_name_from_url(url: &url::Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_url() {
        let url = url::Url::parse("https://example.com/datasets/retailpt-br.csv?raw=1").unwrap();
        assert_eq!(file_name_from_url(&url).as_deref(), Some("retailpt-br.csv"));

        let trailing = url::Url::parse("https://example.com/datasets/archive.zip/").unwrap();
        assert_eq!(file_name_from_url(&trailing).as_deref(), Some("archive.zip"));

        let bare = url::Url::parse("https://example.com/").unwrap();
        assert_eq!(file_name_from_url(&bare), None);
    }
}
