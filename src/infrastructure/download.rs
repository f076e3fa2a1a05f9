use crate::infrastructure::core::HttpClientFactory;
use crate::infrastructure::core::http_client_factory::file_name_from_url;
use anyhow::{Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Fetches remote dataset files into a local folder.
pub struct Downloader {
    client: Client,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new(HttpClientFactory::create_client())
    }
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Downloads `url` into `dest_folder`, named after the last URL path
    /// segment. An existing file is returned untouched.
    pub async fn download_file(&self, url: &str, dest_folder: impl AsRef<Path>) -> Result<PathBuf> {
        let dest_folder = dest_folder.as_ref();
        let parsed = url::Url::parse(url).with_context(|| format!("Invalid URL: {}", url))?;
        let file_name = file_name_from_url(&parsed)
            .with_context(|| format!("URL has no file name: {}", url))?;

        fs::create_dir_all(dest_folder)
            .await
            .with_context(|| format!("Failed to create directory: {}", dest_folder.display()))?;

        let file_path = dest_folder.join(&file_name);
        let exists = fs::try_exists(&file_path)
            .await
            .with_context(|| format!("Failed to check {}", file_path.display()))?;
        if exists {
            warn!("File {} already exists, skipping download", file_name);
            return Ok(file_path);
        }

        info!("Downloading {}...", file_name);
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .with_context(|| format!("Request failed: {}", url))?
            .error_for_status()
            .with_context(|| format!("Download failed: {}", url))?;

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body: {}", url))?;

        // Written beside the target first so a failed write never looks cached
        let partial_path = dest_folder.join(format!("{}.part", file_name));
        fs::write(&partial_path, &body)
            .await
            .with_context(|| format!("Failed to write {}", partial_path.display()))?;
        fs::rename(&partial_path, &file_path)
            .await
            .with_context(|| format!("Failed to move download to {}", file_path.display()))?;

        info!("Saved {} bytes to {}", body.len(), file_path.display());
        Ok(file_path)
    }
}

/// Convenience wrapper around [`Downloader::download_file`].
pub async fn download_file(url: &str, dest_folder: impl AsRef<Path>) -> Result<PathBuf> {
    Downloader::default().download_file(url, dest_folder).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_existing_file_is_not_downloaded() {
        let dir = std::env::temp_dir().join(format!("prodclass-dl-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let existing = dir.join("retailpt-br.csv");
        std::fs::write(&existing, "cached").unwrap();

        // Unroutable host: reaching the network would fail the test
        let path = download_file("http://invalid.invalid/data/retailpt-br.csv", &dir)
            .await
            .unwrap();

        assert_eq!(path, existing);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "cached");
    }

    fn local_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn test_http_error_status_leaves_no_file() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .await
                .unwrap();
        });

        let dir = std::env::temp_dir().join(format!("prodclass-dl-{}", uuid::Uuid::new_v4()));
        let url = format!("http://{}/data/missing.csv", addr);

        let result = Downloader::new(local_client())
            .download_file(&url, &dir)
            .await;
        server.await.unwrap();

        assert!(result.is_err());
        assert!(!dir.join("missing.csv").exists());
        assert!(!dir.join("missing.csv.part").exists());
    }

    #[tokio::test]
    async fn test_successful_download_is_saved() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 5\r\nconnection: close\r\n\r\na;b\n1")
                .await
                .unwrap();
        });

        let dir = std::env::temp_dir().join(format!("prodclass-dl-{}", uuid::Uuid::new_v4()));
        let url = format!("http://{}/data/items.csv", addr);

        let path = Downloader::new(local_client())
            .download_file(&url, &dir)
            .await
            .unwrap();
        server.await.unwrap();

        assert_eq!(path, dir.join("items.csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a;b\n1");
        assert!(!dir.join("items.csv.part").exists());
    }

    #[tokio::test]
    async fn test_url_without_file_name_is_rejected() {
        let dir = std::env::temp_dir();
        assert!(download_file("https://example.com/", &dir).await.is_err());
        assert!(download_file("not a url", &dir).await.is_err());
    }
}
