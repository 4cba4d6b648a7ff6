//! Image asset retrieval: remote URLs, local paths and data URIs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use deck_core::{Error, RenderConfig, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Something that can turn an image reference into bytes.
///
/// `None` means the asset is absent; the caller omits the picture.
pub trait AssetSource {
    fn fetch(&mut self, location: &str) -> Option<Vec<u8>>;
}

/// In-memory assets keyed by location.
impl AssetSource for HashMap<String, Vec<u8>> {
    fn fetch(&mut self, location: &str) -> Option<Vec<u8>> {
        self.get(location).cloned()
    }
}

/// Fetches assets with a bounded retry policy and caches every outcome for the run.
pub struct AssetResolver {
    client: Option<Client>,
    attempts: u32,
    base_dir: Option<PathBuf>,
    cache: HashMap<String, Option<Vec<u8>>>,
}

impl AssetResolver {
    /// Resolver that downloads remote assets using the config's fetch policy.
    pub fn new(config: &RenderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client: Some(client),
            attempts: config.fetch_attempts.max(1),
            base_dir: None,
            cache: HashMap::new(),
        })
    }

    /// Resolver that never touches the network.
    pub fn offline() -> Self {
        Self {
            client: None,
            attempts: 1,
            base_dir: None,
            cache: HashMap::new(),
        }
    }

    /// Resolve relative paths against `dir` (usually the input file's directory).
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn resolve(&self, location: &str) -> Option<Vec<u8>> {
        if location.starts_with("http://") || location.starts_with("https://") {
            self.download(location)
        } else if let Some(rest) = location.strip_prefix("data:") {
            decode_data_uri(rest)
        } else {
            self.read_local(location.strip_prefix("file://").unwrap_or(location))
        }
    }

    fn download(&self, url: &str) -> Option<Vec<u8>> {
        let Some(client) = &self.client else {
            log::debug!("Offline, skipping {}", url);
            return None;
        };

        let mut last_error = String::new();
        for attempt in 1..=self.attempts {
            match client.get(url).send() {
                Ok(resp) if resp.status() == StatusCode::OK => match resp.bytes() {
                    Ok(bytes) => return Some(bytes.to_vec()),
                    Err(e) => last_error = e.to_string(),
                },
                Ok(resp) if resp.status().is_client_error() => {
                    log::warn!("Image download failed: {} (HTTP {})", url, resp.status());
                    return None;
                }
                Ok(resp) => last_error = format!("HTTP {}", resp.status()),
                Err(e) => last_error = e.to_string(),
            }
            log::debug!("Attempt {}/{} for {} failed: {}", attempt, self.attempts, url, last_error);
        }

        log::warn!("Image download failed: {} ({})", url, last_error);
        None
    }

    fn read_local(&self, path: &str) -> Option<Vec<u8>> {
        let path = Path::new(path);
        let full = match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        };

        match std::fs::read(&full) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::warn!("Cannot read image {}: {}", full.display(), e);
                None
            }
        }
    }
}

impl AssetSource for AssetResolver {
    fn fetch(&mut self, location: &str) -> Option<Vec<u8>> {
        let location = location.trim();
        if location.is_empty() {
            return None;
        }
        if let Some(cached) = self.cache.get(location) {
            return cached.clone();
        }

        let resolved = self.resolve(location);
        self.cache.insert(location.to_string(), resolved.clone());
        resolved
    }
}

/// Decode the part of a data URI after `data:`. Only base64 payloads are supported.
fn decode_data_uri(rest: &str) -> Option<Vec<u8>> {
    let (header, payload) = rest.split_once(',')?;
    if !header.ends_with(";base64") {
        log::warn!("Unsupported data URI encoding: {}", header);
        return None;
    }
    match STANDARD.decode(payload.trim()) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("Invalid base64 image data: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    /// How the local server treats one incoming connection.
    enum Reply {
        /// Close the connection without answering.
        Drop,
        /// Accept and never answer.
        Stall,
        /// Answer with this status line and body.
        Respond(&'static str, &'static [u8]),
    }

    /// Serve `replies` in order, one per connection. Returns the image URL and the connection count.
    fn serve(replies: Vec<Reply>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/image.png", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        thread::spawn(move || {
            let mut stalled: Vec<TcpStream> = Vec::new();
            for reply in replies {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                match reply {
                    Reply::Drop => drop(stream),
                    Reply::Stall => stalled.push(stream),
                    Reply::Respond(status, body) => {
                        read_request(&mut stream);
                        let head = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                            status,
                            body.len()
                        );
                        let _ = stream.write_all(head.as_bytes());
                        let _ = stream.write_all(body);
                    }
                }
            }
            thread::sleep(Duration::from_secs(2));
        });

        (url, hits)
    }

    fn read_request(stream: &mut TcpStream) {
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
    }

    fn online(timeout_ms: u64) -> AssetResolver {
        let config = RenderConfig::default().with_fetch_policy(Duration::from_millis(timeout_ms), 2);
        AssetResolver::new(&config).unwrap()
    }

    #[test]
    fn test_download_ok_and_cached() {
        let (url, hits) = serve(vec![Reply::Respond("200 OK", b"png-bytes")]);
        let mut resolver = online(2000);

        assert_eq!(resolver.fetch(&url), Some(b"png-bytes".to_vec()));
        assert_eq!(resolver.fetch(&url), Some(b"png-bytes".to_vec()));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_not_found_is_absent() {
        let (url, hits) = serve(vec![Reply::Respond("404 Not Found", b"")]);
        let mut resolver = online(2000);

        assert_eq!(resolver.fetch(&url), None);
        assert_eq!(resolver.fetch(&url), None);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_connection_retried_once() {
        let (url, hits) = serve(vec![Reply::Drop, Reply::Respond("200 OK", b"second")]);
        let mut resolver = online(2000);

        assert_eq!(resolver.fetch(&url), Some(b"second".to_vec()));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_timeout_gives_up_after_retry() {
        let (url, hits) = serve(vec![Reply::Stall, Reply::Stall, Reply::Stall]);
        let mut resolver = online(200);

        assert_eq!(resolver.fetch(&url), None);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_data_uri() {
        let mut resolver = AssetResolver::offline();
        assert_eq!(
            resolver.fetch("data:image/png;base64,aGVsbG8="),
            Some(b"hello".to_vec())
        );
        assert_eq!(resolver.fetch("data:text/plain,hello"), None);
    }

    #[test]
    fn test_local_file_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pic.png"), b"bytes").unwrap();

        let mut resolver = AssetResolver::offline().with_base_dir(dir.path());
        assert_eq!(resolver.fetch("pic.png"), Some(b"bytes".to_vec()));

        std::fs::remove_file(dir.path().join("pic.png")).unwrap();
        assert_eq!(resolver.fetch("pic.png"), Some(b"bytes".to_vec()));
    }

    #[test]
    fn test_absent_assets() {
        let mut resolver = AssetResolver::offline();
        assert_eq!(resolver.fetch("https://example.com/a.png"), None);
        assert_eq!(resolver.fetch("/definitely/not/here.png"), None);
        assert_eq!(resolver.fetch("  "), None);
    }

    #[test]
    fn test_map_source() {
        let mut assets = HashMap::new();
        assets.insert("a.png".to_string(), vec![1, 2, 3]);
        assert_eq!(assets.fetch("a.png"), Some(vec![1, 2, 3]));
        assert_eq!(assets.fetch("b.png"), None);
    }
}
