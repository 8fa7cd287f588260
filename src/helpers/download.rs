//! Archive download
//!
//! Streams a remote archive to a local file. Redirects (GitHub sends zipball
//! requests on to codeload) are followed by ureq.

use crate::core::error::DownloadError;
use crate::core::output;
use crate::github::GitHubClient;
use std::io::{Read, Write};
use std::path::Path;

use super::internal::fs_utils;
use super::internal::progress::{self, upgrade_to_bytes};

/// Download `url` to `dest`, returning the number of bytes written.
pub fn download(client: &GitHubClient, url: &str, dest: &Path) -> Result<u64, DownloadError> {
    let io_err = |source: std::io::Error| DownloadError::Io {
        path: dest.to_path_buf(),
        source,
    };
    fs_utils::ensure_parent_dir(dest).map_err(io_err)?;

    let filename = dest
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "download".to_string());

    let total_bytes = download_with_progress(client, url, dest, &filename)?;
    output::detail(&format!("downloaded {} ({} bytes)", filename, total_bytes));

    Ok(total_bytes)
}

fn download_with_progress(
    client: &GitHubClient,
    url: &str,
    dest: &Path,
    filename: &str,
) -> Result<u64, DownloadError> {
    let pb = progress::create_spinner(&format!("downloading {}", filename));

    let response = match client.download_request(url).call() {
        Ok(response) => response,
        Err(e) => {
            pb.finish_and_clear();
            return Err(download_error(e));
        }
    };

    if let Some(len) = response
        .header("content-length")
        .and_then(|s| s.parse().ok())
    {
        upgrade_to_bytes(&pb, len);
    }

    let result = stream_to_file(response.into_reader(), dest, |written| pb.set_position(written));
    pb.finish_and_clear();
    result
}

fn stream_to_file(
    mut reader: impl Read,
    dest: &Path,
    mut on_progress: impl FnMut(u64),
) -> Result<u64, DownloadError> {
    let io_err = |source: std::io::Error| DownloadError::Io {
        path: dest.to_path_buf(),
        source,
    };

    let mut file = std::fs::File::create(dest).map_err(io_err)?;
    let mut buffer = [0u8; 8192];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            // A broken body stream is a network failure, not a local write failure.
            Err(e) => return Err(DownloadError::Transport(format!("read error: {}", e))),
        };

        file.write_all(&buffer[..bytes_read]).map_err(io_err)?;

        total_bytes += bytes_read as u64;
        on_progress(total_bytes);
    }

    file.flush().map_err(io_err)?;
    Ok(total_bytes)
}

fn download_error(err: ureq::Error) -> DownloadError {
    match err {
        ureq::Error::Status(status, response) => DownloadError::Status {
            status,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(t) => DownloadError::Transport(t.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Upstream;
    use std::net::TcpListener;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GitHubClient {
        GitHubClient::new(Upstream::with_bases(server.uri(), server.uri()))
    }

    #[tokio::test]
    async fn test_download_writes_body() {
        let server = MockServer::start().await;
        let body: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();

        Mock::given(method("GET"))
            .and(path("/zipball/v1.0.0"))
            .and(header("User-Agent", "LazyFox-CLI"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("source.zip");
        let url = format!("{}/zipball/v1.0.0", server.uri());

        let written = download(&client_for(&server), &url, &dest).unwrap();
        assert_eq!(written, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
    }

    #[tokio::test]
    async fn test_download_follows_redirect() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zipball/main"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", format!("{}/codeload/main.zip", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/codeload/main.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK-ish".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("source.zip");
        let url = format!("{}/zipball/main", server.uri());

        download(&client_for(&server), &url, &dest).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"PK-ish");
    }

    #[tokio::test]
    async fn test_download_http_error_reports_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/zipball/broken"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let url = format!("{}/zipball/broken", server.uri());
        let err = download(&client_for(&server), &url, &dir.path().join("source.zip")).unwrap_err();

        assert!(matches!(err, DownloadError::Status { status: 502, .. }));
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
    }

    #[test]
    fn test_download_transport_error() {
        let client = GitHubClient::new(Upstream::default());
        let dir = tempfile::tempdir().unwrap();
        let err = download(
            &client,
            "http://127.0.0.1:9/zipball/v1",
            &dir.path().join("source.zip"),
        )
        .unwrap_err();
        assert!(matches!(err, DownloadError::Transport(_)));
    }

    /// Serve `body` one byte at a time with `gap` before each byte.
    fn serve_slowly(body: &'static [u8], gap: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut byte = [0u8; 1];
            while !request.ends_with(b"\r\n\r\n") {
                if stream.read(&mut byte).unwrap() == 0 {
                    return;
                }
                request.push(byte[0]);
            }

            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
            for b in body {
                std::thread::sleep(gap);
                if stream.write_all(&[*b]).and_then(|_| stream.flush()).is_err() {
                    return;
                }
            }
        });

        format!("http://{}/zipball/slow", addr)
    }

    #[test]
    fn test_slow_download_outlasting_timeout_succeeds() {
        let url = serve_slowly(b"0123456789", Duration::from_millis(300));
        let client =
            GitHubClient::new(Upstream::default()).with_download_timeout(Duration::from_secs(1));
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("source.zip");

        let started = Instant::now();
        let written = download(&client, &url, &dest).unwrap();

        assert!(started.elapsed() > Duration::from_secs(1));
        assert_eq!(written, 10);
        assert_eq!(std::fs::read(&dest).unwrap(), b"0123456789");
    }

    #[test]
    fn test_stalled_download_times_out() {
        let url = serve_slowly(b"01", Duration::from_millis(1500));
        let client =
            GitHubClient::new(Upstream::default()).with_download_timeout(Duration::from_millis(300));
        let dir = tempfile::tempdir().unwrap();

        let err = download(&client, &url, &dir.path().join("source.zip")).unwrap_err();
        assert!(matches!(err, DownloadError::Transport(_)), "got: {err:?}");
    }

    #[test]
    fn test_stream_to_file_reports_progress() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        let data = vec![7u8; 10_000];
        let mut last = 0;

        let n = stream_to_file(&data[..], &dest, |w| last = w).unwrap();
        assert_eq!(n, 10_000);
        assert_eq!(last, 10_000);
        assert_eq!(std::fs::read(&dest).unwrap(), data);
    }
}
