use std::time::Duration;

use bytes::{Bytes, BytesMut};
use reqwest::Client;
use reqwest::redirect::{Attempt, Policy};
use tracing::{debug, warn};
use url::{Host, Url};

use super::{STTError, STTResult};
use crate::utils::url_validation::is_private_ip;

/// Longest redirect chain followed when downloading audio.
pub const MAX_REDIRECTS: usize = 5;

fn redirect_policy(allow_private: bool) -> Policy {
    Policy::custom(move |attempt: Attempt| {
        // previous() includes the original request URL
        if attempt.previous().len() > MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        let url = attempt.url().clone();
        if url.scheme() != "http" && url.scheme() != "https" {
            return attempt.error(format!("redirect to unsupported scheme {}", url.scheme()));
        }
        if !allow_private && redirects_to_private_ip(&url) {
            return attempt.error("redirect to a private address");
        }
        attempt.follow()
    })
}

fn redirects_to_private_ip(url: &Url) -> bool {
    match url.host() {
        Some(Host::Ipv4(ip)) => is_private_ip(&ip.into()),
        Some(Host::Ipv6(ip)) => is_private_ip(&ip.into()),
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        None => true,
    }
}

/// HTTP client for fetching caller-supplied audio URLs.
pub(crate) fn build_download_client(
    timeout: Duration,
    allow_private: bool,
) -> STTResult<Client> {
    Client::builder()
        .timeout(timeout)
        .redirect(redirect_policy(allow_private))
        .build()
        .map_err(|e| STTError::ConfigurationError(format!("Failed to build download client: {e}")))
}

/// Download `url` into memory, aborting once more than `max_bytes` arrive.
pub(crate) async fn download_audio(client: &Client, url: Url, max_bytes: usize) -> STTResult<Bytes> {
    let mut response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| STTError::DownloadError(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        warn!(url = %url, status = status.as_u16(), "Audio download failed");
        return Err(STTError::DownloadFailed {
            status: status.as_u16(),
        });
    }

    let declared = response.content_length();
    if declared.is_some_and(|len| len > max_bytes as u64) {
        return Err(STTError::AudioTooLarge { max: max_bytes });
    }

    let capacity = declared.map_or(0, |len| len as usize);
    let mut buffer = BytesMut::with_capacity(capacity);
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| STTError::DownloadError(e.to_string()))?
    {
        if buffer.len() + chunk.len() > max_bytes {
            return Err(STTError::AudioTooLarge { max: max_bytes });
        }
        buffer.extend_from_slice(&chunk);
    }

    if buffer.is_empty() {
        return Err(STTError::EmptyAudio);
    }

    debug!(url = %url, bytes = buffer.len(), "Audio downloaded");
    Ok(buffer.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> Client {
        build_download_client(Duration::from_secs(5), true).unwrap()
    }

    #[test]
    fn test_private_redirect_targets() {
        assert!(redirects_to_private_ip(&Url::parse("http://10.0.0.1/a").unwrap()));
        assert!(redirects_to_private_ip(&Url::parse("http://localhost/a").unwrap()));
        assert!(redirects_to_private_ip(&Url::parse("http://[::1]/a").unwrap()));
        assert!(!redirects_to_private_ip(&Url::parse("https://8.8.8.8/a").unwrap()));
        assert!(!redirects_to_private_ip(&Url::parse("https://cdn.example.com/a").unwrap()));
    }

    #[tokio::test]
    async fn test_download_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/voice.ogg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"OggS-data".to_vec()))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/voice.ogg", server.uri())).unwrap();
        let bytes = download_audio(&client(), url, 1024).await.unwrap();
        assert_eq!(bytes.as_ref(), b"OggS-data");
    }

    #[tokio::test]
    async fn test_download_too_large() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/big.ogg", server.uri())).unwrap();
        let err = download_audio(&client(), url, 16).await.unwrap_err();
        assert!(matches!(err, STTError::AudioTooLarge { max: 16 }));
    }

    #[tokio::test]
    async fn test_download_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/missing.ogg", server.uri())).unwrap();
        let err = download_audio(&client(), url, 1024).await.unwrap_err();
        assert!(matches!(err, STTError::DownloadFailed { status: 404 }));
    }

    #[tokio::test]
    async fn test_download_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/empty.ogg", server.uri())).unwrap();
        let err = download_audio(&client(), url, 1024).await.unwrap_err();
        assert!(matches!(err, STTError::EmptyAudio));
    }

    async fn mount_redirect_chain(server: &MockServer, hops: usize) {
        for i in 0..hops {
            Mock::given(method("GET"))
                .and(path(format!("/r{i}")))
                .respond_with(
                    ResponseTemplate::new(302)
                        .insert_header("location", format!("{}/r{}", server.uri(), i + 1)),
                )
                .mount(server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path(format!("/r{hops}")))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"OggS-end".to_vec()))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_download_follows_max_redirects() {
        let server = MockServer::start().await;
        mount_redirect_chain(&server, MAX_REDIRECTS).await;

        let url = Url::parse(&format!("{}/r0", server.uri())).unwrap();
        let bytes = download_audio(&client(), url, 1024).await.unwrap();
        assert_eq!(bytes.as_ref(), b"OggS-end");
    }

    #[tokio::test]
    async fn test_download_rejects_redirect_chain_over_limit() {
        let server = MockServer::start().await;
        mount_redirect_chain(&server, MAX_REDIRECTS + 1).await;

        let url = Url::parse(&format!("{}/r0", server.uri())).unwrap();
        let err = download_audio(&client(), url, 1024).await.unwrap_err();
        assert!(matches!(err, STTError::DownloadError(_)));
    }

    #[tokio::test]
    async fn test_redirect_to_unsupported_scheme_blocked() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "ftp://example.com/a"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/start.ogg", server.uri())).unwrap();
        let err = download_audio(&client(), url, 1024).await.unwrap_err();
        assert!(matches!(err, STTError::DownloadError(_)));
    }

    #[tokio::test]
    async fn test_redirect_to_private_address_blocked() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("location", "http://127.0.0.1:1/secret"),
            )
            .mount(&server)
            .await;

        // Only redirect hops are screened here; the initial URL is validated upstream
        let strict = build_download_client(Duration::from_secs(5), false).unwrap();
        let url = Url::parse(&format!("{}/start.ogg", server.uri())).unwrap();
        let err = download_audio(&strict, url, 1024).await.unwrap_err();
        assert!(matches!(err, STTError::DownloadError(_)));
    }
}
