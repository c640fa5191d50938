//! HTTP client for the dashboard backend
//!
//! Wraps the backend's JSON and media endpoints. [`DashboardClient`] is also the production
//! [`MediaTransport`] used by download runs.

use reqwest::Response;
use url::Url;

use crate::config::ApiConfig;
use crate::downloader::{MediaPayload, MediaTransport, TransferRequest};
use crate::error::{Error, Result};
use crate::types::{CommentRecord, CommentsResponse, Quality, VideoListResponse};
use crate::utils::resolve_filename;

/// Client for the dashboard backend's `/api` endpoints
#[derive(Clone, Debug)]
pub struct DashboardClient {
    http: reqwest::Client,
    base: Url,
}

impl DashboardClient {
    /// Create a client for the configured backend
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut base = Url::parse(&config.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = reqwest::Client::builder().user_agent("creator-dl");
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    fn endpoint_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    /// List the cached videos (`GET /api/videos`)
    pub async fn list_videos(&self) -> Result<VideoListResponse> {
        let url = self.endpoint("api/videos")?;
        let response = ensure_success(self.http.get(url).send().await?)?;
        Ok(response.json().await?)
    }

    /// Re-scrape the profile and return the refreshed cache (`POST /api/refresh`)
    pub async fn refresh_videos(&self) -> Result<VideoListResponse> {
        let url = self.endpoint("api/refresh")?;
        tracing::info!(url = %url, "Refreshing video cache");
        let response = self.http.post(url).send().await?;
        let status = response.status();
        let request_url = response.url().to_string();
        let text = response.text().await?;

        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(body) => {
                if let Some(message) = body.get("error").and_then(|e| e.as_str()) {
                    return Err(Error::Upstream(message.to_string()));
                }
                if !status.is_success() {
                    return Err(Error::Http {
                        status: status.as_u16(),
                        url: request_url,
                    });
                }
                Ok(serde_json::from_value(body)?)
            }
            Err(_) if !status.is_success() => Err(Error::Http {
                status: status.as_u16(),
                url: request_url,
            }),
            Err(e) => Err(Error::Serialization(e)),
        }
    }

    /// Fetch up to `limit` comments for a video (`GET /api/comments/{id}?limit=N`)
    ///
    /// An `{ "error": ... }` body becomes [`Error::Upstream`], whatever the status code.
    pub async fn fetch_comments(&self, identifier: &str, limit: u32) -> Result<CommentsResponse> {
        let path = format!("api/comments/{}", urlencoding::encode(identifier));
        let limit = limit.to_string();
        let url = self.endpoint_with_query(&path, &[("limit", &limit)])?;

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let request_url = response.url().to_string();
        let text = response.text().await?;

        match serde_json::from_str::<CommentsResponse>(&text) {
            Ok(CommentsResponse {
                error: Some(message),
                ..
            }) => Err(Error::Upstream(message)),
            Ok(body) if status.is_success() => Ok(body),
            Ok(_) => Err(Error::Http {
                status: status.as_u16(),
                url: request_url,
            }),
            Err(_) if !status.is_success() => Err(Error::Http {
                status: status.as_u16(),
                url: request_url,
            }),
            Err(e) => Err(Error::Serialization(e)),
        }
    }

    /// Download media through the extractor (`GET /api/download`)
    pub async fn download(
        &self,
        url: &str,
        quality: Quality,
        filename: &str,
    ) -> Result<MediaPayload> {
        let endpoint = self.endpoint_with_query(
            "api/download",
            &[
                ("url", url),
                ("quality", quality.as_str()),
                ("filename", filename),
            ],
        )?;
        self.fetch_payload(endpoint, filename).await
    }

    /// Download media from a pre-resolved CDN URL (`GET /api/download-direct`)
    pub async fn download_direct(&self, url: &str, filename: &str) -> Result<MediaPayload> {
        let endpoint = self.endpoint_with_query(
            "api/download-direct",
            &[("url", url), ("filename", filename)],
        )?;
        self.fetch_payload(endpoint, filename).await
    }

    /// URL of the image proxy for a remote image (`GET /api/proxy-image?url=..`)
    pub fn proxy_image_url(&self, image_url: &str) -> Result<String> {
        Ok(self
            .endpoint_with_query("api/proxy-image", &[("url", image_url)])?
            .to_string())
    }

    async fn fetch_payload(&self, endpoint: Url, advisory: &str) -> Result<MediaPayload> {
        tracing::debug!(url = %endpoint, "Requesting media");
        let response = ensure_success(self.http.get(endpoint).send().await?)?;
        let filename = resolve_filename(response.headers(), advisory);
        let bytes = response.bytes().await?;
        Ok(MediaPayload {
            filename,
            bytes: bytes.to_vec(),
        })
    }
}

fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Http {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

#[async_trait::async_trait]
impl MediaTransport for DashboardClient {
    async fn fetch_media(&self, request: &TransferRequest) -> Result<MediaPayload> {
        match request {
            TransferRequest::Direct { url, filename } => self.download_direct(url, filename).await,
            TransferRequest::Extract {
                source_url,
                quality,
                filename,
            } => self.download(source_url, *quality, filename).await,
        }
    }

    async fn fetch_comments(&self, identifier: &str, limit: u32) -> Result<Vec<CommentRecord>> {
        Ok(DashboardClient::fetch_comments(self, identifier, limit)
            .await?
            .comments)
    }
}
