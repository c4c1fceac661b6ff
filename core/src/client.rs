//! Discogs catalog client.
//!
//! Every method returns [`UpstreamError`] on failure; nothing here is fatal
//! for the caller.

use crate::config::CatalogConfig;
use crate::error::{Error, UpstreamError};
use crate::models::{ImageCandidate, ImageType, ReleaseId};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = concat!("recordshelf/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseDetail {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<ReleaseImage>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tracklist: Vec<ReleaseTrack>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseImage {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub resource_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReleaseTrack {
    #[serde(default)]
    pub title: Option<String>,
}

impl ReleaseDetail {
    /// Candidates in payload order. Entries without any URL are dropped.
    pub fn image_candidates(&self) -> Vec<ImageCandidate> {
        self.images
            .iter()
            .filter_map(|image| {
                let url = [image.uri.as_deref(), image.resource_url.as_deref()]
                    .into_iter()
                    .flatten()
                    .map(str::trim)
                    .find(|url| !url.is_empty())?;
                Some(ImageCandidate::new(
                    ImageType::parse(image.kind.as_deref()),
                    url,
                ))
            })
            .collect()
    }

    pub fn track_titles(&self) -> Vec<String> {
        self.tracklist
            .iter()
            .filter_map(|track| track.title.clone())
            .collect()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone)]
pub struct DownloadedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    api_base: String,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Discogs token={}", token))
                .map_err(|e| Error::Client(format!("invalid DISCOGS_TOKEN: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_release_detail(&self, id: ReleaseId) -> Result<ReleaseDetail, UpstreamError> {
        let url = format!("{}/releases/{}", self.api_base, id);
        let response = self.client.get(&url).send().await?;
        let response = check_status(response, &url)?;

        let body = response.bytes().await?;
        serde_json::from_slice::<ReleaseDetail>(&body).map_err(|e| UpstreamError::Decode {
            url,
            message: e.to_string(),
        })
    }

    pub async fn download_image(&self, url: &str) -> Result<DownloadedImage, UpstreamError> {
        let response = self.client.get(url).send().await?;
        let response = check_status(response, url)?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        if bytes.is_empty() {
            return Err(UpstreamError::Decode {
                url: url.to_string(),
                message: "empty image body".to_string(),
            });
        }

        Ok(DownloadedImage {
            bytes,
            content_type,
        })
    }
}

fn check_status(
    response: reqwest::Response,
    url: &str,
) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        return Err(UpstreamError::RateLimited {
            url: url.to_string(),
            retry_after,
        });
    }
    if !status.is_success() {
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response)
}
