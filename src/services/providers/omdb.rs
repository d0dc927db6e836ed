/// OMDB-style metadata provider
///
/// Resolves a title by exact match: `GET {base}/?t={title}&apikey={key}`.
/// Unknown titles come back as 200 with `"Response": "False"`, which is passed
/// through so callers can decide whether to keep the record.
use crate::{
    error::{AppError, AppResult},
    models::MovieRecord,
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;

const SERVICE: &str = "metadata";

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbProvider {
    pub fn new(http_client: HttpClient, api_url: String, api_key: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/", self.api_url.trim_end_matches('/'))
    }

    fn parse_body(body: &str) -> AppResult<MovieRecord> {
        serde_json::from_str(body).map_err(|e| AppError::malformed(SERVICE, e))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbProvider {
    async fn lookup(&self, title: &str) -> AppResult<MovieRecord> {
        let response = self
            .http_client
            .get(self.endpoint())
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                title = %title,
                status = %status,
                "Metadata lookup failed"
            );
            return Err(AppError::upstream_status(SERVICE, status.as_u16(), &body));
        }

        let body = response.text().await?;
        let record = Self::parse_body(&body)?;

        tracing::debug!(
            title = %title,
            found = record.found,
            provider = SERVICE,
            "Metadata fetched"
        );

        Ok(record)
    }
}
