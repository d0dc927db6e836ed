/// Recommendation engine client
///
/// API Flow: `POST {base}/recommend` with `{"movie_name": query}` returns
/// `{"recommendations": [title, ...]}`.
use crate::{
    error::{AppError, AppResult},
    models::{RecommendationList, SearchQuery},
    services::providers::RecommendationProvider,
};
use reqwest::Client as HttpClient;
use serde::Serialize;

const SERVICE: &str = "recommender";

#[derive(Debug, Serialize)]
struct RecommendRequest<'a> {
    movie_name: &'a str,
}

#[derive(Clone)]
pub struct HttpRecommender {
    http_client: HttpClient,
    api_url: String,
}

impl HttpRecommender {
    pub fn new(http_client: HttpClient, api_url: String) -> Self {
        Self {
            http_client,
            api_url,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/recommend", self.api_url.trim_end_matches('/'))
    }

    fn parse_body(body: &str) -> AppResult<Vec<String>> {
        let list: RecommendationList =
            serde_json::from_str(body).map_err(|e| AppError::malformed(SERVICE, e))?;
        Ok(list.recommendations)
    }
}

#[async_trait::async_trait]
impl RecommendationProvider for HttpRecommender {
    async fn recommend(&self, query: &SearchQuery) -> AppResult<Vec<String>> {
        let response = self
            .http_client
            .post(self.endpoint())
            .json(&RecommendRequest {
                movie_name: query.as_str(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                query = %query,
                status = %status,
                "Recommendation request failed"
            );
            return Err(AppError::upstream_status(SERVICE, status.as_u16(), &body));
        }

        let body = response.text().await?;
        let titles = Self::parse_body(&body)?;

        tracing::info!(
            query = %query,
            candidates = titles.len(),
            provider = SERVICE,
            "Recommendations received"
        );

        Ok(titles)
    }
}
