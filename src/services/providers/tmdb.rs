/// TMDB metadata provider
///
/// Thin client over the TMDB v3 API. The api key rides along as a query
/// parameter on every request. Timeouts are set per request: the probe
/// uses the short probe timeout, everything else the fetch timeout.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde_json::Value;

use crate::models::{Category, CategoryKind, MoviePage, MovieSummary};
use crate::services::providers::{MetadataProvider, UpstreamError};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    probe_timeout: Duration,
    fetch_timeout: Duration,
}

impl TmdbProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        probe_timeout: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            probe_timeout,
            fetch_timeout,
        }
    }

    fn category_url(&self, category: Category) -> String {
        match category.kind {
            CategoryKind::Trending => format!("{}/trending/movie/week", self.api_url),
            CategoryKind::Popular => format!("{}/movie/popular", self.api_url),
            CategoryKind::TopRated => format!("{}/movie/top_rated", self.api_url),
            CategoryKind::Genre(_) => format!("{}/discover/movie", self.api_url),
        }
    }

    async fn get_json(
        &self,
        url: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Value, UpstreamError> {
        let response = self
            .http_client
            .get(url)
            .timeout(timeout)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(UpstreamError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status(response.status().as_u16()));
        }

        response.json().await.map_err(UpstreamError::from_reqwest)
    }

    async fn get_page(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<MovieSummary>, UpstreamError> {
        let body = self.get_json(url, params, self.fetch_timeout).await?;
        let page: MoviePage =
            serde_json::from_value(body).map_err(|e| UpstreamError::Body(e.to_string()))?;
        Ok(page.results)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn probe(&self) -> Result<(), UpstreamError> {
        let url = format!("{}/trending/movie/week", self.api_url);
        let response = self
            .http_client
            .get(&url)
            .timeout(self.probe_timeout)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(UpstreamError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status(response.status().as_u16()));
        }

        Ok(())
    }

    async fn list_category(&self, category: Category) -> Result<Vec<MovieSummary>, UpstreamError> {
        let url = self.category_url(category);

        let results = match category.kind {
            CategoryKind::Genre(genre_id) => {
                let genre = genre_id.to_string();
                self.get_page(&url, &[("with_genres", genre.as_str())]).await?
            }
            _ => self.get_page(&url, &[]).await?,
        };

        tracing::debug!(
            category = category.name,
            results = results.len(),
            provider = "tmdb",
            "Category listing fetched"
        );

        Ok(results)
    }

    async fn search(&self, query: &str) -> Result<Value, UpstreamError> {
        let url = format!("{}/search/movie", self.api_url);
        let body = self
            .get_json(&url, &[("query", query)], self.fetch_timeout)
            .await?;

        tracing::info!(query = %query, provider = "tmdb", "Title search completed");

        Ok(body)
    }

    async fn details(&self, movie_id: u64) -> Result<Value, UpstreamError> {
        let url = format!("{}/movie/{}", self.api_url, movie_id);
        self.get_json(
            &url,
            &[("append_to_response", "videos,credits")],
            self.fetch_timeout,
        )
        .await
    }

    async fn recommendations(&self, movie_id: u64) -> Result<Vec<MovieSummary>, UpstreamError> {
        let url = format!("{}/movie/{}/recommendations", self.api_url, movie_id);
        let results = self.get_page(&url, &[]).await?;

        tracing::debug!(
            movie_id,
            results = results.len(),
            provider = "tmdb",
            "Upstream recommendations fetched"
        );

        Ok(results)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
