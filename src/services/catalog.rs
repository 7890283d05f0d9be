use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::models::{self, MovieSummary, CATEGORIES};
use crate::services::providers::{MetadataProvider, UpstreamError};
use crate::services::recommender::Recommender;

/// Upstream listings are truncated to this many entries.
pub const MAX_LIST_LEN: usize = 10;

/// Resilient front for the metadata source.
///
/// Every call class has its own degradation contract: category batches and
/// search substitute fixed fallback data and always succeed, detail lookups
/// surface not-found explicitly, and recommendations prefer upstream with
/// the local recommender as fallback.
pub struct CatalogService {
    provider: Arc<dyn MetadataProvider>,
}

impl CatalogService {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self { provider }
    }

    /// Fetches all category listings as one batch.
    ///
    /// A single probe gates the batch: if the upstream looks unreachable,
    /// every category gets the placeholder list without paying one timeout
    /// per category. The probe is a latency-saving heuristic, not a health
    /// guarantee; a category whose own fetch fails still degrades alone.
    pub async fn categories(&self) -> BTreeMap<&'static str, Vec<MovieSummary>> {
        if let Err(e) = self.provider.probe().await {
            tracing::warn!(
                error = %e,
                provider = self.provider.name(),
                "Upstream probe failed, serving placeholder catalog"
            );
            return CATEGORIES
                .iter()
                .map(|c| (c.name, models::placeholder_movies()))
                .collect();
        }

        // One task per category; a failure substitutes placeholders for
        // that category only.
        let mut tasks = Vec::new();
        for category in CATEGORIES {
            let provider = Arc::clone(&self.provider);
            let task = tokio::spawn(async move { provider.list_category(category).await });
            tasks.push((category.name, task));
        }

        let mut results = BTreeMap::new();
        for (name, task) in tasks {
            let movies = match task.await {
                Ok(Ok(mut movies)) => {
                    movies.truncate(MAX_LIST_LEN);
                    movies
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        category = name,
                        error = %e,
                        "Category fetch failed, substituting placeholders"
                    );
                    models::placeholder_movies()
                }
                Err(e) => {
                    tracing::error!(category = name, error = %e, "Category task join error");
                    models::placeholder_movies()
                }
            };
            results.insert(name, movies);
        }

        results
    }

    /// Searches movies by title.
    ///
    /// An empty query is the caller's error and is rejected before any
    /// upstream call. Upstream failures degrade to a single synthetic
    /// result embedding the query text, returned with success status.
    pub async fn search(&self, query: &str) -> AppResult<Value> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Please provide a search query".to_string(),
            ));
        }

        match self.provider.search(query).await {
            Ok(body) => Ok(body),
            Err(e) => {
                tracing::warn!(
                    query = %query,
                    error = %e,
                    "Search fetch failed, substituting synthetic result"
                );
                Ok(json!({
                    "results": [models::synthetic_search_result(query)]
                }))
            }
        }
    }

    /// Fetches details for one movie.
    ///
    /// No fallback fabrication here: callers must distinguish "does not
    /// exist" (any non-success status) from a degraded upstream, which
    /// propagates as an upstream error.
    pub async fn movie_details(&self, movie_id: u64) -> AppResult<Value> {
        match self.provider.details(movie_id).await {
            Ok(body) => Ok(body),
            Err(UpstreamError::Status(status)) => {
                tracing::debug!(movie_id, status, "Movie details not found");
                Err(AppError::NotFound("Movie not found".to_string()))
            }
            Err(e) => Err(AppError::Upstream(e)),
        }
    }

    /// Combined recommendations for one movie.
    ///
    /// Upstream results are preferred; on any upstream failure the local
    /// recommender supplies the list instead. Never errors.
    pub async fn recommendations(
        &self,
        movie_id: u64,
        recommender: &Recommender,
    ) -> Vec<MovieSummary> {
        match self.provider.recommendations(movie_id).await {
            Ok(mut movies) => {
                movies.truncate(MAX_LIST_LEN);
                movies
            }
            Err(e) => {
                tracing::warn!(
                    movie_id,
                    error = %e,
                    "Upstream recommendations failed, falling back to local index"
                );
                let ids = recommender.recommend(movie_id, MAX_LIST_LEN);
                recommender.summaries_for(&ids)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, MovieRecord};
    use crate::services::providers::MockMetadataProvider;

    fn summary(id: u64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            poster_path: None,
            vote_average: Some(6.0),
            release_date: None,
        }
    }

    fn catalog(mock: MockMetadataProvider) -> CatalogService {
        CatalogService::new(Arc::new(mock))
    }

    fn local_recommender() -> Recommender {
        Recommender::new(vec![
            MovieRecord {
                id: 1,
                title: "Heat".to_string(),
                genres: "Action|Crime".to_string(),
            },
            MovieRecord {
                id: 2,
                title: "Ronin".to_string(),
                genres: "Action|Crime".to_string(),
            },
            MovieRecord {
                id: 3,
                title: "Clueless".to_string(),
                genres: "Comedy".to_string(),
            },
        ])
    }

    #[tokio::test]
    async fn test_probe_failure_yields_placeholders_for_every_category() {
        let mut mock = MockMetadataProvider::new();
        mock.expect_probe()
            .returning(|| Err(UpstreamError::Connect("connection refused".to_string())));
        mock.expect_name().return_const("mock");
        // No list_category calls may happen after a failed probe.
        mock.expect_list_category().times(0);

        let results = catalog(mock).categories().await;

        assert_eq!(results.len(), CATEGORIES.len());
        let placeholders = models::placeholder_movies();
        for category in CATEGORIES {
            assert_eq!(results[category.name], placeholders);
        }
    }

    #[tokio::test]
    async fn test_single_category_failure_degrades_alone() {
        let mut mock = MockMetadataProvider::new();
        mock.expect_probe().returning(|| Ok(()));
        mock.expect_list_category()
            .withf(|c: &Category| c.name == "horror")
            .returning(|_| Err(UpstreamError::Timeout));
        mock.expect_list_category()
            .withf(|c: &Category| c.name != "horror")
            .returning(|c| Ok(vec![summary(100, c.name)]));

        let results = catalog(mock).categories().await;

        assert_eq!(results["horror"], models::placeholder_movies());
        for category in CATEGORIES.iter().filter(|c| c.name != "horror") {
            assert_eq!(results[category.name].len(), 1);
            assert_eq!(results[category.name][0].id, 100);
        }
    }

    #[tokio::test]
    async fn test_category_listings_truncated_to_ten() {
        let mut mock = MockMetadataProvider::new();
        mock.expect_probe().returning(|| Ok(()));
        mock.expect_list_category()
            .returning(|_| Ok((0..20).map(|i| summary(i, "m")).collect()));

        let results = catalog(mock).categories().await;
        assert!(results.values().all(|movies| movies.len() == MAX_LIST_LEN));
    }

    #[tokio::test]
    async fn test_empty_search_query_rejected_without_upstream_call() {
        let mut mock = MockMetadataProvider::new();
        mock.expect_search().times(0);

        let result = catalog(mock).search("   ").await;
        match result {
            Err(AppError::InvalidInput(msg)) => {
                assert_eq!(msg, "Please provide a search query")
            }
            other => panic!("expected InvalidInput, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_search_success_passes_body_through() {
        let body = json!({"page": 1, "results": [{"id": 603, "title": "The Matrix"}]});
        let expected = body.clone();

        let mut mock = MockMetadataProvider::new();
        mock.expect_search()
            .returning(move |_| Ok(body.clone()));

        let result = catalog(mock).search("matrix").await.unwrap();
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_search_failure_substitutes_synthetic_result() {
        let mut mock = MockMetadataProvider::new();
        mock.expect_search()
            .returning(|_| Err(UpstreamError::Timeout));

        let result = catalog(mock).search("blade runner").await.unwrap();
        let results = result["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["title"], "Movie: blade runner");
    }

    #[tokio::test]
    async fn test_details_status_maps_to_not_found() {
        let mut mock = MockMetadataProvider::new();
        mock.expect_details()
            .returning(|_| Err(UpstreamError::Status(404)));

        let result = catalog(mock).movie_details(999999).await;
        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Movie not found"),
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_details_success_passes_body_through() {
        let body = json!({"id": 603, "title": "The Matrix", "videos": {"results": []}});
        let expected = body.clone();

        let mut mock = MockMetadataProvider::new();
        mock.expect_details().returning(move |_| Ok(body.clone()));

        let result = catalog(mock).movie_details(603).await.unwrap();
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_details_transport_error_propagates() {
        let mut mock = MockMetadataProvider::new();
        mock.expect_details()
            .returning(|_| Err(UpstreamError::Timeout));

        let result = catalog(mock).movie_details(603).await;
        assert!(matches!(result, Err(AppError::Upstream(UpstreamError::Timeout))));
    }

    #[tokio::test]
    async fn test_recommendations_prefer_upstream() {
        let mut mock = MockMetadataProvider::new();
        mock.expect_recommendations()
            .returning(|_| Ok((0..15).map(|i| summary(i + 500, "upstream")).collect()));

        let results = catalog(mock)
            .recommendations(1, &local_recommender())
            .await;

        assert_eq!(results.len(), MAX_LIST_LEN);
        assert_eq!(results[0].id, 500);
    }

    #[tokio::test]
    async fn test_recommendations_fall_back_to_local_index() {
        let mut mock = MockMetadataProvider::new();
        mock.expect_recommendations()
            .returning(|_| Err(UpstreamError::Connect("unreachable".to_string())));

        let results = catalog(mock)
            .recommendations(1, &local_recommender())
            .await;

        // Movie 2 shares both genres with movie 1 and must come back first.
        assert_eq!(results[0].id, 2);
        assert_eq!(results[0].title, "Ronin");
        assert!(results.iter().all(|m| m.id != 1));
    }

    #[tokio::test]
    async fn test_recommendations_never_error_with_disabled_recommender() {
        let mut mock = MockMetadataProvider::new();
        mock.expect_recommendations()
            .returning(|_| Err(UpstreamError::Timeout));

        let results = catalog(mock)
            .recommendations(42, &Recommender::disabled())
            .await;
        assert!(results.is_empty());
    }
}
