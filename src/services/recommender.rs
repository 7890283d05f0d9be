use std::collections::HashMap;

use crate::models::{MovieRecord, MovieSummary};
use crate::services::similarity::SimilarityIndex;

/// Content-based recommender over the local movie dataset.
///
/// Wraps the similarity index built at startup. Every failure path (index
/// absent, unknown id) degrades to an empty result; `recommend` never
/// errors, so callers need no fallback of their own.
pub struct Recommender {
    records: Vec<MovieRecord>,
    by_id: HashMap<u64, usize>,
    index: Option<SimilarityIndex>,
}

impl Recommender {
    /// Builds the recommender and its similarity index from the dataset.
    pub fn new(records: Vec<MovieRecord>) -> Self {
        let index = SimilarityIndex::build(&records);
        if index.is_none() {
            tracing::warn!("Movie dataset is empty, recommendations disabled");
        } else {
            tracing::info!(movies = records.len(), "Similarity index built");
        }

        let mut by_id = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            by_id.entry(record.id).or_insert(i);
        }

        Self {
            records,
            by_id,
            index,
        }
    }

    /// The degraded recommender used when the dataset failed to load.
    pub fn disabled() -> Self {
        Self {
            records: Vec::new(),
            by_id: HashMap::new(),
            index: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.index.is_some()
    }

    /// Returns up to `count` movie ids ordered by genre similarity to
    /// `movie_id`, most similar first.
    ///
    /// The query movie itself is excluded. Ties keep dataset order, so the
    /// output is deterministic for a fixed index. Unknown ids and an absent
    /// index both yield an empty list.
    pub fn recommend(&self, movie_id: u64, count: usize) -> Vec<u64> {
        let Some(index) = &self.index else {
            return Vec::new();
        };
        let Some(query_row) = index.row_index(movie_id) else {
            return Vec::new();
        };
        let Some(scores) = index.row(movie_id) else {
            return Vec::new();
        };

        let mut scored: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
        // Stable sort keeps collection order for equal scores.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .filter(|&(row, _)| row != query_row)
            .take(count)
            .map(|(row, _)| index.id_at(row))
            .collect()
    }

    /// Maps recommended ids back to summaries in the upstream response
    /// shape. Only the id and title come from the dataset; media fields are
    /// absent.
    pub fn summaries_for(&self, movie_ids: &[u64]) -> Vec<MovieSummary> {
        movie_ids
            .iter()
            .filter_map(|id| self.by_id.get(id).map(|&i| &self.records[i]))
            .map(|record| MovieSummary {
                id: record.id,
                title: record.title.clone(),
                poster_path: None,
                vote_average: None,
                release_date: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, genres: &str) -> MovieRecord {
        MovieRecord {
            id,
            title: format!("Movie {}", id),
            genres: genres.to_string(),
        }
    }

    fn fixture() -> Recommender {
        Recommender::new(vec![
            record(1, "Action|Adventure"),
            record(2, "Action|Adventure"),
            record(3, "Action|Comedy"),
            record(4, "Comedy|Romance"),
            record(5, "Drama"),
            record(6, ""),
        ])
    }

    #[test]
    fn test_recommend_respects_count_and_excludes_query() {
        let recommender = fixture();

        for count in 0..8 {
            let results = recommender.recommend(1, count);
            assert!(results.len() <= count);
            assert!(!results.contains(&1));
        }
    }

    #[test]
    fn test_recommend_has_no_duplicates() {
        let recommender = fixture();
        let results = recommender.recommend(1, 10);
        let mut deduped = results.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), results.len());
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let recommender = fixture();
        let first = recommender.recommend(3, 10);
        for _ in 0..5 {
            assert_eq!(recommender.recommend(3, 10), first);
        }
    }

    #[test]
    fn test_recommend_orders_by_similarity() {
        let recommender = fixture();
        // Movie 2 shares both genres with movie 1; movie 3 shares one.
        let results = recommender.recommend(1, 3);
        assert_eq!(results[0], 2);
        assert_eq!(results[1], 3);
    }

    #[test]
    fn test_ties_keep_dataset_order() {
        // Movies 2 and 3 are interchangeable neighbors of movie 1.
        let recommender = Recommender::new(vec![
            record(1, "Action"),
            record(2, "Action"),
            record(3, "Action"),
        ]);
        assert_eq!(recommender.recommend(1, 10), vec![2, 3]);
    }

    #[test]
    fn test_unknown_id_yields_empty() {
        let recommender = fixture();
        assert!(recommender.recommend(999, 10).is_empty());
    }

    #[test]
    fn test_disabled_recommender_yields_empty_for_any_input() {
        let recommender = Recommender::disabled();
        assert!(!recommender.is_enabled());
        assert!(recommender.recommend(1, 10).is_empty());
        assert!(recommender.recommend(0, 0).is_empty());
        assert!(recommender.summaries_for(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn test_summaries_carry_dataset_titles() {
        let recommender = fixture();
        let summaries = recommender.summaries_for(&[2, 4]);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, 2);
        assert_eq!(summaries[0].title, "Movie 2");
        assert_eq!(summaries[0].poster_path, None);
        assert_eq!(summaries[1].id, 4);
    }

    #[test]
    fn test_summaries_skip_unknown_ids() {
        let recommender = fixture();
        let summaries = recommender.summaries_for(&[2, 999]);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, 2);
    }
}
