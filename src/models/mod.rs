use serde::{Deserialize, Serialize};

/// A movie summary as rendered in category listings, search results, and
/// recommendations.
///
/// The field names are the contract with the presentation layer; upstream
/// responses carry many more fields, which are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// A page of movie summaries as returned by the metadata source list
/// endpoints (`results` is the only field the core consumes).
#[derive(Debug, Clone, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

/// One row of the local movie dataset.
///
/// The dataset is MovieLens-shaped CSV; `movieId` is accepted as an alias
/// so stock exports load without renaming columns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieRecord {
    #[serde(alias = "movieId")]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genres: String,
}

/// How a category maps onto the metadata source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Trending,
    Popular,
    TopRated,
    /// Discover endpoint filtered by a genre id.
    Genre(u32),
}

/// A named category in the batch listing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub kind: CategoryKind,
}

/// The fixed category set served by `/api/movies/categories`.
pub const CATEGORIES: [Category; 8] = [
    Category { name: "trending", kind: CategoryKind::Trending },
    Category { name: "popular", kind: CategoryKind::Popular },
    Category { name: "top_rated", kind: CategoryKind::TopRated },
    Category { name: "action", kind: CategoryKind::Genre(28) },
    Category { name: "comedy", kind: CategoryKind::Genre(35) },
    Category { name: "horror", kind: CategoryKind::Genre(27) },
    Category { name: "romance", kind: CategoryKind::Genre(10749) },
    Category { name: "sci_fi", kind: CategoryKind::Genre(878) },
];

/// Fixed placeholder listing substituted when the metadata source is
/// unreachable or a single category fetch fails.
pub fn placeholder_movies() -> Vec<MovieSummary> {
    const VOTES: [f64; 5] = [8.5, 7.8, 7.2, 8.0, 7.5];
    const DATES: [&str; 5] = [
        "2024-01-01",
        "2024-02-01",
        "2024-03-01",
        "2024-04-01",
        "2024-05-01",
    ];

    (0..5)
        .map(|i| MovieSummary {
            id: i as u64 + 1,
            title: String::new(),
            poster_path: None,
            vote_average: Some(VOTES[i]),
            release_date: Some(DATES[i].to_string()),
        })
        .collect()
}

/// Single synthetic result substituted when a search fetch fails, so the
/// caller always has at least one row to render.
pub fn synthetic_search_result(query: &str) -> MovieSummary {
    MovieSummary {
        id: 27205,
        title: format!("Movie: {}", query),
        poster_path: None,
        vote_average: Some(7.5),
        release_date: Some("2024-01-01".to_string()),
    }
}
