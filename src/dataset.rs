use std::io::Read;
use std::path::Path;

use crate::error::AppResult;
use crate::models::MovieRecord;

/// Loads the movie dataset from a MovieLens-shaped CSV file.
///
/// Rows that fail to parse abort the load; the caller treats any error as
/// "dataset absent" and runs with recommendations disabled.
pub fn load_movies(path: impl AsRef<Path>) -> AppResult<Vec<MovieRecord>> {
    let reader = csv::Reader::from_path(path.as_ref())?;
    let records = read_movies(reader)?;

    tracing::info!(
        movies = records.len(),
        path = %path.as_ref().display(),
        "Movie dataset loaded"
    );

    Ok(records)
}

fn read_movies<R: Read>(mut reader: csv::Reader<R>) -> AppResult<Vec<MovieRecord>> {
    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: MovieRecord = row?;
        records.push(record);
    }
    Ok(records)
}
