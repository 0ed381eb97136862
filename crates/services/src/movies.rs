//! Movie-rating questions built from a "most popular movies" catalog.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

use quiz_core::model::{Question, QuestionImage};

use crate::config::DEFAULT_RATING_THRESHOLD;
use crate::error::QuestionSourceError;
use crate::question_source::QuestionSource;

const RESIZED_POSTER_SUFFIX: &str = "._V0_UX600_.jpg";

//
// ─── CATALOG PAYLOAD ──────────────────────────────────────────────────────────
//

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Movie {
    pub title: String,
    #[serde(rename = "imDbRating", default)]
    pub rating: String,
    #[serde(rename = "image")]
    pub image_url: String,
}

impl Movie {
    /// Poster URL rewritten to the 600px-wide variant.
    ///
    /// Values without a size marker (bundled asset names) are returned unchanged.
    #[must_use]
    pub fn resized_image_url(&self) -> String {
        match self.image_url.split_once("._") {
            Some((base, _)) => format!("{base}{RESIZED_POSTER_SUFFIX}"),
            None => self.image_url.clone(),
        }
    }

    /// Parsed rating; unparsable or missing ratings count as `0.0`.
    #[must_use]
    pub fn rating_value(&self) -> f32 {
        self.rating
            .trim()
            .replace(',', ".")
            .parse::<f32>()
            .unwrap_or(0.0)
    }

    /// Build the yes/no question "rated higher than `threshold`?".
    #[must_use]
    pub fn to_question(&self, threshold: f32) -> Question {
        Question::new(
            QuestionImage::Reference(self.resized_image_url()),
            format!("Is this movie rated higher than {threshold}?"),
            self.rating_value() > threshold,
        )
    }
}

/// Top-level catalog payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MostPopularMovies {
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub items: Vec<Movie>,
}

/// Parse a catalog payload. A non-empty `errorMessage` is reported as a failure.
///
/// # Errors
///
/// Returns `QuestionSourceError` for malformed JSON or a service-reported error.
pub fn parse_catalog(json: &str) -> Result<MostPopularMovies, QuestionSourceError> {
    let catalog: MostPopularMovies = serde_json::from_str(json)
        .map_err(|e| QuestionSourceError::new(format!("invalid movie catalog: {e}")))?;
    if !catalog.error_message.trim().is_empty() {
        return Err(QuestionSourceError::new(catalog.error_message));
    }
    Ok(catalog)
}

//
// ─── LOADERS ──────────────────────────────────────────────────────────────────
//

/// Supplies the raw movie catalog.
#[async_trait]
pub trait MovieCatalogLoader: Send + Sync {
    /// # Errors
    ///
    /// Returns `QuestionSourceError` if the catalog cannot be obtained or parsed.
    async fn load_movies(&self) -> Result<MostPopularMovies, QuestionSourceError>;
}

/// Catalog held in memory as a JSON string.
#[derive(Debug, Clone)]
pub struct StaticCatalogLoader {
    json: String,
}

impl StaticCatalogLoader {
    #[must_use]
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

#[async_trait]
impl MovieCatalogLoader for StaticCatalogLoader {
    async fn load_movies(&self) -> Result<MostPopularMovies, QuestionSourceError> {
        parse_catalog(&self.json)
    }
}

/// Catalog read from a JSON file on every load.
#[derive(Debug, Clone)]
pub struct FileCatalogLoader {
    path: PathBuf,
}

impl FileCatalogLoader {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MovieCatalogLoader for FileCatalogLoader {
    async fn load_movies(&self) -> Result<MostPopularMovies, QuestionSourceError> {
        let json = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            QuestionSourceError::new(format!("cannot read {}: {e}", self.path.display()))
        })?;
        parse_catalog(&json)
    }
}

/// Bundled catalog of ten movies with known ratings.
#[must_use]
pub fn builtin_catalog() -> StaticCatalogLoader {
    StaticCatalogLoader::new(BUILTIN_CATALOG_JSON)
}

const BUILTIN_CATALOG_JSON: &str = r#"{
  "errorMessage": "",
  "items": [
    { "title": "The Godfather", "imDbRating": "9.2", "image": "The Godfather" },
    { "title": "The Dark Knight", "imDbRating": "9.0", "image": "The Dark Knight" },
    { "title": "Kill Bill", "imDbRating": "8.1", "image": "Kill Bill" },
    { "title": "The Avengers", "imDbRating": "8.0", "image": "The Avengers" },
    { "title": "Deadpool", "imDbRating": "8.0", "image": "Deadpool" },
    { "title": "The Green Knight", "imDbRating": "6.6", "image": "The Green Knight" },
    { "title": "Old", "imDbRating": "5.8", "image": "Old" },
    { "title": "The Ice Age Adventures of Buck Wild", "imDbRating": "4.3", "image": "The Ice Age Adventures of Buck Wild" },
    { "title": "Tesla", "imDbRating": "5.1", "image": "Tesla" },
    { "title": "Vivarium", "imDbRating": "5.8", "image": "Vivarium" }
  ]
}"#;

//
// ─── QUESTION SOURCE ──────────────────────────────────────────────────────────
//

/// Draws a random movie (with replacement) for every question.
pub struct MovieQuestionSource {
    loader: Arc<dyn MovieCatalogLoader>,
    threshold: f32,
    movies: Mutex<Vec<Movie>>,
    rng: Mutex<StdRng>,
}

impl MovieQuestionSource {
    #[must_use]
    pub fn new(loader: Arc<dyn MovieCatalogLoader>) -> Self {
        Self {
            loader,
            threshold: DEFAULT_RATING_THRESHOLD,
            movies: Mutex::new(Vec::new()),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Use a seeded generator so draws are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> QuestionSourceError {
    QuestionSourceError::new(e.to_string())
}

#[async_trait]
impl QuestionSource for MovieQuestionSource {
    async fn load_questions(&self) -> Result<Vec<Question>, QuestionSourceError> {
        let catalog = self.loader.load_movies().await?;
        debug!(movies = catalog.items.len(), "movie catalog loaded");

        let questions = catalog
            .items
            .iter()
            .map(|movie| movie.to_question(self.threshold))
            .collect();
        *self.movies.lock().map_err(poisoned)? = catalog.items;
        Ok(questions)
    }

    async fn next_question(&self) -> Result<Option<Question>, QuestionSourceError> {
        let movies = self.movies.lock().map_err(poisoned)?;
        let mut rng = self.rng.lock().map_err(poisoned)?;
        Ok(movies
            .choose(&mut *rng)
            .map(|movie| movie.to_question(self.threshold)))
    }
}
