//! Movie metadata types.
//!
//! Shapes follow the TMDB v3 movie payloads; only the fields the hero
//! section and the info modal read are modelled.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Base URL for full-size TMDB images.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

/// Details of a single movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieInfo {
    /// Provider identifier
    pub id: u64,
    /// Localized title (`name` for TV payloads)
    #[serde(alias = "name")]
    pub title: String,
    /// Synopsis
    #[serde(default)]
    pub overview: String,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Release date as sent by the provider (`YYYY-MM-DD`)
    #[serde(default)]
    pub release_date: Option<String>,
    /// Average vote, 0-10
    #[serde(default)]
    pub vote_average: Option<f64>,
    /// Backdrop image path
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Poster image path
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Genres
    #[serde(default)]
    pub genres: Vec<GenreRef>,
    /// Production countries
    #[serde(default)]
    pub production_countries: Vec<Country>,
    /// Production companies
    #[serde(default)]
    pub production_companies: Vec<Company>,
}

impl MovieInfo {
    /// Full URL of the backdrop image.
    #[must_use]
    pub fn backdrop_url(&self) -> Option<String> {
        self.backdrop_path.as_deref().map(image_url)
    }

    /// Runtime as `"2h 15min"`.
    #[must_use]
    pub fn runtime_label(&self) -> Option<String> {
        self.runtime.map(format_runtime)
    }
}

/// Genre reference embedded in a movie payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreRef {
    /// Genre id
    pub id: u32,
    /// Localized genre name
    pub name: String,
}

/// Production country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 code
    #[serde(default)]
    pub iso_3166_1: String,
    /// Country name
    pub name: String,
}

/// Production company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Company name
    pub name: String,
    /// Logo image path
    #[serde(default)]
    pub logo_path: Option<String>,
}

/// A video attached to a movie (trailer, teaser, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieVideo {
    /// Key on the hosting site (a YouTube video id)
    pub key: String,
    /// Hosting site
    #[serde(default)]
    pub site: String,
    /// Video title
    #[serde(default)]
    pub name: String,
    /// Video type, e.g. `Trailer`
    #[serde(default, rename = "type")]
    pub kind: String,
}

/// Builds the full URL for an image path returned by the provider.
#[must_use]
pub fn image_url(path: &str) -> String {
    format!("{IMAGE_BASE_URL}/{}", path.trim_start_matches('/'))
}

/// Formats a runtime in minutes as `"1h 05min"`, or `"45min"` under an hour.
#[must_use]
pub fn format_runtime(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours == 0 {
        format!("{rest}min")
    } else {
        format!("{hours}h {rest:02}min")
    }
}

/// A genre users can pick as a profile preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Genre {
    /// Provider genre id
    pub id: u32,
    /// Display title
    pub title: &'static str,
}

/// Movie genres offered when creating a profile.
pub const GENRES: &[Genre] = &[
    Genre { id: 28, title: "Ação" },
    Genre { id: 12, title: "Aventura" },
    Genre { id: 16, title: "Animação" },
    Genre { id: 35, title: "Comédia" },
    Genre { id: 80, title: "Crime" },
    Genre { id: 99, title: "Documentário" },
    Genre { id: 18, title: "Drama" },
    Genre { id: 10751, title: "Família" },
    Genre { id: 14, title: "Fantasia" },
    Genre { id: 36, title: "História" },
    Genre { id: 27, title: "Terror" },
    Genre { id: 10402, title: "Música" },
    Genre { id: 9648, title: "Mistério" },
    Genre { id: 10749, title: "Romance" },
    Genre { id: 878, title: "Ficção científica" },
    Genre { id: 10770, title: "Cinema TV" },
    Genre { id: 53, title: "Thriller" },
    Genre { id: 10752, title: "Guerra" },
    Genre { id: 37, title: "Faroeste" },
];

/// Looks up a genre by title, ignoring case.
#[must_use]
pub fn genre_by_title(title: &str) -> Option<Genre> {
    let wanted = title.trim().to_lowercase();
    GENRES
        .iter()
        .copied()
        .find(|g| g.title.to_lowercase() == wanted)
}

/// Maps genre titles to the id strings stored as profile preferences.
///
/// # Errors
///
/// Returns an error naming the first unknown title.
pub fn genre_ids<S: AsRef<str>>(titles: &[S]) -> DomainResult<Vec<String>> {
    titles
        .iter()
        .map(|title| {
            genre_by_title(title.as_ref())
                .map(|g| g.id.to_string())
                .ok_or_else(|| DomainError::UnknownGenre(title.as_ref().to_string()))
        })
        .collect()
}
