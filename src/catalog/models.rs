//! Wire and domain types for the remote catalog.

use serde::{Deserialize, Serialize};

/// A movie as it appears in listings. Identified solely by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl Movie {
    /// Minimal movie with only id and title set.
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            backdrop_path: None,
            overview: None,
            release_date: None,
            vote_average: None,
            vote_count: None,
            genre_ids: Vec::new(),
        }
    }

    /// Release year parsed from `release_date` ("YYYY-MM-DD").
    pub fn release_year(&self) -> Option<u16> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(..4))
            .and_then(|y| y.parse().ok())
    }
}

/// One page of results, normalized from the wire format.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Movie>,
    pub page_number: u32,
    pub total_pages: u32,
}

impl Page {
    pub fn new(items: Vec<Movie>, page_number: u32, total_pages: u32) -> Self {
        Self {
            items,
            page_number,
            total_pages,
        }
    }
}

/// Paginated response body as returned by `/movie/popular` and `/search/movie`.
#[derive(Debug, Deserialize)]
pub(crate) struct PageResponse {
    #[serde(default)]
    page: i64,
    #[serde(default)]
    results: Vec<Movie>,
    #[serde(default)]
    total_pages: i64,
}

impl From<PageResponse> for Page {
    fn from(wire: PageResponse) -> Self {
        // Negative counts clamp to 0; the listing reducer floors them to 1.
        Page {
            items: wire.results,
            page_number: clamp_count(wire.page),
            total_pages: clamp_count(wire.total_pages),
        }
    }
}

fn clamp_count(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// Detail payload: a superset of [`Movie`] with genres and credits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub credits: Credits,
}

impl MovieDetail {
    /// Listing-shaped snapshot of this movie, suitable for favoriting.
    ///
    /// The detail endpoint reports `genres` instead of `genre_ids`, so the
    /// ids are filled from there when absent.
    pub fn to_movie(&self) -> Movie {
        let mut movie = self.movie.clone();
        if movie.genre_ids.is_empty() {
            movie.genre_ids = self.genres.iter().map(|g| g.id).collect();
        }
        movie
    }

    /// Crew members with the "Director" job.
    pub fn directors(&self) -> impl Iterator<Item = &CrewMember> {
        self.credits
            .crew
            .iter()
            .filter(|c| c.job.as_deref() == Some("Director"))
    }

    /// Top-billed cast, ordered by billing position.
    pub fn top_cast(&self, limit: usize) -> Vec<&CastMember> {
        let mut cast: Vec<&CastMember> = self.credits.cast.iter().collect();
        cast.sort_by_key(|c| c.order.unwrap_or(u32::MAX));
        cast.truncate(limit);
        cast
    }
}

/// Build an image URL from a TMDB file path (e.g. "/abc.jpg").
///
/// `size` is a TMDB size bucket such as "w500" or "original".
pub fn image_url(image_base_url: &str, size: &str, path: Option<&str>) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    let base = image_base_url.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{}/{}{}", base, size, path))
    } else {
        Some(format!("{}/{}/{}", base, size, path))
    }
}
