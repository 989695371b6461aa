use crate::catalog::{CatalogError, CatalogSource, Movie, MovieDetail};

/// Everything the detail screen renders for one movie.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub detail: MovieDetail,
    pub similar: Vec<Movie>,
    pub is_favorite: bool,
    /// Personal stars, 0 when unrated.
    pub user_rating: u8,
}

/// Fetch details and the first page of similar movies concurrently.
///
/// A failed similar request degrades to an empty list; a failed detail
/// request fails the whole view.
pub(crate) async fn load_detail(
    catalog: &dyn CatalogSource,
    id: u64,
) -> Result<(MovieDetail, Vec<Movie>), CatalogError> {
    let (detail, similar) = tokio::join!(catalog.fetch_details(id), catalog.fetch_similar(id, 1));

    let detail = detail?;
    let similar = match similar {
        Ok(page) => page.items,
        Err(e) => {
            tracing::warn!(movie_id = id, error = %e, "Similar movies unavailable");
            Vec::new()
        }
    };
    Ok((detail, similar))
}
