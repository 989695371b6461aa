//! Remote catalog client.
//!
//! [`CatalogSource`] is the seam the listing machine and session depend on;
//! [`TmdbClient`] is the production implementation over reqwest.

mod client;
mod error;
mod models;
mod source;

pub use client::TmdbClient;
pub use error::CatalogError;
pub use models::{
    image_url, CastMember, Credits, CrewMember, Genre, Movie, MovieDetail, Page,
};
pub use source::CatalogSource;
