use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use cinefeed::config::ConfigStore;
use cinefeed::listing::{ListingKind, LoadOutcome};
use cinefeed::logging::init_tracing;
use cinefeed::session::{ListingView, Session};

#[derive(Parser, Debug)]
#[command(name = "cinefeed", version, about = "Browse, search and favorite movies from TMDB")]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List popular movies
    Popular {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Search movies by title
    Search {
        query: String,
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show details and similar movies
    Details { id: u64 },
    /// Rate a movie from 1 to 5 stars; repeating the current rating clears it
    Rate {
        id: u64,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        stars: u8,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesAction {
    /// List saved favorites
    List,
    /// Add or remove a movie by id
    Toggle { id: u64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = ConfigStore::open(cli.config).context("failed to load config")?;

    let session = Session::open(config.get()).context("failed to open session")?;
    let result = run(&session, cli.command).await;
    session.shutdown().await;
    result
}

async fn run(session: &Session, command: Command) -> Result<()> {
    match command {
        Command::Popular { pages } => {
            expect_applied(session.start().await)?;
            load_pages(session, ListingKind::Browse, pages).await?;
            print_listing(&session.view(ListingKind::Browse));
        }
        Command::Search { query, pages } => {
            let Some(handle) = session.on_search_submitted(&query) else {
                bail!(
                    "Query must have at least {} characters",
                    session.config().search.min_query_chars
                );
            };
            expect_applied(handle.await.context("search task failed")?)?;
            load_pages(session, ListingKind::Search, pages).await?;
            print_listing(&session.view(ListingKind::Search));
        }
        Command::Details { id } => {
            let view = session.open_detail(id).await?;
            let detail = &view.detail;
            let marker = if view.is_favorite { " [favorite]" } else { "" };
            println!("{}{}", format_title(&detail.movie), marker);
            if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.is_empty()) {
                println!("  {}", tagline);
            }
            if view.user_rating > 0 {
                println!("  Your rating: {}/5", view.user_rating);
            }
            if let Some(runtime) = detail.runtime {
                println!("  Runtime: {} min", runtime);
            }
            if !detail.genres.is_empty() {
                let genres: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
                println!("  Genres: {}", genres.join(", "));
            }
            let directors: Vec<&str> = detail.directors().map(|c| c.name.as_str()).collect();
            if !directors.is_empty() {
                println!("  Directed by: {}", directors.join(", "));
            }
            let top_cast = detail.top_cast(5);
            let cast: Vec<&str> = top_cast.iter().map(|c| c.name.as_str()).collect();
            if !cast.is_empty() {
                println!("  Starring: {}", cast.join(", "));
            }
            if let Some(overview) = detail.movie.overview.as_deref() {
                println!();
                println!("{}", overview);
            }
            if !view.similar.is_empty() {
                println!();
                println!("Similar:");
                for movie in view.similar.iter().take(10) {
                    println!("  {:>8}  {}", movie.id, format_title(movie));
                }
            }
        }
        Command::Rate { id, stars } => match session.on_rating_tapped(id, stars)? {
            0 => println!("Cleared rating for {}", id),
            stars => println!("Rated {}: {}/5", id, stars),
        },
        Command::Favorites { action } => match action {
            FavoritesAction::List => {
                let rows = session.favorites_view();
                if rows.is_empty() {
                    println!("No favorites yet.");
                }
                for row in rows {
                    println!("{:>8}  {}", row.movie.id, format_title(&row.movie));
                }
            }
            FavoritesAction::Toggle { id } => {
                let favorites = session.favorites();
                if favorites.contains(id) {
                    favorites.remove(id);
                    println!("Removed {} from favorites", id);
                } else {
                    let view = session.open_detail(id).await?;
                    let movie = view.detail.to_movie();
                    session.on_favorite_tapped(&movie);
                    println!("Added {} to favorites", format_title(&movie));
                }
            }
        },
    }
    Ok(())
}

/// Load pages 2..=`pages` of `kind`, stopping early at the last page.
async fn load_pages(session: &Session, kind: ListingKind, pages: u32) -> Result<()> {
    for _ in 1..pages {
        match session.listings().load_more(kind).await {
            LoadOutcome::Skipped => break,
            outcome => expect_applied(outcome)?,
        }
    }
    Ok(())
}

fn expect_applied(outcome: LoadOutcome) -> Result<()> {
    match outcome {
        LoadOutcome::Applied => Ok(()),
        LoadOutcome::Failed(e) => Err(e.into()),
        other => bail!("Load did not complete: {:?}", other),
    }
}

fn print_listing(view: &ListingView) {
    for row in &view.rows {
        let star = if row.is_favorite { "*" } else { " " };
        println!("{} {:>8}  {}", star, row.movie.id, format_title(&row.movie));
    }
    println!(
        "-- page {} of {} ({} movies)",
        view.current_page,
        view.total_pages,
        view.rows.len()
    );
}

fn format_title(movie: &cinefeed::catalog::Movie) -> String {
    match movie.release_year() {
        Some(year) => format!("{} ({})", movie.title, year),
        None => movie.title.clone(),
    }
}
