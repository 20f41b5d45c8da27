use clap::{Parser, Subcommand};
use core_types::{Movie, Runtime};
use database::connection::{connect, run_migrations};
use database::repository::MovieRepository;
use database::{DbError, Filters};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// The main entry point for the cinelog catalog service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file, if one is present.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config()?;
    let db_pool = connect(
        config.database.max_connections,
        Duration::from_secs(config.database.acquire_timeout_secs),
    )
    .await?;
    run_migrations(&db_pool).await?;

    let mut repo = MovieRepository::new(db_pool);
    if let Some(secs) = config.database.query_deadline_secs {
        // The configured deadline may only shorten the built-in default.
        repo = repo.with_deadline(Duration::from_secs(secs));
    }

    // Execute the appropriate command
    match cli.command {
        Commands::Migrate => {
            tracing::info!("database migrations applied");
        }
        Commands::Seed => handle_seed(&repo).await?,
        Commands::List(args) => handle_list(args, &repo).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Operational entry points for the movie-catalog persistence layer.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the embedded database migrations and exit.
    Migrate,
    /// Insert a handful of sample records through the repository.
    Seed,
    /// Print the catalog entries matching a filter as JSON.
    List(ListArgs),
}

#[derive(Parser)]
struct ListArgs {
    /// Full-text title filter; empty matches everything.
    #[arg(long, default_value = "")]
    title: String,

    /// Genre tags the records must all carry (repeatable).
    #[arg(long)]
    genre: Vec<String>,

    /// The page number to fetch.
    #[arg(long, default_value_t = 1)]
    page: i64,

    /// The number of records per page.
    #[arg(long, default_value_t = 20)]
    page_size: i64,

    /// Sort field: id, title, year or runtime, with a leading '-' for descending.
    #[arg(long, default_value = "id")]
    sort: String,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Inserts a few sample movies, skipping any that collide with records a
/// previous seed run already created.
async fn handle_seed(repo: &MovieRepository) -> anyhow::Result<()> {
    let samples = [
        ("Casablanca", 1942, 102, &["drama", "romance"][..]),
        ("Black Panther", 2018, 134, &["action", "adventure"][..]),
        ("Deadpool", 2016, 108, &["action", "comedy"][..]),
        ("The Breakfast Club", 1986, 96, &["drama"][..]),
    ];

    for (title, year, runtime, genres) in samples {
        let mut movie = Movie {
            id: 0,
            created_at: Default::default(),
            title: title.to_string(),
            year,
            runtime: Runtime(runtime),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            version: 0,
        };
        match repo.insert(&mut movie).await {
            Ok(()) => tracing::info!(id = movie.id, title = %movie.title, "seeded movie"),
            Err(DbError::ConstraintViolation(message)) => {
                tracing::warn!(title = %movie.title, %message, "skipping duplicate seed record");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// Lists matching movies and prints them in their external JSON form.
async fn handle_list(args: ListArgs, repo: &MovieRepository) -> anyhow::Result<()> {
    let filters = Filters {
        page: args.page,
        page_size: args.page_size,
        sort: args.sort,
    };

    let movies = repo.list(&args.title, &args.genre, &filters).await?;
    let total = repo.count(&args.title, &args.genre).await?;

    println!("{}", serde_json::to_string_pretty(&movies)?);
    tracing::info!(returned = movies.len(), total, "listing complete");

    Ok(())
}
