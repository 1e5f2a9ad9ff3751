use clap::{ArgAction, Parser, Subcommand};
use commands::catalog::BrowseCategory;
use commands::collections::{SortKeyArg, WatchedFilterArg};
use commands::{auth, catalog, collections, config};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinescope")]
#[command(about = "CineScope - discover movies, keep a watchlist, mark your favorites")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse a curated movie listing
    #[command(long_about = "Browse one of the catalog's curated listings: popular, trending (this week), top rated, or now playing.")]
    Browse {
        #[arg(long, value_enum, default_value = "popular")]
        category: BrowseCategory,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search the catalog by title
    Search {
        query: String,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Discover movies by genre, year and rating
    #[command(long_about = "Discover movies with filters. Genre accepts a name or numeric id; sort-by takes any catalog sort key such as popularity.desc or vote_average.desc.")]
    Discover {
        /// Genre name or id
        #[arg(long)]
        genre: Option<String>,

        /// Release year
        #[arg(long)]
        year: Option<u32>,

        /// Minimum vote average (0-10)
        #[arg(long)]
        min_rating: Option<f64>,

        /// Catalog sort key (defaults to popularity.desc)
        #[arg(long)]
        sort_by: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show full details for one movie
    #[command(long_about = "Show details for a movie: overview, cast and director, trailer link, box office numbers, and similar titles.")]
    Details { id: u64 },
    /// List catalog genres
    Genres,
    /// Sign in, sign up, or sign out
    Auth {
        #[command(subcommand)]
        cmd: AuthCommands,
    },
    /// Manage your watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: WatchlistCommands,
    },
    /// Manage your favorites
    Favorites {
        #[command(subcommand)]
        cmd: FavoritesCommands,
    },
    /// Configure the catalog API key and settings
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out of the current session
    Logout,
    /// Show the signed-in user and collection counts
    Whoami,
}

#[derive(Subcommand)]
enum WatchlistCommands {
    /// List your watchlist
    Show {
        #[arg(long, value_enum, default_value = "date-added")]
        sort: SortKeyArg,

        /// Only watched or unwatched entries
        #[arg(long, value_enum, default_value = "all")]
        filter: WatchedFilterArg,

        /// Title substring to search for
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a movie by catalog id
    Add { id: u64 },
    /// Remove a movie by catalog id
    Remove { id: u64 },
    /// Mark a watchlist entry as watched
    Watched { id: u64 },
    /// Mark a watchlist entry as not watched
    Unwatched { id: u64 },
}

#[derive(Subcommand)]
enum FavoritesCommands {
    /// List your favorites
    Show {
        #[arg(long, value_enum, default_value = "date-added")]
        sort: SortKeyArg,
    },
    /// Add a movie by catalog id
    Add { id: u64 },
    /// Remove a movie by catalog id
    Remove { id: u64 },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the full API key
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Set the TMDB API key
    SetKey {
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Interactive configuration wizard
    Init,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet)?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Browse { category, page } => catalog::run_browse(category, page, &output).await,
        Commands::Search { query, page } => catalog::run_search(&query, page, &output).await,
        Commands::Discover {
            genre,
            year,
            min_rating,
            sort_by,
            page,
        } => catalog::run_discover(genre, year, min_rating, sort_by, page, &output).await,
        Commands::Details { id } => catalog::run_details(id, &output).await,
        Commands::Genres => catalog::run_genres(&output).await,
        Commands::Auth { cmd } => match cmd {
            AuthCommands::Register { name, email } => auth::run_register(name, email, &output),
            AuthCommands::Login { email } => auth::run_login(email, &output),
            AuthCommands::Logout => auth::run_logout(&output),
            AuthCommands::Whoami => auth::run_whoami(&output),
        },
        Commands::Watchlist { cmd } => match cmd {
            WatchlistCommands::Show { sort, filter, search } => {
                collections::run_watchlist_show(sort, filter, search, &output)
            }
            WatchlistCommands::Add { id } => collections::run_watchlist_add(id, &output).await,
            WatchlistCommands::Remove { id } => collections::run_watchlist_remove(id, &output),
            WatchlistCommands::Watched { id } => {
                collections::run_watchlist_set_watched(id, true, &output)
            }
            WatchlistCommands::Unwatched { id } => {
                collections::run_watchlist_set_watched(id, false, &output)
            }
        },
        Commands::Favorites { cmd } => match cmd {
            FavoritesCommands::Show { sort } => collections::run_favorites_show(sort, &output),
            FavoritesCommands::Add { id } => collections::run_favorites_add(id, &output).await,
            FavoritesCommands::Remove { id } => collections::run_favorites_remove(id, &output),
        },
        Commands::Config { cmd } => match cmd.unwrap_or(ConfigCommands::Init) {
            ConfigCommands::Show { full } => config::run_show(full, &output),
            ConfigCommands::SetKey { api_key } => config::run_set_key(api_key, &output),
            ConfigCommands::Init => config::run_init(&output),
        },
    }
}
