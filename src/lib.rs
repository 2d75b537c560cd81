//! Playlist Vibe Analyser Library
//!
//! This library authenticates a user against the Spotify Web API, collects the
//! track IDs of their playlists and liked songs, enriches a bounded subset of
//! those tracks with track and artist detail, and reduces the result into a set
//! of statistics plus a heuristic "vibe" label.
//!
//! # Modules
//!
//! - `analysis` - Enrichment, aggregation and vibe classification pipeline
//! - `api` - HTTP handlers for the local web backend
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy exposed to callers of the pipeline
//! - `management` - In-memory session handling
//! - `server` - Router construction and the HTTP server loop
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use vibecheck::config;
//!
//! #[tokio::main]
//! async fn main() -> vibecheck::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     // Hand the config to the server or CLI...
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the glue layers (configuration loading, server startup) where the
/// concrete error type does not matter to the caller. The analysis pipeline
/// uses the typed errors from [`error`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Analysed {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for unrecoverable failures in the binary (invalid configuration,
/// failure to bind the server socket). Request handling never calls this;
/// per-request failures are reported through [`error::AnalysisError`].
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable per-item and per-page failures: a playlist page that
/// could not be fetched, a track that was skipped, an artist lookup that
/// degraded to an empty genre list.
///
/// # Example
///
/// ```
/// warning!("Skipping track {}: {}", id, err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
