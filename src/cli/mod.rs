//! # CLI Module
//!
//! User-facing commands of the `vibecheck` binary. Each command receives the
//! already loaded [`Config`](crate::config::Config) and reports progress with
//! the crate's colored output macros and `indicatif` spinners.
//!
//! ## Commands
//!
//! - [`serve`] - Runs the web backend (login, playlists, analysis endpoints)
//! - [`list_playlists`] - Prints the playlists reachable with an access token
//! - [`analyze`] - Runs the full pipeline over selected playlists from the terminal
//!
//! ## Usage Patterns
//!
//! ```bash
//! vibecheck serve --open                       # log in through the browser
//! vibecheck playlists --token BQC...           # list playlists
//! vibecheck analyze --token BQC... --liked     # analyse liked songs
//! vibecheck analyze --playlist 37i9dQZF1DXcBWIGoYBM5M --playlist liked-songs
//! ```
//!
//! Access tokens can also be supplied through `SPOTIFY_ACCESS_TOKEN`.

mod analyze;
mod playlists;
mod serve;

pub use analyze::analyze;
pub use playlists::list_playlists;
pub use serve::serve;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{error, types::Credential};

/// Resolves the access token from the flag or `SPOTIFY_ACCESS_TOKEN`.
fn resolve_credential(token: Option<String>) -> Credential {
    match token.or_else(|| std::env::var("SPOTIFY_ACCESS_TOKEN").ok()) {
        Some(t) if !t.trim().is_empty() => Credential::bearer(t.trim()),
        _ => error!(
            "No access token. Pass --token or set SPOTIFY_ACCESS_TOKEN, or use `vibecheck serve` to log in."
        ),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
