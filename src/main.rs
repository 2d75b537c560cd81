use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use vibecheck::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the web backend (login, playlists, analysis)
    Serve(ServeOptions),

    /// List your playlists
    Playlists(TokenOptions),

    /// Analyse the vibe of one or more playlists
    Analyze(AnalyzeOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Open the login page in the default browser
    #[clap(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TokenOptions {
    /// Spotify access token (defaults to SPOTIFY_ACCESS_TOKEN)
    #[clap(long)]
    pub token: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeOptions {
    /// Spotify access token (defaults to SPOTIFY_ACCESS_TOKEN)
    #[clap(long)]
    pub token: Option<String>,

    /// Playlist ID to include; can be repeated
    #[clap(long = "playlist", num_args = 1)]
    pub playlists: Vec<String>,

    /// Include your liked songs
    #[clap(long)]
    pub liked: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let config = match config::Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };

    match cli.command {
        Command::Serve(opt) => cli::serve(config, opt.open).await,
        Command::Playlists(opt) => cli::list_playlists(config, opt.token).await,
        Command::Analyze(opt) => cli::analyze(config, opt.token, opt.playlists, opt.liked).await,
        Command::Completions(_) => {}
    }
}
