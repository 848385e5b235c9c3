use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use redditsync::{cli, config, error, logging, utils};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add tracks posted to subreddits to a playlist
    Sync(SyncOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Comma separated subreddit names
    #[clap(long, default_value = "music")]
    subreddit: String,

    /// Max pages to be parsed per subreddit
    #[clap(long, default_value_t = 3)]
    pages: usize,

    /// Redirect URI registered in the Spotify application
    #[clap(long = "redirect-url", default_value = "http://localhost:8080/callback")]
    redirect_url: String,

    /// Playlist id where tracks are going to be added; a new playlist is created if absent
    #[clap(long)]
    playlist_id: Option<String>,

    /// Refresh token to create a new access token without logging in
    #[clap(long)]
    refresh_token: Option<String>,

    /// Print debug output
    #[clap(long)]
    debug: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    let mut config = config::Config::from_env();

    match cli.command {
        Command::Sync(opt) => {
            config.debug |= opt.debug;
            logging::set_debug(config.debug);

            let subreddits = utils::parse_subreddits(&opt.subreddit);
            if subreddits.is_empty() {
                error!("At least one subreddit is required");
            }

            let args = cli::SyncArgs {
                subreddits,
                pages: opt.pages,
                redirect_url: opt.redirect_url,
                playlist_id: opt.playlist_id.filter(|id| !id.is_empty()),
                refresh_token: opt.refresh_token.filter(|t| !t.is_empty()),
            };
            cli::sync(&config, args).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
