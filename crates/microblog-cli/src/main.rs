//! # microblog
//!
//! Terminal front end for a Microblog server. Every subcommand restores the saved session
//! first, so a token stored by `microblog login` carries across invocations.

mod commands;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use microblog_client::{FileTokenStore, MemoryNavigator, MicroblogClient, Route};
use microblog_common::models::FeedFilter;

#[derive(Parser)]
#[command(name = "microblog", version, about = "Post, read and follow on Microblog")]
struct Cli {
    /// API root; overrides `api.base_url` from config.
    #[arg(long, env = "MICROBLOG_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and remember the session.
    Login {
        username: String,
        #[arg(long, env = "MICROBLOG_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in.
    Signup {
        username: String,
        #[arg(long, env = "MICROBLOG_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        description: Option<String>,
    },
    Logout,
    /// Exchange the refresh cookie for a new token.
    Refresh,
    /// Show who is logged in.
    Whoami,
    /// Read the feed.
    Feed {
        #[arg(long, default_value_t = FeedFilter::Timeline)]
        filter: FeedFilter,
        /// Number of pages to fetch.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Publish a post, or a reply with `--reply-to`.
    Post {
        content: String,
        #[arg(long)]
        reply_to: Option<i64>,
    },
    /// Show a post and its replies.
    Show { id: i64 },
    /// Show a user's profile and posts.
    User {
        id: i64,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    Follow { id: i64 },
    Unfollow { id: i64 },
    /// Report a post to the moderators.
    Report { id: i64 },
    /// Update your description or password.
    Settings {
        #[arg(long)]
        description: Option<String>,
        #[arg(long, requires = "password_confirmation")]
        password: Option<String>,
        #[arg(long, requires = "password")]
        password_confirmation: Option<String>,
    },
    /// Permanently delete your account.
    DeleteAccount {
        #[arg(long)]
        yes: bool,
    },
}

impl Command {
    /// Screen this command stands in for.
    fn route(&self) -> Route {
        match self {
            Self::Login { .. } => Route::Login,
            Self::Signup { .. } => Route::Signup,
            Self::Show { id } | Self::Report { id } => Route::Post(*id),
            Self::User { id, .. } | Self::Follow { id } | Self::Unfollow { id } => Route::User(*id),
            Self::Settings { .. } | Self::DeleteAccount { .. } => Route::Settings,
            Self::Logout | Self::Refresh | Self::Whoami | Self::Feed { .. } | Self::Post { .. } => {
                Route::Feed
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = microblog_common::config::init()?;

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.as_str().into()),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let base_url = cli.api_url.as_deref().unwrap_or(&config.api.base_url);
    tracing::debug!(%base_url, storage = %config.storage.path.display(), "starting");

    let tokens = Arc::new(FileTokenStore::new(&config.storage.path, &config.storage.token_key));
    let navigator = Arc::new(MemoryNavigator::new(cli.command.route()));
    let client = MicroblogClient::new(base_url, tokens, navigator)?;

    client.session.bootstrap().await;
    commands::run(&client, cli.command).await
}
