use anyhow::{Result, bail};
use chrono::Utc;

use microblog_client::render;
use microblog_client::views::{
    Composer, DeleteStep, LoginView, PagedList, ReportDialog, ReportState, SignupView,
};
use microblog_client::{ClientError, Guard, MicroblogClient, Route, guard};

use crate::Command;

pub async fn run(client: &MicroblogClient, command: Command) -> Result<()> {
    if let Guard::Redirect(to) = guard(command.route(), &client.session.snapshot()) {
        match to {
            Route::Login => bail!("Please log in first: microblog login <username>"),
            _ => {
                println!("{}", render::header(&client.session.snapshot()));
                return Ok(());
            }
        }
    }

    match command {
        Command::Login { username, password } => login(client, username, password).await,
        Command::Signup { username, password, description } => {
            signup(client, username, password, description).await
        }
        Command::Logout => {
            client.session.logout().await;
            println!("Logged out.");
            Ok(())
        }
        Command::Refresh => {
            require_login(client)?;
            match client.session.auth().refresh_token().await {
                Ok(Some(_)) => println!("Session renewed."),
                Ok(None) => println!("Server issued no new token; current session kept."),
                Err(ClientError::Unauthorized { .. }) => {
                    client.session.clear_local();
                    bail!("Session expired. Please log in again.");
                }
                Err(e) => bail!("{}", e.user_message("Failed to renew session. Please try again.")),
            }
            Ok(())
        }
        Command::Whoami => {
            println!("{}", render::header(&client.session.snapshot()));
            Ok(())
        }
        Command::Feed { filter, pages } => {
            let mut feed = client.feed();
            feed.set_filter(filter).await;
            for _ in 1..pages {
                if !feed.load_more().await {
                    break;
                }
            }
            println!("[{}]", filter.label());
            print_list(feed.list())
        }
        Command::Post { content, reply_to } => post(client, content, reply_to).await,
        Command::Show { id } => show(client, id).await,
        Command::User { id, pages } => user(client, id, pages).await,
        Command::Follow { id } => follow(client, id, true).await,
        Command::Unfollow { id } => follow(client, id, false).await,
        Command::Report { id } => report(client, id).await,
        Command::Settings { description, password, password_confirmation } => {
            settings(client, description, password, password_confirmation).await
        }
        Command::DeleteAccount { yes } => delete_account(client, yes).await,
    }
}

fn require_login(client: &MicroblogClient) -> Result<()> {
    if !client.session.is_authenticated() {
        bail!("Please log in first: microblog login <username>");
    }
    Ok(())
}

const RETRY_HINT: &str = "(temporary failure, run the command again)";

fn print_list(list: &PagedList) -> Result<()> {
    if let Some(error) = list.error() {
        if list.can_retry() {
            bail!("{error} {RETRY_HINT}");
        }
        bail!("{error}");
    }
    println!("{}", render::post_list(list.visible(), Utc::now()));
    if list.offers_load_more() {
        println!("\n(more posts available, use --pages)");
    }
    Ok(())
}

async fn login(client: &MicroblogClient, username: String, password: String) -> Result<()> {
    let mut view = LoginView::new();
    view.username = username;
    view.password = password;
    if !view.submit(&client.session, client.navigator().as_ref()).await {
        bail!("{}", view.error().unwrap_or_default());
    }
    println!("{}", render::header(&client.session.snapshot()));
    Ok(())
}

async fn signup(
    client: &MicroblogClient,
    username: String,
    password: String,
    description: Option<String>,
) -> Result<()> {
    let mut view = SignupView::new();
    view.username = username;
    view.password = password;
    view.description = description.unwrap_or_default();
    if !view.submit(&client.session, client.navigator().as_ref()).await {
        bail!("{}", view.error().unwrap_or_default());
    }
    println!("{}", render::header(&client.session.snapshot()));
    Ok(())
}

async fn post(client: &MicroblogClient, content: String, reply_to: Option<i64>) -> Result<()> {
    require_login(client)?;
    let mut composer = reply_to.map_or_else(Composer::new, Composer::reply_to);
    composer.set_content(content);
    match composer.submit(&client.posts).await {
        Some(created) => {
            println!("{}", render::post_card(&created, Utc::now()));
            Ok(())
        }
        None => bail!("{}", composer.error().unwrap_or_default()),
    }
}

async fn show(client: &MicroblogClient, id: i64) -> Result<()> {
    let mut view = client.post_detail(id);
    view.load().await;
    if let Some(error) = view.error() {
        bail!("{error}");
    }
    let Some(post) = view.post() else {
        bail!("Post not found");
    };
    let now = Utc::now();
    if let Some(Route::Post(parent)) = view.parent_route() {
        println!("(reply to #{parent}, see: microblog show {parent})\n");
    }
    println!("{}", render::post_card(post, now));
    println!("\n-- Replies --");
    println!("{}", render::post_list(view.replies(), now));
    Ok(())
}

async fn user(client: &MicroblogClient, id: i64, pages: u32) -> Result<()> {
    let mut view = client.profile(id);
    view.load().await;
    for _ in 1..pages {
        if !view.load_more().await {
            break;
        }
    }
    let Some(profile) = view.user() else {
        bail!("{}", view.list().error().unwrap_or("User not found"));
    };
    println!("{}", render::profile_header(profile, &view.post_count_label()));
    if view.is_following() {
        println!("(following)");
    }
    println!();
    print_list(view.list())
}

async fn follow(client: &MicroblogClient, id: i64, follow: bool) -> Result<()> {
    require_login(client)?;
    let view = client.profile(id);
    if view.is_own_profile(&client.session) {
        bail!("You cannot follow yourself");
    }
    let result = if follow {
        client.users.follow(id).await
    } else {
        client.users.unfollow(id).await
    };
    let fallback = "Failed to update follow status. Please try again.";
    let resp = match result {
        Ok(resp) => resp,
        Err(e) if e.is_retryable() => bail!("{} {RETRY_HINT}", e.user_message(fallback)),
        Err(e) => bail!("{}", e.user_message(fallback)),
    };
    println!("{}", if resp.message.is_empty() { resp.following.to_string() } else { resp.message });
    Ok(())
}

async fn report(client: &MicroblogClient, id: i64) -> Result<()> {
    require_login(client)?;
    let mut dialog = ReportDialog::new(id);
    dialog.submit(&client.reports).await;
    match dialog.state() {
        ReportState::Submitted(message) if !message.is_empty() => println!("{message}"),
        ReportState::Submitted(_) => println!("Post reported."),
        ReportState::Failed(message) => bail!("{message}"),
        ReportState::Idle | ReportState::Submitting => {}
    }
    Ok(())
}

async fn settings(
    client: &MicroblogClient,
    description: Option<String>,
    password: Option<String>,
    password_confirmation: Option<String>,
) -> Result<()> {
    let mut view = client.settings();
    if let Some(description) = description {
        view.description = description;
    }
    view.password = password.unwrap_or_default();
    view.password_confirmation = password_confirmation.unwrap_or_default();
    if !view.save(&client.session).await {
        bail!("{}", view.error().unwrap_or_default());
    }
    println!("{}", view.success().unwrap_or_default());
    println!("{}", view.description_counter());
    Ok(())
}

async fn delete_account(client: &MicroblogClient, yes: bool) -> Result<()> {
    let mut view = client.settings();
    let navigator = client.navigator().as_ref();
    if view.delete_account(&client.session, navigator).await == DeleteStep::Armed && !yes {
        bail!("This permanently deletes your account and posts. Re-run with --yes to confirm.");
    }
    match view.delete_account(&client.session, navigator).await {
        DeleteStep::Deleted => {
            println!("Account deleted.");
            Ok(())
        }
        _ => bail!("{}", view.error().unwrap_or_default()),
    }
}
