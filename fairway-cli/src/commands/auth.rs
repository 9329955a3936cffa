//! Session commands

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use dialoguer::Password;
use fairway_core::{FairwayContext, ProfileUpdate, SessionState};
use serde_json::json;

use super::get_context;
use crate::output;

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with email and password
    SignIn {
        /// Email address of the account
        email: String,
    },

    /// Create an account with a player profile
    SignUp {
        /// Email address for the new account
        email: String,

        /// First name for the player profile
        #[arg(long)]
        first_name: String,

        /// Last name for the player profile
        #[arg(long)]
        last_name: String,

        /// Handicap index (0.0 to 54.0)
        #[arg(long, default_value_t = 18.0)]
        handicap: f64,
    },

    /// Update the signed-in player profile
    Update {
        /// New first name
        #[arg(long)]
        first_name: Option<String>,

        /// New last name
        #[arg(long)]
        last_name: Option<String>,

        /// New handicap index (0.0 to 54.0)
        #[arg(long)]
        handicap: Option<f64>,
    },

    /// Sign out of the current session
    SignOut,

    /// Show the current session state
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(command: AuthCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        AuthCommands::SignIn { email } => sign_in(&ctx, &email).await,
        AuthCommands::SignUp {
            email,
            first_name,
            last_name,
            handicap,
        } => sign_up(&ctx, &email, &first_name, &last_name, handicap).await,
        AuthCommands::Update {
            first_name,
            last_name,
            handicap,
        } => update(&ctx, first_name, last_name, handicap).await,
        AuthCommands::SignOut => sign_out(&ctx).await,
        AuthCommands::Whoami { json } => whoami(&ctx, json).await,
    }
}

async fn sign_in(ctx: &FairwayContext, email: &str) -> Result<()> {
    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read password")?;

    ctx.session.sign_in(email, &password).await?;

    let state = wait_for(ctx, |s| s.is_authenticated()).await;
    match state.profile() {
        Some(user) => output::success(&format!("Signed in as {}", user.full_name())),
        None => output::success(&format!("Signed in as {email} (no profile yet)")),
    }
    Ok(())
}

async fn sign_up(
    ctx: &FairwayContext,
    email: &str,
    first_name: &str,
    last_name: &str,
    handicap: f64,
) -> Result<()> {
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .context("Failed to read password")?;

    ctx.session
        .sign_up(email, &password, first_name, last_name, handicap)
        .await?;

    output::success(&format!("Account created for {email}"));
    Ok(())
}

async fn update(
    ctx: &FairwayContext,
    first_name: Option<String>,
    last_name: Option<String>,
    handicap: Option<f64>,
) -> Result<()> {
    let patch = ProfileUpdate {
        first_name,
        last_name,
        handicap,
    };
    if patch.is_empty() {
        bail!("Nothing to update; pass at least one of --first-name, --last-name, --handicap");
    }

    wait_for(ctx, |s| !matches!(s, SessionState::Initializing)).await;
    let user = ctx.session.update_profile(&patch).await?;
    output::success(&format!(
        "Profile updated: {} (handicap {:.1})",
        user.full_name(),
        user.handicap
    ));
    Ok(())
}

async fn sign_out(ctx: &FairwayContext) -> Result<()> {
    wait_for(ctx, |s| !matches!(s, SessionState::Initializing)).await;
    ctx.session.sign_out().await?;
    output::success("Signed out");
    Ok(())
}

async fn whoami(ctx: &FairwayContext, json: bool) -> Result<()> {
    let state = wait_for(ctx, |s| !matches!(s, SessionState::Initializing)).await;

    match state {
        SessionState::Authenticated { session, profile } => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "email": session.email,
                        "userId": session.user_id,
                        "profile": profile,
                    }))?
                );
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Field", "Value"]);
            table.add_row(vec!["Email".to_string(), session.email.clone()]);
            match profile {
                Some(user) => {
                    table.add_row(vec!["Name".to_string(), user.full_name()]);
                    table.add_row(vec!["Handicap".to_string(), format!("{:.1}", user.handicap)]);
                    table.add_row(vec!["Role".to_string(), user.role.as_str().to_string()]);
                }
                None => {
                    table.add_row(vec![
                        "Profile".to_string(),
                        "not provisioned yet".to_string(),
                    ]);
                }
            }
            println!("{table}");
        }
        _ => {
            if json {
                println!("{}", serde_json::to_string_pretty(&json!({ "profile": null }))?);
                return Ok(());
            }
            bail!("Not signed in");
        }
    }
    Ok(())
}

/// Waits until the session state satisfies `pred`, or until the startup
/// resolution has clearly settled, whichever comes first.
async fn wait_for(ctx: &FairwayContext, pred: impl Fn(&SessionState) -> bool) -> SessionState {
    let mut rx = ctx.session.watch();
    let _ = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if pred(&rx.borrow_and_update()) {
                break;
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    })
    .await;
    ctx.session.current()
}
