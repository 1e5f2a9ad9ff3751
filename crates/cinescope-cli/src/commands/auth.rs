use cinescope_core::views::watchlist_stats;
use cinescope_core::SessionError;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;

use super::{prompts, AppContext};
use crate::output::Output;

pub fn run_register(name: Option<String>, email: Option<String>, output: &Output) -> Result<()> {
    let mut ctx = AppContext::init()?;

    let name = match name {
        Some(name) => name,
        None => prompts::prompt_string("Name", None)?,
    };
    let email = match email {
        Some(email) => email,
        None => prompts::prompt_string("Email", None)?,
    };
    let password = prompts::prompt_password("Password")?;
    let confirm = prompts::prompt_password("Confirm password")?;
    if password != confirm {
        return Err(eyre!("Passwords do not match"));
    }

    let profile = ctx.session.register(&name, &email, &password)?;
    output.success(format!(
        "Welcome to CineScope, {}! You are now signed in.",
        profile.name
    ));
    Ok(())
}

pub fn run_login(email: Option<String>, output: &Output) -> Result<()> {
    let mut ctx = AppContext::init()?;

    let email = match email {
        Some(email) => email,
        None => prompts::prompt_string("Email", None)?,
    };
    let password = prompts::prompt_password("Password")?;

    let profile = ctx.session.login(&email, &password)?;
    output.success(format!("Signed in as {}", profile.name));
    Ok(())
}

pub fn run_logout(output: &Output) -> Result<()> {
    let mut ctx = AppContext::init()?;

    match ctx.session.logout() {
        Ok(()) => output.success("Signed out"),
        Err(SessionError::NotSignedIn) => output.info("No one is signed in"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub fn run_whoami(output: &Output) -> Result<()> {
    let ctx = AppContext::init()?;

    let Some(profile) = ctx.session.current_user() else {
        output.info("Not signed in");
        return Ok(());
    };

    let store = ctx.store()?;
    let stats = watchlist_stats(store.watchlist());
    let favorites = store.favorites().len();

    if output.is_human() {
        output.info(format!(
            "{} <{}> (member since {})",
            profile.name,
            profile.email,
            profile.join_date.format("%Y-%m-%d")
        ));
        output.info(format!(
            "Watchlist: {} ({} watched)   Favorites: {}",
            stats.total, stats.watched, favorites
        ));
    } else {
        output.json(&json!({
            "user": profile,
            "watchlist": { "total": stats.total, "watched": stats.watched, "unwatched": stats.unwatched },
            "favorites": favorites,
        }));
    }
    Ok(())
}
