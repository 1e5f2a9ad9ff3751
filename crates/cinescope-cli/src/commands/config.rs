use cinescope_config::{Config, TmdbConfig};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;

use super::{prompts, AppContext};
use crate::output::Output;

pub fn run_show(full: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::init()?;

    let Some(tmdb) = &ctx.config.tmdb else {
        output.info("TMDB is not configured. Run `cinescope config init`.");
        return Ok(());
    };

    let api_key = if full {
        tmdb.api_key.clone()
    } else {
        mask_secret(&tmdb.api_key)
    };

    if output.is_human() {
        output.info(format!("Config file: {}", ctx.paths.config_file().display()));
        output.info(format!("TMDB API key: {}", api_key));
        output.info(format!("Language: {}", tmdb.language));
        output.info(format!(
            "Image sizes: poster {}, backdrop {}",
            tmdb.poster_size, tmdb.backdrop_size
        ));
    } else {
        output.json(&json!({
            "config_file": ctx.paths.config_file().display().to_string(),
            "tmdb": {
                "api_key": api_key,
                "language": tmdb.language,
                "poster_size": tmdb.poster_size,
                "backdrop_size": tmdb.backdrop_size,
            }
        }));
    }
    Ok(())
}

pub fn run_set_key(api_key: Option<String>, output: &Output) -> Result<()> {
    let ctx = AppContext::init()?;

    let api_key = match api_key {
        Some(api_key) => api_key,
        None => prompts::prompt_string("TMDB API key", None)?,
    };

    let mut config = ctx.config;
    match config.tmdb.as_mut() {
        Some(tmdb) => tmdb.api_key = api_key,
        None => config.tmdb = Some(TmdbConfig::new(api_key)),
    }
    config
        .save_to_file(&ctx.paths.config_file())
        .map_err(|e| eyre!("{}", e))?;
    output.success("TMDB API key saved");
    Ok(())
}

/// Interactive setup. Asks for everything a fresh install needs.
pub fn run_init(output: &Output) -> Result<()> {
    let ctx = AppContext::init()?;

    output.info("CineScope needs a TMDB API key (https://www.themoviedb.org/settings/api).");
    let api_key = prompts::prompt_string("TMDB API key", None)?;
    let language = prompts::prompt_string("Language", Some("en-US"))?;

    let mut tmdb = TmdbConfig::new(api_key);
    tmdb.language = language;

    let config = Config { tmdb: Some(tmdb) };
    config.validate().map_err(|e| eyre!("{}", e))?;
    config
        .save_to_file(&ctx.paths.config_file())
        .map_err(|e| eyre!("{}", e))?;
    output.success(format!(
        "Configuration written to {}",
        ctx.paths.config_file().display()
    ));
    Ok(())
}

fn mask_secret(secret: &str) -> String {
    if secret.len() <= 4 {
        return "****".to_string();
    }
    format!("{}****", &secret[..4])
}
