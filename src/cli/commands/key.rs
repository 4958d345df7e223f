//! API key management commands.

use console::style;

use interview_insights::config::Settings;
use interview_insights::credentials::{CredentialProvider, EnvCredential, API_KEY_ENV};

use crate::cli::helpers::{build_service, read_secret, spinner};

/// Validate a key and store it.
pub async fn cmd_key_set(settings: &Settings, key: Option<String>) -> anyhow::Result<()> {
    let key = match key {
        Some(k) => k,
        None => read_secret("Paste your API key: ")?,
    };

    let service = build_service(settings, None)?;
    let pb = spinner("Validating key...");
    let result = service.save_key(&key).await;
    pb.finish_and_clear();

    match result {
        Ok(()) => {
            println!(
                "{} API key validated and saved to {}",
                style("✓").green(),
                settings.key_store().path().display()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", style("✗").red(), e);
            Err(e.into())
        }
    }
}

/// Show where (if anywhere) a key comes from.
pub fn cmd_key_status(settings: &Settings, api_key: Option<&str>) -> anyhow::Result<()> {
    let store = settings.key_store();

    if api_key.is_some_and(|k| !k.trim().is_empty()) {
        println!("{} Using key from --api-key", style("✓").green());
    } else if store.api_key()?.is_some() {
        println!(
            "{} API key is set and ready ({})",
            style("✓").green(),
            store.path().display()
        );
    } else if EnvCredential.api_key()?.is_some() {
        println!("{} Using key from {}", style("✓").green(), API_KEY_ENV);
    } else {
        println!("{} No API key set yet.", style("!").yellow());
        println!("  Run `insights key set` or export {}", API_KEY_ENV);
    }
    Ok(())
}

/// Remove the stored key.
pub fn cmd_key_clear(settings: &Settings) -> anyhow::Result<()> {
    let service = build_service(settings, None)?;
    service.clear_key()?;
    println!("{} Key cleared", style("✓").green());
    Ok(())
}
