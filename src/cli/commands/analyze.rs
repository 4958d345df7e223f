//! Snippet analysis commands.

use console::style;

use interview_insights::config::Settings;
use interview_insights::services::InsightRequest;

use super::SnippetArgs;
use crate::cli::helpers::{build_service, format_insights, read_snippet, spinner};

fn build_request(settings: &Settings, args: SnippetArgs) -> anyhow::Result<InsightRequest> {
    let snippet = read_snippet(args.snippet, args.file.as_deref())?;
    Ok(InsightRequest::new(args.study_id, snippet)
        .with_mode(args.mode.unwrap_or(settings.default_mode))
        .with_objective(args.objective))
}

/// Generate insights for a snippet.
pub async fn cmd_analyze(
    settings: &Settings,
    api_key: Option<&str>,
    args: SnippetArgs,
    json: bool,
) -> anyhow::Result<()> {
    let service = build_service(settings, api_key)?;
    let request = build_request(settings, args)?;
    let study = service.catalog().require(&request.study_id)?;

    let pb = spinner(format!("Analyzing snippet for {}...", study.title));
    let result = service.generate(&request).await;
    pb.finish_and_clear();

    let result = match result {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{} {}", style("✗").red(), e);
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} {} {}",
        style("✓").green(),
        style(&study.title).bold(),
        style(format!("[{}]", request.mode)).dim()
    );
    println!();
    print!("{}", format_insights(&result));
    Ok(())
}

/// Print the messages that would be sent.
pub fn cmd_prompt(settings: &Settings, args: SnippetArgs, json: bool) -> anyhow::Result<()> {
    let service = build_service(settings, None)?;
    let request = build_request(settings, args)?;
    let messages = service.preview(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    for message in &messages {
        println!("{}", style(format!("── {} ──", message.role.as_str())).cyan());
        println!("{}", message.content);
        println!();
    }
    Ok(())
}
