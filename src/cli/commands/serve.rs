//! Web server command.

use console::style;

use interview_insights::config::{Settings, DEFAULT_BIND};

use crate::cli::helpers::build_service;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, api_key: Option<&str>, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;
    let service = build_service(settings, api_key)?;

    println!(
        "{} Starting interview insights at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    interview_insights::server::serve(service, settings.default_mode, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3030
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    let (default_host, default_port) = DEFAULT_BIND
        .rsplit_once(':')
        .and_then(|(h, p)| p.parse::<u16>().ok().map(|p| (h, p)))
        .unwrap_or(("127.0.0.1", 3030));

    let bind = bind.trim();
    if bind.is_empty() {
        anyhow::bail!("Bind address is empty");
    }

    if let Ok(port) = bind.parse::<u16>() {
        return Ok((default_host.to_string(), port));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        match port_str.parse::<u16>() {
            Ok(port) => return Ok((host.to_string(), port)),
            Err(_) => anyhow::bail!("Invalid port in bind address: {}", bind),
        }
    }

    Ok((bind.to_string(), default_port))
}
