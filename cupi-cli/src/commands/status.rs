//! Status command - check the server answers and show the cluster.

use std::env::consts::{ARCH, OS};
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use console::style;
use serde_json::{json, Value};

use cupi_api::ApiClient;
use cupi_core::config::AppConfig;
use cupi_core::constants::{APP_NAME, APP_VERSION};
use cupi_core::error::CuResult;

use crate::OutputFormat;

/// Run the status command. With `save`, a working connection is written
/// to the given path.
pub async fn run(api: &ApiClient, save: Option<(AppConfig, &Path)>, format: OutputFormat) -> CuResult<ExitCode> {
    let start = Instant::now();
    let status = api.online_test().await?;
    let latency_ms = start.elapsed().as_millis();
    let online = status == 200;

    let servers = if online {
        api.cluster()
            .await?
            .success()
            .map(|cluster| cupi_api::response::collection(cluster, "Server"))
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    let saved = match save {
        Some((config, path)) if online => {
            config.save_to_file(path)?;
            Some(path)
        }
        _ => None,
    };

    match format {
        OutputFormat::Json => {
            super::print_json(&json!({
                "base_url": api.base_url(),
                "status": status,
                "online": online,
                "latency_ms": latency_ms,
                "servers": servers,
                "client": format!("{APP_NAME} {APP_VERSION}"),
                "platform": format!("{OS}-{ARCH}"),
                "saved_config": saved.as_ref().map(|path| path.display().to_string()),
            }));
        }
        OutputFormat::Text => {
            println!("{}", style("Connection").bold().underlined());
            println!("  Client:    {APP_NAME} {APP_VERSION} ({OS}-{ARCH})");
            println!("  Server:    {}", api.base_url());
            println!(
                "  Status:    {}",
                match status {
                    200 => format!("{} ({}ms)", style("online").green(), latency_ms),
                    401 => style("credentials rejected").red().to_string(),
                    other => style(format!("unexpected status {other}")).yellow().to_string(),
                }
            );

            if !servers.is_empty() {
                println!();
                println!("{}", style("Cluster").bold().underlined());
                for server in &servers {
                    println!(
                        "  {:<24} {:<16} {}",
                        server_field(server, "HostName"),
                        server_field(server, "Ipv4Address"),
                        server_field(server, "DisplayName"),
                    );
                }
            }

            if let Some(path) = &saved {
                println!();
                println!("Saved connection settings to {}", path.display());
            }
        }
    }

    Ok(if online { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn server_field<'a>(server: &'a Value, name: &str) -> &'a str {
    match super::field(server, name) {
        "" => "-",
        value => value,
    }
}
