//! CLI command implementations.

pub mod status;
pub mod locations;
pub mod schedules;
pub mod users;
pub mod handlers;

use std::fmt::Display;
use std::process::ExitCode;

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use console::style;
use dialoguer::{Input, Password};
use serde_json::{json, Value};

use cupi_api::{ApiClient, ApiOutcome, Listing, WorkflowOutcome};
use cupi_core::config::AppConfig;
use cupi_core::error::{CuError, CuResult};

use crate::OutputFormat;

/// Create an API client from config, prompting for anything still missing.
pub fn create_api_client(config: &mut AppConfig) -> CuResult<ApiClient> {
    if config.server.host.trim().is_empty() {
        config.server.host = Input::<String>::new()
            .with_prompt("Server host")
            .interact_text()
            .map_err(|e| CuError::Internal(e.to_string()))?;
    }
    if config.server.username.is_empty() {
        config.server.username = Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| CuError::Internal(e.to_string()))?;
    }
    if config.server.password.is_empty() {
        config.server.password = Password::new()
            .with_prompt(format!("Password for {}", config.server.username))
            .interact()
            .map_err(|e| CuError::Internal(e.to_string()))?;
    }
    ApiClient::new(&config.server)
}

/// A rounded UTF-8 table with the given header.
pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn print_json(value: &Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Print why the server turned a request down.
pub fn print_rejection(message: &str, format: OutputFormat) -> ExitCode {
    match format {
        OutputFormat::Json => print_json(&json!({"success": false, "message": message})),
        OutputFormat::Text => println!("{} {message}", style("FAIL").red().bold()),
    }
    ExitCode::FAILURE
}

/// Print a listing: a name/OID table for the mini view, raw JSON otherwise.
pub fn print_listing(outcome: ApiOutcome<Listing>, name_header: &str, format: OutputFormat) -> ExitCode {
    let listing = match outcome.split() {
        Ok(listing) => listing,
        Err(rejection) => return print_rejection(&rejection.message(), format),
    };

    match (listing, format) {
        (Listing::Full(value), _) => print_json(&value),
        (Listing::Mini(items), OutputFormat::Json) => print_json(&json!(items)),
        (Listing::Mini(items), OutputFormat::Text) => {
            if items.is_empty() {
                println!("Nothing found.");
            } else {
                let mut table = new_table(vec![name_header, "Object Id"]);
                for item in &items {
                    table.add_row(vec![item.name.clone(), item.oid.to_string()]);
                }
                println!("{table}");
                println!("{} total", items.len());
            }
        }
    }
    ExitCode::SUCCESS
}

/// Print a single object read.
pub fn print_object(outcome: ApiOutcome<Value>, format: OutputFormat) -> ExitCode {
    match outcome.split() {
        Ok(value) => {
            print_json(&value);
            ExitCode::SUCCESS
        }
        Err(rejection) => print_rejection(&rejection.message(), format),
    }
}

/// Print a list of items as JSON, whatever the output format.
pub fn print_items(outcome: ApiOutcome<Vec<Value>>, format: OutputFormat) -> ExitCode {
    print_object(outcome.map(Value::Array), format)
}

/// Print the message of a create, update or delete.
pub fn print_outcome<T: Display>(outcome: &ApiOutcome<T>, format: OutputFormat) -> ExitCode {
    if !outcome.is_success() {
        return print_rejection(&outcome.message(), format);
    }
    match format {
        OutputFormat::Json => print_json(&json!({"success": true, "message": outcome.message()})),
        OutputFormat::Text => println!("{} {}", style("OK").green().bold(), outcome.message()),
    }
    ExitCode::SUCCESS
}

/// Print a workflow result, listing anything it created.
pub fn print_workflow(outcome: &WorkflowOutcome, format: OutputFormat) -> ExitCode {
    let created: Vec<String> = outcome.created_oids().iter().map(ToString::to_string).collect();

    match format {
        OutputFormat::Json => print_json(&json!({
            "success": outcome.is_completed(),
            "message": outcome.message(),
            "failed_stage": outcome.failed_stage().map(|stage| stage.description()),
            "created_oids": created,
        })),
        OutputFormat::Text => {
            let tag = if outcome.is_completed() {
                style("OK").green().bold()
            } else {
                style("FAIL").red().bold()
            };
            println!("{tag} {}", outcome.message());
            for oid in &created {
                println!("  created {oid}");
            }
        }
    }

    if outcome.is_completed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// A string field of an object, or "" when absent.
pub fn field<'a>(value: &'a Value, name: &str) -> &'a str {
    value.get(name).and_then(Value::as_str).unwrap_or("")
}

/// Parse "HH:MM" into minutes past midnight.
pub fn parse_clock(text: &str) -> Result<u16, String> {
    let (hours, minutes) = text
        .split_once(':')
        .ok_or_else(|| format!("expected HH:MM, got {text:?}"))?;
    let hours: u16 = hours.trim().parse().map_err(|_| format!("bad hour in {text:?}"))?;
    let minutes: u16 = minutes.trim().parse().map_err(|_| format!("bad minute in {text:?}"))?;
    if hours > 24 || minutes > 59 || (hours == 24 && minutes > 0) {
        return Err(format!("time out of range: {text:?}"));
    }
    Ok(hours * 60 + minutes)
}
