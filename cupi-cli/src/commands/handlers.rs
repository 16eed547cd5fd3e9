//! Call handler commands: handlers, greetings, caller input and transfers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Subcommand;
use console::style;
use serde_json::Value;

use cupi_api::{
    ApiClient, GreetingKind, GreetingUpdate, MenuAction, MenuEntryUpdate, MenuKey, NewCallHandler, Oid,
    PlayWhat, Projection, TransferAction, TransferOptionUpdate, TransferRule,
};
use cupi_core::constants::DEFAULT_LANGUAGE;
use cupi_core::error::CuResult;

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum HandlersAction {
    /// List system call handlers.
    List {
        /// Print the full server response.
        #[arg(long)]
        full: bool,
    },
    /// Show a call handler.
    Show {
        /// Call handler object id.
        oid: String,
    },
    /// Create a call handler.
    Add {
        /// Display name.
        name: String,
        /// Extension.
        #[arg(short, long)]
        extension: Option<String>,
        /// Call handler template object id (defaults to the first template).
        #[arg(short, long)]
        template: Option<String>,
    },
    /// Delete a call handler.
    Delete {
        /// Call handler object id.
        oid: String,
    },
    /// List a handler's greetings, or enable/disable one.
    Greetings {
        /// Call handler object id.
        oid: String,
        /// Greeting to change (standard, off-hours, alternate, busy,
        /// internal, error, holiday).
        #[arg(short, long)]
        greeting: Option<GreetingKind>,
        /// Enable the greeting.
        #[arg(long, conflicts_with = "disable", requires = "greeting")]
        enable: bool,
        /// Disable the greeting.
        #[arg(long, requires = "greeting")]
        disable: bool,
        /// Play the system greeting instead of the recording.
        #[arg(long, requires = "greeting", conflicts_with = "recording")]
        system: bool,
        /// Play the recording.
        #[arg(long, requires = "greeting")]
        recording: bool,
    },
    /// Upload a WAV file as a greeting recording.
    Record {
        /// Call handler object id.
        oid: String,
        /// Greeting to record.
        greeting: GreetingKind,
        /// WAV file to upload.
        file: PathBuf,
        /// Locale id of the recording.
        #[arg(short, long, default_value_t = DEFAULT_LANGUAGE)]
        language: u32,
    },
    /// List caller input keys, or send a key to another handler.
    Menu {
        /// Call handler object id.
        oid: String,
        /// Key to change: 0-9, * or #.
        #[arg(short, long)]
        key: Option<MenuKey>,
        /// Send the key to this call handler.
        #[arg(long, requires = "key", conflicts_with = "ignore")]
        goto: Option<String>,
        /// Make the key do nothing.
        #[arg(long, requires = "key")]
        ignore: bool,
    },
    /// List transfer rules, or point one at an extension.
    Transfer {
        /// Call handler object id.
        oid: String,
        /// Rule to change (standard, off-hours, alternate).
        #[arg(short, long)]
        rule: Option<TransferRule>,
        /// Ring this extension.
        #[arg(long, requires = "rule", conflicts_with = "greeting")]
        extension: Option<String>,
        /// Skip the transfer and play the greeting.
        #[arg(long, requires = "rule")]
        greeting: bool,
    },
}

pub async fn run(api: &ApiClient, action: HandlersAction, format: OutputFormat) -> CuResult<ExitCode> {
    match action {
        HandlersAction::List { full } => {
            let projection = if full { Projection::Full } else { Projection::Mini };
            let outcome = api.call_handlers(projection).await?;
            Ok(super::print_listing(outcome, "Call Handler", format))
        }

        HandlersAction::Show { oid } => {
            let outcome = api.call_handler(&Oid::from(oid)).await?;
            Ok(super::print_object(outcome, format))
        }

        HandlersAction::Add {
            name,
            extension,
            template,
        } => {
            let template_oid = match template {
                Some(oid) => Oid::from(oid),
                None => match api.call_handler_template_oid().await?.split() {
                    Ok(oid) => oid,
                    Err(rejection) => return Ok(super::print_rejection(&rejection.message(), format)),
                },
            };
            let mut handler = NewCallHandler::new(&name, template_oid);
            handler.dtmf_access_id = extension;

            let outcome = api.add_call_handler(&handler).await?;
            Ok(super::print_outcome(&outcome, format))
        }

        HandlersAction::Delete { oid } => {
            let outcome = api.delete_call_handler(&Oid::from(oid)).await?;
            Ok(super::print_outcome(&outcome, format))
        }

        HandlersAction::Greetings {
            oid,
            greeting,
            enable,
            disable,
            system,
            recording,
        } => {
            let oid = Oid::from(oid);
            let Some(kind) = greeting else {
                let outcome = api.greetings(&oid).await?;
                return Ok(print_rows(outcome, &["GreetingType", "Enabled", "PlayWhat"], format));
            };

            let Some(update) = greeting_update(enable, disable, system, recording) else {
                let outcome = api.greeting(&oid, kind).await?;
                return Ok(super::print_object(outcome, format));
            };
            let outcome = api.update_greeting(&oid, kind, &update).await?;
            Ok(super::print_outcome(&outcome, format))
        }

        HandlersAction::Record {
            oid,
            greeting,
            file,
            language,
        } => {
            if let OutputFormat::Text = format {
                println!("{} {} ...", style("Uploading").bold(), file.display());
            }
            let outcome = api
                .update_call_handler_greeting_recording(&Oid::from(oid), greeting, language, &file)
                .await?;
            Ok(super::print_workflow(&outcome, format))
        }

        HandlersAction::Menu {
            oid,
            key,
            goto,
            ignore,
        } => {
            let oid = Oid::from(oid);
            let Some(key) = key else {
                let outcome = api.menu_entries(&oid).await?;
                return Ok(print_rows(outcome, &["TouchtoneKey", "Action", "TargetConversation"], format));
            };

            let update = match (goto, ignore) {
                (Some(target), _) => MenuEntryUpdate::transfer_to(Oid::from(target)),
                (None, true) => MenuEntryUpdate {
                    action: Some(MenuAction::Ignore),
                    ..MenuEntryUpdate::default()
                },
                (None, false) => {
                    let outcome = api.menu_entry(&oid, key).await?;
                    return Ok(super::print_object(outcome, format));
                }
            };
            let outcome = api.update_menu_entry(&oid, key, &update).await?;
            Ok(super::print_outcome(&outcome, format))
        }

        HandlersAction::Transfer {
            oid,
            rule,
            extension,
            greeting,
        } => {
            let oid = Oid::from(oid);
            let Some(rule) = rule else {
                let outcome = api.transfer_options(&oid).await?;
                return Ok(print_rows(outcome, &["TransferOptionType", "Action", "Extension"], format));
            };

            let update = match (extension, greeting) {
                (Some(extension), _) => TransferOptionUpdate {
                    action: Some(TransferAction::Extension),
                    extension: Some(extension),
                    ..TransferOptionUpdate::default()
                },
                (None, true) => TransferOptionUpdate {
                    action: Some(TransferAction::Greeting),
                    ..TransferOptionUpdate::default()
                },
                (None, false) => {
                    let outcome = api.transfer_option(&oid, rule).await?;
                    return Ok(super::print_object(outcome, format));
                }
            };
            let outcome = api.update_transfer_option(&oid, rule, &update).await?;
            Ok(super::print_outcome(&outcome, format))
        }
    }
}

/// Build a greeting update from the command flags. `None` when no flag
/// asks for a change.
fn greeting_update(enable: bool, disable: bool, system: bool, recording: bool) -> Option<GreetingUpdate> {
    let enabled = (enable || disable).then_some(enable);
    let play_what = match (system, recording) {
        (true, _) => Some(PlayWhat::System),
        (false, true) => Some(PlayWhat::Recording),
        (false, false) => None,
    };
    if enabled.is_none() && play_what.is_none() {
        return None;
    }
    Some(GreetingUpdate {
        enabled,
        play_what,
        time_expires: None,
    })
}

/// Print sub-resources as a table of the given fields, or as JSON.
fn print_rows(outcome: cupi_api::ApiOutcome<Vec<Value>>, columns: &[&str], format: OutputFormat) -> ExitCode {
    if let OutputFormat::Json = format {
        return super::print_items(outcome, format);
    }
    let items = match outcome.split() {
        Ok(items) => items,
        Err(rejection) => return super::print_rejection(&rejection.message(), format),
    };

    let mut table = super::new_table(columns.to_vec());
    for item in &items {
        table.add_row(columns.iter().map(|name| super::field(item, name)).collect::<Vec<_>>());
    }
    println!("{table}");
    ExitCode::SUCCESS
}
