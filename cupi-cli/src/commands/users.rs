//! User commands.

use std::process::ExitCode;

use clap::Subcommand;
use dialoguer::Password;
use serde_json::json;

use cupi_api::{ApiClient, CredentialUpdate, NewUser, Oid, Projection};
use cupi_core::error::{CuError, CuResult};

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users.
    List {
        /// Print the full server response.
        #[arg(long)]
        full: bool,
    },
    /// Show a user with its pin and password settings.
    Show {
        /// User object id.
        oid: String,
    },
    /// Create a user from a template.
    Add {
        /// User alias.
        alias: String,
        /// Extension.
        extension: String,
        /// User template alias.
        #[arg(short, long, default_value = "voicemailusertemplate")]
        template: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        display_name: Option<String>,
        /// Locale id, e.g. 1033.
        #[arg(long)]
        language: Option<u32>,
        /// Server time zone id.
        #[arg(long)]
        time_zone: Option<u32>,
        /// Skip first-login enrollment.
        #[arg(long)]
        no_enrollment: bool,
        /// Keep the template's "pin must change" flag.
        #[arg(long)]
        pin_must_change: bool,
    },
    /// Delete a user.
    Delete {
        /// User object id.
        oid: String,
    },
    /// List user templates.
    Templates,
    /// Set a user's voicemail pin.
    SetPin {
        /// User object id.
        oid: String,
        /// New pin (prompted for when omitted).
        #[arg(long)]
        pin: Option<String>,
        /// Require the user to change it at next login.
        #[arg(long)]
        must_change: bool,
    },
}

pub async fn run(api: &ApiClient, action: UsersAction, format: OutputFormat) -> CuResult<ExitCode> {
    match action {
        UsersAction::List { full } => {
            let projection = if full { Projection::Full } else { Projection::Mini };
            let outcome = api.users(projection).await?;
            Ok(super::print_listing(outcome, "Alias", format))
        }

        UsersAction::Show { oid } => {
            let oid = Oid::from(oid);
            let user = match api.user(&oid).await?.split() {
                Ok(user) => user,
                Err(rejection) => return Ok(super::print_rejection(&rejection.message(), format)),
            };
            let pin = api.user_pin_settings(&oid).await?.success();
            let password = api.user_password_settings(&oid).await?.success();
            super::print_json(&json!({ "user": user, "pin": pin, "password": password }));
            Ok(ExitCode::SUCCESS)
        }

        UsersAction::Add {
            alias,
            extension,
            template,
            first_name,
            last_name,
            display_name,
            language,
            time_zone,
            no_enrollment,
            pin_must_change,
        } => {
            let mut user = NewUser::new(&alias, &extension, &template);
            user.first_name = first_name;
            user.last_name = last_name;
            user.display_name = display_name;
            user.language = language;
            user.time_zone = time_zone;
            user.is_set_for_vm_enrollment = !no_enrollment;
            user.cred_must_change = pin_must_change;

            let outcome = api.add_user(&user).await?;
            Ok(super::print_workflow(&outcome, format))
        }

        UsersAction::Delete { oid } => {
            let outcome = api.delete_user(&Oid::from(oid)).await?;
            Ok(super::print_outcome(&outcome, format))
        }

        UsersAction::Templates => {
            let outcome = api.user_templates(Projection::Mini).await?;
            Ok(super::print_listing(outcome, "Template Alias", format))
        }

        UsersAction::SetPin { oid, pin, must_change } => {
            let pin = match pin {
                Some(pin) => pin,
                None => Password::new()
                    .with_prompt("New pin")
                    .with_confirmation("Confirm pin", "Pins do not match")
                    .interact()
                    .map_err(|e| CuError::Internal(e.to_string()))?,
            };
            let mut update = CredentialUpdate::credentials(&pin);
            update.must_change = Some(must_change);

            let outcome = api.update_user_pin(&Oid::from(oid), &update).await?;
            Ok(super::print_outcome(&outcome, format))
        }
    }
}
