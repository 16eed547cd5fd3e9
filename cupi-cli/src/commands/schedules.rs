//! Schedule commands.

use std::process::ExitCode;

use clap::Subcommand;
use serde_json::json;

use cupi_api::{ApiClient, NewSchedule, Oid, Projection, ScheduleDetail, Weekdays};
use cupi_core::constants::schedule::{DEFAULT_END_MINUTES, DEFAULT_START_MINUTES};
use cupi_core::error::CuResult;

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum SchedulesAction {
    /// List schedules.
    List {
        /// List schedule sets instead of schedules.
        #[arg(long)]
        sets: bool,
        /// Print the full server response.
        #[arg(long)]
        full: bool,
    },
    /// Show a schedule with its details.
    Show {
        /// Schedule object id.
        oid: String,
        /// The id is a schedule set; show it with its members.
        #[arg(long)]
        set: bool,
    },
    /// Create a schedule set with one working-hours schedule.
    Add {
        /// Display name for both the schedule set and the schedule.
        name: String,
        /// Start of the active window, HH:MM.
        #[arg(long, value_parser = super::parse_clock)]
        start: Option<u16>,
        /// End of the active window, HH:MM.
        #[arg(long, value_parser = super::parse_clock)]
        end: Option<u16>,
        /// Also activate Saturday and Sunday.
        #[arg(long)]
        every_day: bool,
        /// Owner location object id (defaults to the local location).
        #[arg(long)]
        location: Option<String>,
    },
    /// Delete a schedule.
    Delete {
        /// Schedule object id.
        oid: String,
        /// The id is a schedule set, not a schedule.
        #[arg(long)]
        set: bool,
    },
    /// Make a schedule the holiday override of a schedule set.
    Holiday {
        /// Schedule set object id.
        set: String,
        /// Holiday schedule object id.
        schedule: String,
    },
}

pub async fn run(api: &ApiClient, action: SchedulesAction, format: OutputFormat) -> CuResult<ExitCode> {
    match action {
        SchedulesAction::List { sets, full } => {
            let projection = if full { Projection::Full } else { Projection::Mini };
            let (outcome, header) = if sets {
                (api.schedule_sets(projection).await?, "Schedule Set")
            } else {
                (api.schedules(projection).await?, "Schedule")
            };
            Ok(super::print_listing(outcome, header, format))
        }

        SchedulesAction::Show { oid, set: true } => {
            let oid = Oid::from(oid);
            let schedule_set = match api.schedule_set(&oid).await?.split() {
                Ok(schedule_set) => schedule_set,
                Err(rejection) => return Ok(super::print_rejection(&rejection.message(), format)),
            };
            let members = api.schedule_set_members(&oid).await?.success().unwrap_or_default();
            super::print_json(&json!({ "schedule_set": schedule_set, "members": members }));
            Ok(ExitCode::SUCCESS)
        }

        SchedulesAction::Show { oid, set: false } => {
            let oid = Oid::from(oid);
            let schedule = match api.schedule(&oid).await?.split() {
                Ok(schedule) => schedule,
                Err(rejection) => return Ok(super::print_rejection(&rejection.message(), format)),
            };
            let details = api.schedule_details(&oid).await?.success().unwrap_or_default();
            super::print_json(&json!({ "schedule": schedule, "details": details }));
            Ok(ExitCode::SUCCESS)
        }

        SchedulesAction::Add {
            name,
            start,
            end,
            every_day,
            location,
        } => {
            let owner = match location {
                Some(oid) => Oid::from(oid),
                None => match api.owner_location_oid().await?.split() {
                    Ok(oid) => oid,
                    Err(rejection) => return Ok(super::print_rejection(&rejection.message(), format)),
                },
            };

            let days = if every_day { Weekdays::every_day() } else { Weekdays::default() };
            let mut schedule = NewSchedule::new(&name, owner);
            schedule.detail = ScheduleDetail::new(
                start.unwrap_or(DEFAULT_START_MINUTES),
                end.unwrap_or(DEFAULT_END_MINUTES),
                days,
            );

            let outcome = api.add_schedule(&schedule).await?;
            Ok(super::print_workflow(&outcome, format))
        }

        SchedulesAction::Delete { oid, set } => {
            let oid = Oid::from(oid);
            let outcome = if set {
                api.delete_schedule_set(&oid).await?
            } else {
                api.delete_schedule(&oid).await?
            };
            Ok(super::print_outcome(&outcome, format))
        }

        SchedulesAction::Holiday { set, schedule } => {
            let outcome = api
                .update_schedule_holiday(&Oid::from(set), &Oid::from(schedule))
                .await?;
            Ok(super::print_outcome(&outcome, format))
        }
    }
}
