//! Locations command.

use std::process::ExitCode;

use cupi_api::{ApiClient, Projection};
use cupi_core::error::CuResult;

use crate::OutputFormat;

pub async fn run(api: &ApiClient, format: OutputFormat) -> CuResult<ExitCode> {
    let outcome = api.locations(Projection::Mini).await?;
    Ok(super::print_listing(outcome, "Location", format))
}
