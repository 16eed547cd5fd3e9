//! CUPI API - typed client for the Cisco Unity Connection provisioning API.
//!
//! This crate wraps the `/vmrest` REST interface: basic authentication,
//! default JSON headers, status-code interpretation, and one method per
//! resource operation (locations, templates, users and credentials,
//! schedules, call handlers, greetings, menu entries, transfer options,
//! voice files).
//!
//! Two error channels are kept apart. Transport failures are returned as
//! `Err(CuError)`. Everything the server answers, including 404s and
//! unexpected statuses, comes back as an [`ApiOutcome`] or, for the
//! multi-request workflows, a [`WorkflowOutcome`].

pub mod client;
pub mod endpoints;
pub mod response;
pub mod wire;
pub mod workflow;

// Re-export key types
pub use client::ApiClient;
pub use endpoints::call_handlers::NewCallHandler;
pub use endpoints::greetings::{GreetingKind, GreetingUpdate, PlayWhat};
pub use endpoints::menu_entries::{MenuAction, MenuEntryUpdate, MenuKey};
pub use endpoints::schedules::{NewSchedule, ScheduleDetail, Weekdays};
pub use endpoints::transfer_options::{TransferAction, TransferOptionUpdate, TransferRule};
pub use endpoints::users::{CredentialUpdate, NewUser};
pub use response::{ApiOutcome, BinaryResponse, Created, Failure, Listing, Oid, Projection, Rejection, Resource, Summary};
pub use workflow::{Stage, WorkflowOutcome};
