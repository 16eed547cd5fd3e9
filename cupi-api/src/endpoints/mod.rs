//! API endpoint modules organized by resource.
//!
//! Each module adds typed methods to [`ApiClient`](crate::ApiClient) for a
//! group of related `/vmrest` resources.

pub mod system;
pub mod locations;
pub mod users;
pub mod schedules;
pub mod call_handlers;
pub mod greetings;
pub mod voice_files;
pub mod menu_entries;
pub mod transfer_options;
