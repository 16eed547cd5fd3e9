//! Schedule and schedule set endpoints.
//!
//! A schedule set groups a primary schedule and, optionally, a holiday
//! schedule that overrides it. A schedule only has an effect once a
//! schedule detail (time window plus active weekdays) is attached.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use cupi_core::constants::schedule::{DEFAULT_END_MINUTES, DEFAULT_START_MINUTES, MINUTE_GRANULARITY};
use cupi_core::error::CuResult;

use crate::client::ApiClient;
use crate::response::{collection, ApiOutcome, Created, Listing, Oid, Projection, Resource};
use crate::wire;
use crate::workflow::{Pipeline, Stage, WorkflowOutcome};

/// Days a schedule detail is active on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weekdays {
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
    pub sunday: bool,
}

impl Default for Weekdays {
    /// Monday to Friday.
    fn default() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
        }
    }
}

impl Weekdays {
    pub fn every_day() -> Self {
        Self {
            saturday: true,
            sunday: true,
            ..Self::default()
        }
    }

    /// Active flags in Monday-first order.
    pub fn as_array(&self) -> [bool; 7] {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
            self.sunday,
        ]
    }
}

/// Time window and active days of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleDetail {
    /// Minutes past midnight; multiples of 5.
    pub start_minutes: u16,
    /// Minutes past midnight; multiples of 5.
    pub end_minutes: u16,
    pub days: Weekdays,
}

impl Default for ScheduleDetail {
    /// Monday to Friday, 08:30 to 17:00.
    fn default() -> Self {
        Self {
            start_minutes: DEFAULT_START_MINUTES,
            end_minutes: DEFAULT_END_MINUTES,
            days: Weekdays::default(),
        }
    }
}

impl ScheduleDetail {
    pub fn new(start_minutes: u16, end_minutes: u16, days: Weekdays) -> Self {
        Self {
            start_minutes,
            end_minutes,
            days,
        }
    }

    /// Whether both times fall on the server's five-minute grid.
    pub fn is_on_grid(&self) -> bool {
        self.start_minutes % MINUTE_GRANULARITY == 0 && self.end_minutes % MINUTE_GRANULARITY == 0
    }
}

/// Parameters for [`ApiClient::add_schedule`].
#[derive(Debug, Clone)]
pub struct NewSchedule {
    /// Used for the schedule set, the schedule and the detail subject.
    pub display_name: String,
    pub owner_location_oid: Oid,
    pub detail: ScheduleDetail,
}

impl NewSchedule {
    /// A schedule with the default weekday business-hours detail.
    pub fn new(display_name: &str, owner_location_oid: Oid) -> Self {
        Self {
            display_name: display_name.to_string(),
            owner_location_oid,
            detail: ScheduleDetail::default(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ScheduleSetBody<'a> {
    display_name: &'a str,
    owner_location_object_id: &'a Oid,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ScheduleBody<'a> {
    display_name: &'a str,
    owner_location_object_id: &'a Oid,
    #[serde(serialize_with = "wire::bool_token")]
    is_holiday: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ScheduleSetMemberBody<'a> {
    schedule_set_object_id: &'a Oid,
    schedule_object_id: &'a Oid,
    /// false: primary schedule; true: holiday override.
    #[serde(serialize_with = "wire::bool_token")]
    exclude: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ScheduleDetailBody<'a> {
    subject: &'a str,
    #[serde(serialize_with = "wire::num_token")]
    start_time: u16,
    #[serde(serialize_with = "wire::num_token")]
    end_time: u16,
    #[serde(serialize_with = "wire::bool_token")]
    is_active_monday: bool,
    #[serde(serialize_with = "wire::bool_token")]
    is_active_tuesday: bool,
    #[serde(serialize_with = "wire::bool_token")]
    is_active_wednesday: bool,
    #[serde(serialize_with = "wire::bool_token")]
    is_active_thursday: bool,
    #[serde(serialize_with = "wire::bool_token")]
    is_active_friday: bool,
    #[serde(serialize_with = "wire::bool_token")]
    is_active_saturday: bool,
    #[serde(serialize_with = "wire::bool_token")]
    is_active_sunday: bool,
}

impl<'a> ScheduleDetailBody<'a> {
    fn new(subject: &'a str, detail: &ScheduleDetail) -> Self {
        let days = detail.days;
        Self {
            subject,
            start_time: detail.start_minutes,
            end_time: detail.end_minutes,
            is_active_monday: days.monday,
            is_active_tuesday: days.tuesday,
            is_active_wednesday: days.wednesday,
            is_active_thursday: days.thursday,
            is_active_friday: days.friday,
            is_active_saturday: days.saturday,
            is_active_sunday: days.sunday,
        }
    }
}

impl ApiClient {
    // --- Schedule sets ---

    /// List schedule sets.
    pub async fn schedule_sets(&self, projection: Projection) -> CuResult<ApiOutcome<Listing>> {
        let outcome = self.get("/schedulesets").await?.expect_json(Resource::ScheduleSet)?;
        Ok(outcome.map(|v| Listing::project(v, "ScheduleSet", "DisplayName", projection)))
    }

    /// Get a schedule set by OID.
    pub async fn schedule_set(&self, oid: &Oid) -> CuResult<ApiOutcome<Value>> {
        Ok(self
            .get(&format!("/schedulesets/{oid}"))
            .await?
            .expect_json(Resource::ScheduleSet)?)
    }

    /// Membership records of a schedule set.
    pub async fn schedule_set_members(&self, oid: &Oid) -> CuResult<ApiOutcome<Vec<Value>>> {
        let outcome = self
            .get(&format!("/schedulesets/{oid}/schedulesetmembers"))
            .await?
            .expect_json(Resource::ScheduleSet)?;
        Ok(outcome.map(|v| collection(v, "ScheduleSetMember")))
    }

    /// Create an empty schedule set.
    pub async fn create_schedule_set(
        &self,
        display_name: &str,
        owner_location_oid: &Oid,
    ) -> CuResult<ApiOutcome<Created>> {
        let body = ScheduleSetBody {
            display_name,
            owner_location_object_id: owner_location_oid,
        };
        Ok(self
            .post("/schedulesets", &body)
            .await?
            .expect_created(Resource::ScheduleSet, "Schedule set created"))
    }

    /// Delete a schedule set.
    pub async fn delete_schedule_set(&self, oid: &Oid) -> CuResult<ApiOutcome<String>> {
        Ok(self
            .delete(&format!("/schedulesets/{oid}"))
            .await?
            .expect_no_content(Resource::ScheduleSet, "Schedule set deleted".into()))
    }

    /// Add a schedule to a schedule set, as the primary schedule
    /// (`exclude = false`) or as the holiday override (`exclude = true`).
    pub async fn add_schedule_set_member(
        &self,
        schedule_set_oid: &Oid,
        schedule_oid: &Oid,
        exclude: bool,
    ) -> CuResult<ApiOutcome<String>> {
        let body = ScheduleSetMemberBody {
            schedule_set_object_id: schedule_set_oid,
            schedule_object_id: schedule_oid,
            exclude,
        };
        Ok(self
            .post(&format!("/schedulesets/{schedule_set_oid}/schedulesetmembers"), &body)
            .await?
            .expect(201, Resource::ScheduleSet)
            .map(|_| "Schedule set member added".to_string()))
    }

    /// Make `holiday_schedule_oid` the holiday override of a schedule set.
    pub async fn update_schedule_holiday(
        &self,
        schedule_set_oid: &Oid,
        holiday_schedule_oid: &Oid,
    ) -> CuResult<ApiOutcome<String>> {
        let outcome = self
            .add_schedule_set_member(schedule_set_oid, holiday_schedule_oid, true)
            .await?;
        Ok(outcome.map(|_| "Schedule holiday updated".to_string()))
    }

    // --- Schedules ---

    /// List schedules.
    pub async fn schedules(&self, projection: Projection) -> CuResult<ApiOutcome<Listing>> {
        let outcome = self.get("/schedules").await?.expect_json(Resource::Schedule)?;
        Ok(outcome.map(|v| Listing::project(v, "Schedule", "DisplayName", projection)))
    }

    /// Get a schedule by OID.
    pub async fn schedule(&self, oid: &Oid) -> CuResult<ApiOutcome<Value>> {
        Ok(self
            .get(&format!("/schedules/{oid}"))
            .await?
            .expect_json(Resource::Schedule)?)
    }

    /// Details attached to a schedule.
    pub async fn schedule_details(&self, oid: &Oid) -> CuResult<ApiOutcome<Vec<Value>>> {
        let outcome = self
            .get(&format!("/schedules/{oid}/scheduledetails"))
            .await?
            .expect_json(Resource::Schedule)?;
        Ok(outcome.map(|v| collection(v, "ScheduleDetail")))
    }

    /// Create a schedule with no details.
    pub async fn create_schedule(
        &self,
        display_name: &str,
        owner_location_oid: &Oid,
        is_holiday: bool,
    ) -> CuResult<ApiOutcome<Created>> {
        let body = ScheduleBody {
            display_name,
            owner_location_object_id: owner_location_oid,
            is_holiday,
        };
        Ok(self
            .post("/schedules", &body)
            .await?
            .expect_created(Resource::Schedule, "Schedule created"))
    }

    /// Attach a time window and active days to a schedule.
    pub async fn add_schedule_detail(
        &self,
        schedule_oid: &Oid,
        subject: &str,
        detail: &ScheduleDetail,
    ) -> CuResult<ApiOutcome<String>> {
        if !detail.is_on_grid() {
            warn!(
                start = detail.start_minutes,
                end = detail.end_minutes,
                "schedule detail times are not multiples of {MINUTE_GRANULARITY} minutes"
            );
        }
        let body = ScheduleDetailBody::new(subject, detail);
        Ok(self
            .post(&format!("/schedules/{schedule_oid}/scheduledetails"), &body)
            .await?
            .expect(201, Resource::Schedule)
            .map(|_| "Schedule detail added".to_string()))
    }

    /// Delete a schedule.
    pub async fn delete_schedule(&self, oid: &Oid) -> CuResult<ApiOutcome<String>> {
        Ok(self
            .delete(&format!("/schedules/{oid}"))
            .await?
            .expect_no_content(Resource::Schedule, "Schedule deleted".into()))
    }

    /// Create a working schedule in four steps: schedule set, schedule,
    /// set membership, schedule detail.
    ///
    /// Each step needs the OID returned by an earlier one, so the first
    /// rejected step ends the workflow. Nothing is rolled back; the
    /// outcome lists the schedule set and schedule OIDs created so far, in
    /// that order.
    pub async fn add_schedule(&self, schedule: &NewSchedule) -> CuResult<WorkflowOutcome> {
        let name = schedule.display_name.as_str();
        let owner = &schedule.owner_location_oid;
        let mut pipeline = Pipeline::new();

        let outcome = self.create_schedule_set(name, owner).await?;
        let set_oid = match pipeline.stage(Stage::ScheduleSet, outcome) {
            Ok(created) => created.oid,
            Err(failed) => return Ok(failed),
        };
        pipeline.record(set_oid.clone());

        let outcome = self.create_schedule(name, owner, false).await?;
        let schedule_oid = match pipeline.stage(Stage::Schedule, outcome) {
            Ok(created) => created.oid,
            Err(failed) => return Ok(failed),
        };
        pipeline.record(schedule_oid.clone());

        let outcome = self.add_schedule_set_member(&set_oid, &schedule_oid, false).await?;
        if let Err(failed) = pipeline.stage(Stage::ScheduleSetMember, outcome) {
            return Ok(failed);
        }

        let outcome = self.add_schedule_detail(&schedule_oid, name, &schedule.detail).await?;
        if let Err(failed) = pipeline.stage(Stage::ScheduleDetail, outcome) {
            return Ok(failed);
        }

        info!(display_name = name, schedule_set = %set_oid, schedule = %schedule_oid, "schedule added");
        Ok(pipeline.complete("Schedule added"))
    }
}
