//! Recurring schedules that restrict when a campaign may run

use crate::types::{CampaignId, ScheduleId};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Parameters for a new schedule.
///
/// The end date is expressed relative to the moment the schedule is created;
/// the engine resolves it to a calendar date before sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    /// Days on which the campaign may run; must not be empty
    pub days: Vec<Weekday>,

    /// Daily start hour (0..=23)
    pub start_hour: u8,

    /// Daily stop hour (0..=23)
    pub stop_hour: u8,

    /// IANA time zone identifier, e.g. `America/Los_Angeles`
    pub time_zone: String,

    /// Number of weeks after creation at which the schedule ends
    pub end_after_weeks: Option<u32>,
}

impl ScheduleRequest {
    /// Run every day of the week between `start_hour` and `stop_hour`
    pub fn daily(start_hour: u8, stop_hour: u8, time_zone: impl Into<String>) -> Self {
        Self {
            days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ],
            start_hour,
            stop_hour,
            time_zone: time_zone.into(),
            end_after_weeks: None,
        }
    }

    /// Run on a single weekday between `start_hour` and `stop_hour`
    pub fn weekly(day: Weekday, start_hour: u8, stop_hour: u8, time_zone: impl Into<String>) -> Self {
        Self {
            days: vec![day],
            start_hour,
            stop_hour,
            time_zone: time_zone.into(),
            end_after_weeks: None,
        }
    }

    /// End the schedule `weeks` weeks after creation
    pub fn ending_after_weeks(mut self, weeks: u32) -> Self {
        self.end_after_weeks = Some(weeks);
        self
    }
}

/// Schedule as stored by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Schedule id; absent on creation requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ScheduleId>,

    /// Owning campaign
    pub campaign_id: CampaignId,

    /// Days on which the campaign may run
    pub days: Vec<Weekday>,

    /// Daily start hour
    pub start_hour: u8,

    /// Daily stop hour
    pub stop_hour: u8,

    /// IANA time zone identifier
    pub time_zone: String,

    /// Last day on which the schedule applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Outcome of looking up a schedule by id.
///
/// "Not found" is an expected answer (for example right after a delete), so it is
/// a value here rather than a fault; any other failure is reported as a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleLookup {
    /// The schedule exists
    Found(Schedule),
    /// No schedule with that id exists
    NotFound,
}

impl ScheduleLookup {
    /// Whether the schedule exists
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}
