use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use time::macros::format_description;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportOption {
    Reserve,
    Walkin,
}

impl ReportOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportOption::Reserve => "reserve",
            ReportOption::Walkin => "walkin",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReportTakenForm {
    pub citizen_id: String,
    pub vaccine_name: String,
    /// Kept raw so options outside `reserve`/`walkin` can be submitted.
    pub option: String,
}

impl ReportTakenForm {
    pub fn new(citizen_id: &str, vaccine_name: &str, option: ReportOption) -> Self {
        Self::with_raw_option(citizen_id, vaccine_name, option.as_str())
    }

    pub fn with_raw_option(citizen_id: &str, vaccine_name: &str, option: &str) -> Self {
        Self {
            citizen_id: citizen_id.to_string(),
            vaccine_name: vaccine_name.to_string(),
            option: option.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct QueueReportForm {
    pub citizen_id: String,
    pub queue: String,
}

impl QueueReportForm {
    pub fn new(citizen_id: &str, queue: &str) -> Self {
        Self {
            citizen_id: citizen_id.to_string(),
            queue: queue.to_string(),
        }
    }
}

/// Renders `YYYY-MM-DD HH:MM:SS.ss`, the only queue format the service accepts.
pub fn format_queue_slot(slot: OffsetDateTime) -> anyhow::Result<String> {
    let format = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:2]"
    );
    Ok(slot.format(&format)?)
}

/// A queue slot `days_ahead` days after `now`, truncated to the hour.
pub fn future_queue_slot(now: OffsetDateTime, days_ahead: i64) -> anyhow::Result<String> {
    let slot = (now + Duration::days(days_ahead))
        .replace_minute(0)?
        .replace_second(0)?
        .replace_nanosecond(0)?;
    format_queue_slot(slot)
}
