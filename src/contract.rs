use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The two path conventions the service has been observed to expose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiContract {
    /// `/citizen/{id}` lookups, cancellation through `?citizen_id=`
    Legacy,
    /// `/registration/{id}` lookups, cancellation through `/reservation/{id}`
    Current,
}

/// Path segments plus query pairs, resolved against the base URL by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub segments: Vec<String>,
    pub query: Vec<(&'static str, String)>,
}

impl Endpoint {
    pub fn path(segments: &[&str]) -> Self {
        Self {
            segments: segments.iter().map(|s| s.to_string()).collect(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: &'static str, value: &str) -> Self {
        self.query.push((key, value.to_string()));
        self
    }
}

impl ApiContract {
    pub fn citizen_lookup(&self, citizen_id: &str) -> Endpoint {
        match self {
            ApiContract::Legacy => Endpoint::path(&["citizen", citizen_id]),
            ApiContract::Current => Endpoint::path(&["registration", citizen_id]),
        }
    }

    pub fn cancel_reservation(&self, citizen_id: &str) -> Endpoint {
        match self {
            ApiContract::Legacy => Endpoint::path(&["reservation"]).with_query("citizen_id", citizen_id),
            ApiContract::Current => Endpoint::path(&["reservation", citizen_id]),
        }
    }

    /// Key under which a citizen record carries its identifier.
    pub fn citizen_id_key(&self) -> &'static str {
        match self {
            ApiContract::Legacy => "citizen-id",
            ApiContract::Current => "citizen_id",
        }
    }

    pub fn cancel_success_feedback(&self) -> &'static str {
        match self {
            ApiContract::Legacy => "cancel reservation successfully",
            ApiContract::Current => "cancel reservation success!",
        }
    }

    /// Whether registrations carry the risk flag and phone number.
    pub fn sends_contact_details(&self) -> bool {
        matches!(self, ApiContract::Current)
    }
}

impl std::fmt::Display for ApiContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiContract::Legacy => write!(f, "legacy"),
            ApiContract::Current => write!(f, "current"),
        }
    }
}
