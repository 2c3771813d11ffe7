use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Registration parameters as sent on the query string.
///
/// Every field is a plain string so that malformed identifiers, dates and
/// names can be submitted unchanged.
#[skip_serializing_none]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CitizenForm {
    pub citizen_id: String,
    pub name: String,
    pub surname: String,
    pub birth_date: String,
    pub occupation: String,
    pub address: String,
    pub is_risk: Option<bool>,
    pub phone_number: Option<String>,
}

impl CitizenForm {
    pub fn new(
        citizen_id: &str,
        name: &str,
        surname: &str,
        birth_date: &str,
        occupation: &str,
        address: &str,
    ) -> Self {
        Self {
            citizen_id: citizen_id.to_string(),
            name: name.to_string(),
            surname: surname.to_string(),
            birth_date: birth_date.to_string(),
            occupation: occupation.to_string(),
            address: address.to_string(),
            is_risk: None,
            phone_number: None,
        }
    }

    pub fn with_contact(mut self, is_risk: bool, phone_number: &str) -> Self {
        self.is_risk = Some(is_risk);
        self.phone_number = Some(phone_number.to_string());
        self
    }
}
