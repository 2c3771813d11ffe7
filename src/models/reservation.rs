use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ReservationForm {
    pub citizen_id: String,
    pub site_name: String,
    pub vaccine_name: String,
}

impl ReservationForm {
    pub fn new(citizen_id: &str, site_name: &str, vaccine_name: &str) -> Self {
        Self {
            citizen_id: citizen_id.to_string(),
            site_name: site_name.to_string(),
            vaccine_name: vaccine_name.to_string(),
        }
    }
}
