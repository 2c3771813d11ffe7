use serde::{Deserialize, Serialize};

/// Outcome message the service returns in place of structured error codes,
/// e.g. `registration failed: invalid citizen ID`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub feedback: String,
}
