use serde_json::Value;
use crate::client::{ApiResponse, VaccineApiClient};
use crate::error::ScenarioFailure;
use crate::models::citizen::CitizenForm;
use crate::models::report::{QueueReportForm, ReportTakenForm};
use crate::models::reservation::ReservationForm;

/// One request against the service.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Register(CitizenForm),
    FetchCitizen(String),
    ListCitizens,
    PurgeCitizens,
    Reserve(ReservationForm),
    FetchReservations(String),
    CancelReservation(String),
    ReportTaken(ReportTakenForm),
    QueueReport(QueueReportForm),
}

impl Step {
    pub fn send(&self, client: &VaccineApiClient) -> anyhow::Result<ApiResponse> {
        match self {
            Step::Register(citizen) => client.register(citizen),
            Step::FetchCitizen(citizen_id) => client.fetch_citizen(citizen_id),
            Step::ListCitizens => client.list_citizens(),
            Step::PurgeCitizens => client.purge_citizens(),
            Step::Reserve(reservation) => client.reserve(reservation),
            Step::FetchReservations(citizen_id) => client.fetch_reservations(citizen_id),
            Step::CancelReservation(citizen_id) => client.cancel_reservation(citizen_id),
            Step::ReportTaken(report) => client.report_taken(report),
            Step::QueueReport(report) => client.queue_report(report),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Step::Register(citizen) => format!("register {:?}", citizen.citizen_id),
            Step::FetchCitizen(citizen_id) => format!("fetch citizen {:?}", citizen_id),
            Step::ListCitizens => "list citizens".to_string(),
            Step::PurgeCitizens => "purge citizens".to_string(),
            Step::Reserve(reservation) => format!(
                "reserve {} for {:?}",
                reservation.vaccine_name, reservation.citizen_id
            ),
            Step::FetchReservations(citizen_id) => format!("fetch reservations of {:?}", citizen_id),
            Step::CancelReservation(citizen_id) => format!("cancel reservation of {:?}", citizen_id),
            Step::ReportTaken(report) => format!(
                "report taken ({}) for {:?}",
                report.option, report.citizen_id
            ),
            Step::QueueReport(report) => format!(
                "queue report {:?} for {:?}",
                report.queue, report.citizen_id
            ),
        }
    }
}

/// What a response must look like for the scenario to pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expectation {
    Status(u16),
    NotStatus(u16),
    /// Exact match on the `feedback` string of a JSON body.
    Feedback(String),
    /// Exact match on the string found at a JSON pointer, e.g. `/0/citizen_id`.
    Field { pointer: String, value: String },
    NonEmptyArray,
}

impl Expectation {
    pub fn feedback(text: &str) -> Self {
        Expectation::Feedback(text.to_string())
    }

    pub fn field(pointer: &str, value: &str) -> Self {
        Expectation::Field {
            pointer: pointer.to_string(),
            value: value.to_string(),
        }
    }

    pub fn check(&self, response: &ApiResponse) -> Result<(), ScenarioFailure> {
        let actual = response.status.as_u16();
        match self {
            Expectation::Status(expected) => {
                if actual != *expected {
                    return Err(ScenarioFailure::Status { expected: *expected, actual });
                }
            }
            Expectation::NotStatus(rejected) => {
                if actual == *rejected {
                    return Err(ScenarioFailure::UnexpectedStatus { rejected: *rejected });
                }
            }
            Expectation::Feedback(expected) => {
                let feedback = response
                    .feedback()
                    .map_err(|_| undecodable(response))?;
                if feedback != *expected {
                    return Err(ScenarioFailure::Feedback {
                        expected: expected.clone(),
                        actual: feedback,
                    });
                }
            }
            Expectation::Field { pointer, value } => {
                let body = response.json().map_err(|_| undecodable(response))?;
                match body.pointer(pointer) {
                    Some(Value::String(found)) if found == value => {}
                    found => {
                        return Err(ScenarioFailure::Field {
                            pointer: pointer.clone(),
                            expected: value.clone(),
                            actual: found.map_or_else(|| "nothing".to_string(), Value::to_string),
                        });
                    }
                }
            }
            Expectation::NonEmptyArray => {
                let body = response.json().map_err(|_| undecodable(response))?;
                match body.as_array() {
                    Some(items) if !items.is_empty() => {}
                    _ => return Err(ScenarioFailure::EmptyCollection { actual: body.to_string() }),
                }
            }
        }
        Ok(())
    }
}

fn undecodable(response: &ApiResponse) -> ScenarioFailure {
    ScenarioFailure::Undecodable {
        status: response.status.as_u16(),
        body: response.body.clone(),
    }
}

/// A request template with its expected outcome.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    /// Sent in order before `request`; their responses are not checked.
    pub setup: Vec<Step>,
    pub request: Step,
    pub expect: Expectation,
}

impl Scenario {
    pub fn new(name: &'static str, description: &'static str, request: Step, expect: Expectation) -> Self {
        Self {
            name,
            description,
            setup: Vec::new(),
            request,
            expect,
        }
    }

    pub fn given(mut self, step: Step) -> Self {
        self.setup.push(step);
        self
    }
}
