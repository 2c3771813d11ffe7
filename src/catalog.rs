//! The scenario table run against the service.
//!
//! Each entry names the preconditions it needs as setup steps, so the
//! table can be run in any order or filtered down to a single entry.

use time::OffsetDateTime;
use crate::contract::ApiContract;
use crate::models::citizen::CitizenForm;
use crate::models::report::{future_queue_slot, QueueReportForm, ReportOption, ReportTakenForm};
use crate::models::reservation::ReservationForm;
use crate::scenario::{Expectation, Scenario, Step};

pub const SEED_CITIZEN_ID: &str = "1105248761477";
pub const UNREGISTERED_CITIZEN_ID: &str = "1115248761477";
pub const UNRESERVED_CITIZEN_ID: &str = "6677889090152";
pub const SITE_NAME: &str = "hi";
pub const VACCINE_NAME: &str = "Pfizer";
pub const QUEUE_DAYS_AHEAD: i64 = 30;

/// The citizen every scenario may rely on being registered.
pub fn seed_citizen(contract: ApiContract) -> CitizenForm {
    citizen(contract, SEED_CITIZEN_ID, "Kel", "I.", "20/12/1995", "student", "somewhere", false, "0911110000")
}

fn citizen(
    contract: ApiContract,
    citizen_id: &str,
    name: &str,
    surname: &str,
    birth_date: &str,
    occupation: &str,
    address: &str,
    is_risk: bool,
    phone_number: &str,
) -> CitizenForm {
    let form = CitizenForm::new(citizen_id, name, surname, birth_date, occupation, address);
    if contract.sends_contact_details() {
        form.with_contact(is_risk, phone_number)
    } else {
        form
    }
}

fn applicant(contract: ApiContract, citizen_id: &str, name: &str, surname: &str, birth_date: &str, occupation: &str, address: &str) -> CitizenForm {
    citizen(contract, citizen_id, name, surname, birth_date, occupation, address, false, "0918001000")
}

fn reserve_seed(vaccine_name: &str) -> Step {
    Step::Reserve(ReservationForm::new(SEED_CITIZEN_ID, SITE_NAME, vaccine_name))
}

fn cancel_seed() -> Step {
    Step::CancelReservation(SEED_CITIZEN_ID.to_string())
}

fn queue_seed(queue: &str) -> Step {
    Step::QueueReport(QueueReportForm::new(SEED_CITIZEN_ID, queue))
}

fn report_seed(option: &str) -> Step {
    Step::ReportTaken(ReportTakenForm::with_raw_option(SEED_CITIZEN_ID, VACCINE_NAME, option))
}

/// Scenarios with a freshly reserved seed citizen as precondition.
fn with_seed_reserved(scenario: Scenario) -> Scenario {
    scenario.given(cancel_seed()).given(reserve_seed(VACCINE_NAME))
}

pub fn registration_scenarios(contract: ApiContract) -> Vec<Scenario> {
    let missing = "registration failed: missing some attribute";
    let invalid_id = "registration failed: invalid citizen ID";

    vec![
        Scenario::new(
            "register_rejects_non_numeric_id",
            "A citizen ID made of letters is refused",
            Step::Register(applicant(contract, "new citizen", "hi", "s", "1/2/2000", "fish", "water")),
            Expectation::feedback(invalid_id),
        ),
        Scenario::new(
            "register_rejects_negative_id",
            "A negative citizen ID is refused",
            Step::Register(applicant(contract, "-123456789012", "hi", "s", "1/2/2000", "fish", "water")),
            Expectation::feedback(invalid_id),
        ),
        Scenario::new(
            "register_rejects_implausible_birth_date",
            "A citizen born five centuries ago is refused",
            Step::Register(citizen(contract, "9878987898789", "im your ancestor", "s", "1/2/1490", "corpse", "grave", true, "0918001000")),
            Expectation::feedback("registration failed: invalid birth date"),
        ),
        Scenario::new(
            "register_rejects_markup_in_name",
            "An HTML fragment is not accepted as a name",
            Step::Register(applicant(
                contract,
                UNRESERVED_CITIZEN_ID,
                r#"<input type="text" id="fname" name="fname"><br><br>"#,
                "1",
                "1/2/2000",
                "fish",
                "water",
            )),
            Expectation::feedback("reservation failed: name should not be a script"),
        ),
        Scenario::new(
            "register_rejects_sql_injection",
            "SQL statements in text fields are refused",
            Step::Register(applicant(
                contract,
                "1111111111111",
                "1; DROP TABLE citizen",
                "1; DROP TABLE citizen",
                "1/2/2000",
                "1; DROP TABLE citizen",
                "1; DROP TABLE citizen",
            )),
            Expectation::feedback("reservation failed: invalid character"),
        ),
        Scenario::new(
            "register_rejects_unicode_id",
            "A citizen ID with non-ASCII digits is refused",
            Step::Register(applicant(contract, "\u{00B2}12345678900\u{00B2}", "power of 2", "last", "1/2/2000", "math", "math")),
            Expectation::feedback("reservation failed: unicode is not allowed for citizen id"),
        ),
        Scenario::new(
            "register_rejects_missing_name",
            "Registration without a name is incomplete",
            Step::Register(applicant(contract, "0000000000000", "", "s", "1/2/1990", "student", "ground")),
            Expectation::feedback(missing),
        ),
        Scenario::new(
            "register_rejects_missing_id",
            "Registration without a citizen ID is incomplete",
            Step::Register(applicant(contract, "", "hello", "s", "1/2/1990", "student", "ground")),
            Expectation::feedback(missing),
        ),
        Scenario::new(
            "register_rejects_missing_surname",
            "Registration without a surname is incomplete",
            Step::Register(applicant(contract, "0000000000000", "hello", "", "1/2/1990", "student", "ground")),
            Expectation::feedback(missing),
        ),
        Scenario::new(
            "register_rejects_missing_birth_date",
            "Registration without a birth date is incomplete",
            Step::Register(applicant(contract, "0000000000000", "pqrst", "sk", "", "student", "ground")),
            Expectation::feedback(missing),
        ),
        Scenario::new(
            "register_rejects_missing_occupation",
            "Registration without an occupation is incomplete",
            Step::Register(applicant(contract, "0000000000000", "pqrst", "sk", "1/2/1990", "", "ground")),
            Expectation::feedback(missing),
        ),
        Scenario::new(
            "register_rejects_missing_address",
            "Registration without an address is incomplete",
            Step::Register(applicant(contract, "0000000000000", "pqrst", "sk", "1/2/1990", "student", "")),
            Expectation::feedback(missing),
        ),
        Scenario::new(
            "register_rejects_duplicate",
            "The seed citizen cannot register a second time",
            Step::Register(applicant(contract, SEED_CITIZEN_ID, "name", "surname", "1/2/1999", "nope", "space")),
            Expectation::feedback("registration failed: this person already registered"),
        ),
    ]
}

pub fn citizen_scenarios(contract: ApiContract) -> Vec<Scenario> {
    vec![
        Scenario::new(
            "fetch_registered_citizen",
            "Looking up the seed citizen returns their record",
            Step::FetchCitizen(SEED_CITIZEN_ID.to_string()),
            Expectation::field(&format!("/{}", contract.citizen_id_key()), SEED_CITIZEN_ID),
        ),
        Scenario::new(
            "fetch_citizen_rejects_negative_id",
            "Looking up a negative citizen ID does not succeed",
            Step::FetchCitizen("-123456789123".to_string()),
            Expectation::NotStatus(200),
        ),
        Scenario::new(
            "purge_citizens_is_refused",
            "Deleting the citizen table leaves registrations in place",
            Step::ListCitizens,
            Expectation::NonEmptyArray,
        )
        .given(Step::PurgeCitizens),
    ]
}

pub fn reservation_scenarios(contract: ApiContract) -> Vec<Scenario> {
    vec![
        Scenario::new(
            "reserve_accepted",
            "The seed citizen can reserve a vaccine",
            reserve_seed(VACCINE_NAME),
            Expectation::Status(200),
        )
        .given(cancel_seed()),
        with_seed_reserved(Scenario::new(
            "reservation_is_listed",
            "A reservation shows up under the citizen's reservations",
            Step::FetchReservations(SEED_CITIZEN_ID.to_string()),
            Expectation::field("/0/citizen_id", SEED_CITIZEN_ID),
        )),
        Scenario::new(
            "reserve_rejects_unknown_vaccine",
            "Reserving a vaccine the service does not offer is refused",
            reserve_seed("Something"),
            Expectation::feedback("reservation failed: invalid vaccine name"),
        )
        .given(cancel_seed()),
        with_seed_reserved(Scenario::new(
            "reserve_rejects_second_reservation",
            "A citizen holds at most one reservation",
            reserve_seed(VACCINE_NAME),
            Expectation::feedback("reservation failed: there is already a reservation for this citizen"),
        )),
        Scenario::new(
            "cancel_reservation",
            "An existing reservation can be cancelled",
            cancel_seed(),
            Expectation::feedback(contract.cancel_success_feedback()),
        )
        .given(reserve_seed(VACCINE_NAME)),
        Scenario::new(
            "cancel_rejects_unregistered_citizen",
            "Cancelling for a citizen who never registered is refused",
            Step::CancelReservation(UNREGISTERED_CITIZEN_ID.to_string()),
            Expectation::feedback("cancel reservation failed: citizen ID is not registered"),
        ),
        Scenario::new(
            "cancel_rejects_non_numeric_id",
            "Cancelling with letters in the citizen ID is refused",
            Step::CancelReservation("1a2b3c4d5e6f7".to_string()),
            Expectation::feedback("cancel reservation failed: invalid citizen ID"),
        ),
        Scenario::new(
            "cancel_without_reservation",
            "Cancelling when nothing is reserved is refused",
            Step::CancelReservation(UNRESERVED_CITIZEN_ID.to_string()),
            Expectation::feedback("cancel reservation failed: there is no reservation for this citizen"),
        )
        .given(Step::Register(applicant(contract, UNRESERVED_CITIZEN_ID, "hi", "1", "1/2/2000", "fish", "water")))
        .given(Step::CancelReservation(UNRESERVED_CITIZEN_ID.to_string())),
    ]
}

pub fn report_scenarios(now: OffsetDateTime) -> anyhow::Result<Vec<Scenario>> {
    let upcoming = future_queue_slot(now, QUEUE_DAYS_AHEAD)?;

    Ok(vec![
        with_seed_reserved(Scenario::new(
            "report_taken_reserve",
            "A reserved vaccination can be reported as taken",
            report_seed(ReportOption::Reserve.as_str()),
            Expectation::feedback("report success!"),
        )),
        with_seed_reserved(Scenario::new(
            "report_taken_walkin",
            "A walk-in vaccination can be reported as taken",
            report_seed(ReportOption::Walkin.as_str()),
            Expectation::feedback("report success!"),
        )),
        with_seed_reserved(Scenario::new(
            "report_taken_rejects_invalid_option",
            "Only reserve and walkin are valid report options",
            report_seed("sth"),
            Expectation::feedback("report failed: invalid option"),
        )),
        with_seed_reserved(Scenario::new(
            "queue_report_future_slot",
            "A queue slot in the future is accepted",
            queue_seed(&upcoming),
            Expectation::feedback("report success!"),
        )),
        with_seed_reserved(Scenario::new(
            "queue_report_rejects_malformed_datetime",
            "A queue slot written day-first is refused",
            queue_seed("10-11-2021 10:00:00.00"),
            Expectation::feedback("report failed: invalid queue datetime format"),
        )),
        with_seed_reserved(Scenario::new(
            "queue_report_rejects_past_slot",
            "A queue slot in the past is refused",
            queue_seed("2021-10-10 10:00:00.00"),
            Expectation::feedback("report failed: can only reserve vaccine in the future"),
        )),
    ])
}

/// Every scenario for `contract`, with future timestamps computed from `now`.
pub fn catalog(contract: ApiContract, now: OffsetDateTime) -> anyhow::Result<Vec<Scenario>> {
    let mut scenarios = registration_scenarios(contract);
    scenarios.extend(citizen_scenarios(contract));
    scenarios.extend(reservation_scenarios(contract));
    scenarios.extend(report_scenarios(now)?);
    Ok(scenarios)
}
