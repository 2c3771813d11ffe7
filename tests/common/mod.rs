//! In-memory stand-in for the vaccine registration service.
//!
//! Serves both path conventions at once; the configured contract only picks
//! the lookup key and the cancellation success message.

use std::collections::{BTreeMap, HashMap};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Extension, Json, Router};
use serde_json::{json, Value};
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime};
use tokio::sync::oneshot;
use vaccine_api_conformance::contract::ApiContract;

const VACCINES: [&str; 4] = ["Pfizer", "Astra", "Sinopharm", "Sinovac"];
const MAX_AGE_YEARS: i32 = 130;

struct StubState {
    contract: ApiContract,
    citizens: Mutex<BTreeMap<String, HashMap<String, String>>>,
    reservations: Mutex<HashMap<String, (String, String)>>,
}

pub struct StubService {
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl StubService {
    pub fn spawn(contract: ApiContract) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        listener.set_nonblocking(true).expect("non-blocking listener");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();

        let state = Arc::new(StubState {
            contract,
            citizens: Mutex::new(BTreeMap::new()),
            reservations: Mutex::new(HashMap::new()),
        });

        let handle = std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("stub runtime");
            runtime.block_on(async move {
                axum::Server::from_tcp(listener)
                    .expect("stub server")
                    .serve(router(state).into_make_service())
                    .with_graceful_shutdown(async {
                        shutdown_rx.await.ok();
                    })
                    .await
                    .expect("stub server terminated");
            });
        });

        Self {
            base_url,
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }
}

impl Drop for StubService {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn router(state: Arc<StubState>) -> Router {
    Router::new()
        .route("/registration", post(register).get(list_citizens))
        .route("/registration/:citizen_id", get(fetch_citizen))
        .route("/citizen", delete(refuse_purge))
        .route("/citizen/:citizen_id", get(fetch_citizen))
        .route("/reservation", post(reserve).delete(cancel_by_query))
        .route("/reservation/:citizen_id", get(list_reservations).delete(cancel_by_path))
        .route("/report_taken", post(report_taken))
        .route("/queue_report", post(queue_report))
        .fallback(endpoint_not_found)
        .layer(Extension(state))
}

fn feedback(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "feedback": message })))
}

fn is_citizen_id(citizen_id: &str) -> bool {
    citizen_id.len() == 13 && citizen_id.bytes().all(|b| b.is_ascii_digit())
}

/// Accepts `D/M/YYYY` with optional zero padding.
fn parse_birth_date(raw: &str) -> Option<Date> {
    let mut parts = raw.split('/').map(|p| p.parse::<i32>().ok());
    let day = parts.next()??;
    let month = parts.next()??;
    let year = parts.next()??;
    if parts.next().is_some() {
        return None;
    }
    let month = Month::try_from(u8::try_from(month).ok()?).ok()?;
    Date::from_calendar_date(year, month, u8::try_from(day).ok()?).ok()
}

async fn register(
    Extension(state): Extension<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let field = |key: &str| params.get(key).cloned().unwrap_or_default();
    let required = ["citizen_id", "name", "surname", "birth_date", "occupation", "address"];

    if required.iter().any(|key| field(*key).is_empty()) {
        return feedback(StatusCode::OK, "registration failed: missing some attribute");
    }
    let citizen_id = field("citizen_id");
    if !citizen_id.is_ascii() {
        return feedback(StatusCode::OK, "reservation failed: unicode is not allowed for citizen id");
    }
    if !is_citizen_id(&citizen_id) {
        return feedback(StatusCode::OK, "registration failed: invalid citizen ID");
    }
    let today = OffsetDateTime::now_utc().date();
    match parse_birth_date(&field("birth_date")) {
        Some(born) if born <= today && today.year() - born.year() <= MAX_AGE_YEARS => {}
        _ => return feedback(StatusCode::OK, "registration failed: invalid birth date"),
    }
    if field("name").contains('<') || field("name").contains('>') {
        return feedback(StatusCode::OK, "reservation failed: name should not be a script");
    }
    if required.iter().any(|key| field(*key).contains(';')) {
        return feedback(StatusCode::OK, "reservation failed: invalid character");
    }

    let mut citizens = state.citizens.lock().unwrap();
    if citizens.contains_key(&citizen_id) {
        return feedback(StatusCode::OK, "registration failed: this person already registered");
    }
    citizens.insert(citizen_id, params);
    feedback(StatusCode::OK, "registration success!")
}

async fn list_citizens(Extension(state): Extension<Arc<StubState>>) -> impl IntoResponse {
    let citizens = state.citizens.lock().unwrap();
    let records: Vec<Value> = citizens.values().map(|c| json!(c)).collect();
    (StatusCode::OK, Json(Value::Array(records)))
}

async fn fetch_citizen(
    Extension(state): Extension<Arc<StubState>>,
    Path(citizen_id): Path<String>,
) -> impl IntoResponse {
    if !is_citizen_id(&citizen_id) {
        return feedback(StatusCode::BAD_REQUEST, "get citizen failed: invalid citizen ID");
    }
    let citizens = state.citizens.lock().unwrap();
    match citizens.get(&citizen_id) {
        Some(citizen) => {
            let mut record = json!(citizen);
            record[state.contract.citizen_id_key()] = json!(citizen_id);
            if state.contract == ApiContract::Legacy {
                if let Some(object) = record.as_object_mut() {
                    object.remove("citizen_id");
                }
            }
            (StatusCode::OK, Json(record))
        }
        None => feedback(StatusCode::NOT_FOUND, "get citizen failed: citizen ID is not registered"),
    }
}

async fn refuse_purge() -> impl IntoResponse {
    feedback(StatusCode::FORBIDDEN, "delete failed: citizen records cannot be removed")
}

async fn reserve(
    Extension(state): Extension<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let citizen_id = params.get("citizen_id").cloned().unwrap_or_default();
    let site_name = params.get("site_name").cloned().unwrap_or_default();
    let vaccine_name = params.get("vaccine_name").cloned().unwrap_or_default();

    if citizen_id.is_empty() || site_name.is_empty() || vaccine_name.is_empty() {
        return feedback(StatusCode::OK, "reservation failed: missing some attribute");
    }
    if !is_citizen_id(&citizen_id) {
        return feedback(StatusCode::OK, "reservation failed: invalid citizen ID");
    }
    if !state.citizens.lock().unwrap().contains_key(&citizen_id) {
        return feedback(StatusCode::OK, "reservation failed: citizen ID is not registered");
    }
    if !VACCINES.contains(&vaccine_name.as_str()) {
        return feedback(StatusCode::OK, "reservation failed: invalid vaccine name");
    }

    let mut reservations = state.reservations.lock().unwrap();
    if reservations.contains_key(&citizen_id) {
        return feedback(StatusCode::OK, "reservation failed: there is already a reservation for this citizen");
    }
    reservations.insert(citizen_id, (site_name, vaccine_name));
    feedback(StatusCode::OK, "reservation success!")
}

async fn list_reservations(
    Extension(state): Extension<Arc<StubState>>,
    Path(citizen_id): Path<String>,
) -> impl IntoResponse {
    let reservations = state.reservations.lock().unwrap();
    let records: Vec<Value> = reservations
        .get(&citizen_id)
        .map(|(site_name, vaccine_name)| json!({
            "citizen_id": citizen_id,
            "site_name": site_name,
            "vaccine_name": vaccine_name,
        }))
        .into_iter()
        .collect();
    (StatusCode::OK, Json(Value::Array(records)))
}

fn cancel(state: &StubState, citizen_id: &str) -> (StatusCode, Json<Value>) {
    if !is_citizen_id(citizen_id) {
        return feedback(StatusCode::OK, "cancel reservation failed: invalid citizen ID");
    }
    if !state.citizens.lock().unwrap().contains_key(citizen_id) {
        return feedback(StatusCode::OK, "cancel reservation failed: citizen ID is not registered");
    }
    if state.reservations.lock().unwrap().remove(citizen_id).is_none() {
        return feedback(StatusCode::OK, "cancel reservation failed: there is no reservation for this citizen");
    }
    let message = match state.contract {
        ApiContract::Legacy => "cancel reservation successfully",
        ApiContract::Current => "cancel reservation success!",
    };
    feedback(StatusCode::OK, message)
}

async fn cancel_by_path(
    Extension(state): Extension<Arc<StubState>>,
    Path(citizen_id): Path<String>,
) -> impl IntoResponse {
    cancel(&state, &citizen_id)
}

async fn cancel_by_query(
    Extension(state): Extension<Arc<StubState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    cancel(&state, params.get("citizen_id").map(String::as_str).unwrap_or_default())
}

async fn report_taken(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match params.get("option").map(String::as_str) {
        Some("reserve") | Some("walkin") => feedback(StatusCode::OK, "report success!"),
        _ => feedback(StatusCode::OK, "report failed: invalid option"),
    }
}

async fn queue_report(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    let format = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:2]"
    );
    let raw = params.get("queue").cloned().unwrap_or_default();
    let slot = match PrimitiveDateTime::parse(&raw, &format) {
        Ok(slot) => slot.assume_utc(),
        Err(_) => return feedback(StatusCode::OK, "report failed: invalid queue datetime format"),
    };
    if slot <= OffsetDateTime::now_utc() {
        return feedback(StatusCode::OK, "report failed: can only reserve vaccine in the future");
    }
    feedback(StatusCode::OK, "report success!")
}

async fn endpoint_not_found() -> impl IntoResponse {
    feedback(StatusCode::NOT_FOUND, "unknown endpoint")
}
