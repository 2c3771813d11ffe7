use std::time::Duration;
use anyhow::{anyhow, Context};
use reqwest::blocking::Client;
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use crate::contract::{ApiContract, Endpoint};
use crate::models::citizen::CitizenForm;
use crate::models::feedback::Feedback;
use crate::models::report::{QueueReportForm, ReportTakenForm};
use crate::models::reservation::ReservationForm;

/// Status and raw body of a single exchange with the service.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }

    pub fn feedback(&self) -> serde_json::Result<String> {
        serde_json::from_str::<Feedback>(&self.body).map(|f| f.feedback)
    }
}

/// Blocking client for every endpoint of the vaccine registration API.
///
/// Domain failures come back as ordinary responses; only transport errors
/// are returned as `Err`.
pub struct VaccineApiClient {
    http: Client,
    base_url: Url,
    contract: ApiContract,
}

impl VaccineApiClient {
    pub fn new(
        base_url: &str,
        contract: ApiContract,
        request_timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Base URL {} cannot carry a path", base_url));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("Failed to build the HTTP client")?;

        Ok(Self {
            http,
            base_url,
            contract,
        })
    }

    pub fn contract(&self) -> ApiContract {
        self.contract
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn register(&self, citizen: &CitizenForm) -> anyhow::Result<ApiResponse> {
        self.send_with(Method::POST, &Endpoint::path(&["registration"]), citizen)
    }

    pub fn fetch_citizen(&self, citizen_id: &str) -> anyhow::Result<ApiResponse> {
        self.send(Method::GET, &self.contract.citizen_lookup(citizen_id))
    }

    pub fn list_citizens(&self) -> anyhow::Result<ApiResponse> {
        self.send(Method::GET, &Endpoint::path(&["registration"]))
    }

    /// Asks the service to drop its citizen table; a conforming service refuses.
    pub fn purge_citizens(&self) -> anyhow::Result<ApiResponse> {
        self.send(Method::DELETE, &Endpoint::path(&["citizen"]))
    }

    pub fn reserve(&self, reservation: &ReservationForm) -> anyhow::Result<ApiResponse> {
        self.send_with(Method::POST, &Endpoint::path(&["reservation"]), reservation)
    }

    pub fn fetch_reservations(&self, citizen_id: &str) -> anyhow::Result<ApiResponse> {
        self.send(Method::GET, &Endpoint::path(&["reservation", citizen_id]))
    }

    pub fn cancel_reservation(&self, citizen_id: &str) -> anyhow::Result<ApiResponse> {
        self.send(Method::DELETE, &self.contract.cancel_reservation(citizen_id))
    }

    pub fn report_taken(&self, report: &ReportTakenForm) -> anyhow::Result<ApiResponse> {
        self.send_with(Method::POST, &Endpoint::path(&["report_taken"]), report)
    }

    pub fn queue_report(&self, report: &QueueReportForm) -> anyhow::Result<ApiResponse> {
        self.send_with(Method::POST, &Endpoint::path(&["queue_report"]), report)
    }

    pub fn endpoint_url(&self, endpoint: &Endpoint) -> anyhow::Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Base URL {} cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(endpoint.segments.iter());
        if !endpoint.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(endpoint.query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn send(&self, method: Method, endpoint: &Endpoint) -> anyhow::Result<ApiResponse> {
        let url = self.endpoint_url(endpoint)?;
        self.execute(self.http.request(method, url))
    }

    /// The service reads every parameter from the query string, POSTs included.
    fn send_with<T: Serialize>(
        &self,
        method: Method,
        endpoint: &Endpoint,
        params: &T,
    ) -> anyhow::Result<ApiResponse> {
        let url = self.endpoint_url(endpoint)?;
        self.execute(self.http.request(method, url).query(params))
    }

    fn execute(&self, request: reqwest::blocking::RequestBuilder) -> anyhow::Result<ApiResponse> {
        let request = request
            .build()
            .context("Failed to build request")?;
        let description = format!("{} {}", request.method(), request.url());

        let response = self.http
            .execute(request)
            .with_context(|| format!("Request {} failed", description))?;
        let status = response.status();
        let body = response
            .text()
            .with_context(|| format!("Failed to read response body of {}", description))?;

        debug!("{} -> {} {}", description, status.as_u16(), body);
        Ok(ApiResponse { status, body })
    }
}
