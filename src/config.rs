use clap::Parser;
use crate::contract::ApiContract;

#[derive(Parser, Clone, Debug)]
#[clap(name = "vaccine-api-conformance", about = "Conformance checks for the vaccine registration API")]
pub struct Config {
    /// Base URL of the service under test
    #[clap(env, long)]
    pub url: String,

    #[clap(env, long, value_enum, default_value_t = ApiContract::Current)]
    pub api_contract: ApiContract,

    /// Falls back to the HTTP client's default timeout when unset
    #[clap(env, long)]
    pub request_timeout_secs: Option<u64>,

    /// Only run scenarios whose name contains this text
    #[clap(long)]
    pub filter: Option<String>,

    /// Print the scenario catalog without sending any request
    #[clap(long)]
    pub list: bool,

    #[clap(long)]
    pub json: bool,

    #[clap(long)]
    pub fail_fast: bool,
}
