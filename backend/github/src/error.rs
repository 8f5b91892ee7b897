use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryFailure {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("{0}")]
    GraphQl(String),

    #[error("No data in response")]
    NoData,

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failed query with everything an operator needs to replay it.
#[derive(Error, Debug)]
#[error(
    "Failed to fetch GitHub query\nResponse: {}\nError: {failure}\nQuery: {query}\nvariables: {variables:#}",
    .response.as_deref().unwrap_or("null")
)]
pub struct QueryError {
    pub query: String,
    pub variables: Value,
    pub response: Option<String>,
    #[source]
    pub failure: QueryFailure,
}

impl QueryError {
    pub fn new(query: &str, variables: Value, response: Option<String>, failure: QueryFailure) -> Self {
        Self {
            query: query.to_string(),
            variables,
            response,
            failure,
        }
    }
}
