use serde::Serialize;

/// Successful `/api/parse` body: `{"response": "<advice>"}`.
#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub response: String,
}

/// Body of the status endpoints.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}
