use serde::Serialize;

#[derive(Serialize)]
pub struct CreateResponse {
    pub status: &'static str,
    pub key: String,
}

/// Body returned for every failed request. `details` is only populated for
/// store failures.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
