use serde::{Deserialize, Serialize};

/// Fields a telemetry record must carry before it is forwarded.
pub const REQUIRED_FIELDS: [&str; 4] = ["temperature_c", "spo2_valid", "hr_valid", "ecg"];

// Query parameters for the broker handshake on GET /
#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    #[serde(rename = "confirmationToken")]
    pub confirmation_token: Option<String>,
}

// Response body for a forwarded delivery
#[derive(Debug, Serialize)]
pub struct ForwardResp {
    pub status: &'static str,
    pub supabase_status: u16,
}

// Error body shared by every failure response
#[derive(Debug, Serialize)]
pub struct ErrorResp {
    pub error: String,
}
