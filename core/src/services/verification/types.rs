//! Types for verification service results

use serde::Serialize;

use crate::domain::entities::verification_code::IssuedCode;

use super::traits::ProviderResponse;

/// Result of a successful code issuance
#[derive(Debug, Clone, Serialize)]
pub struct IssueOutcome {
    /// The code as stored and sent
    pub issued: IssuedCode,
    /// Provider acknowledgement, returned to the client unchanged
    pub provider_response: ProviderResponse,
    /// TTL written with the code
    pub code_valid_for_seconds: u64,
    /// TTL written with the send marker this call created
    pub resend_after_seconds: u64,
}

/// Read-only view of a phone number's verification state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodeStatus {
    /// Whether a code is waiting to be verified
    pub code_active: bool,
    /// Seconds until the active code expires
    pub code_expires_in: Option<u64>,
    /// Seconds until another code may be requested (`None` when allowed now)
    pub resend_available_in: Option<u64>,
}
