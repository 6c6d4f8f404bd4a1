//! SMS verification endpoints
//!
//! - `POST /send-sms` issues a code and sends it
//! - `POST /verify-sms` checks and consumes a code
//! - `GET /sms-status` reports pending code and resend state without changing it

pub mod send_sms;
pub mod status;
pub mod verify_sms;

pub use send_sms::send_sms;
pub use status::sms_status;
pub use verify_sms::verify_sms;
