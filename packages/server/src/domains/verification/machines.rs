//! Pure decisions for the OTP lifecycle.
//!
//! Per record: `Pending -> Verified | Expired | Exhausted`. Everything here
//! is a function of the record, the clock and the policy, so the transitions
//! are tested without a database.

use chrono::{DateTime, Utc};
use rand::Rng;

use super::models::VerificationCode;
use crate::common::constant_time_eq;

/// What a verify attempt should do with the authoritative record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    Expired,
    /// `attempts` already reached the limit
    Exhausted,
    Mismatch,
    Match,
}

/// Decide the outcome of submitting `submitted_digest` against `record`.
///
/// Order matters: expiry wins over exhaustion, and both win over the digest
/// comparison, so a correct code never rescues an exhausted record.
pub fn check_code(
    record: &VerificationCode,
    submitted_digest: &str,
    now: DateTime<Utc>,
    max_attempts: i32,
) -> CodeCheck {
    if record.is_expired(now) {
        CodeCheck::Expired
    } else if record.attempts >= max_attempts {
        CodeCheck::Exhausted
    } else if constant_time_eq(&record.code_hash, submitted_digest) {
        CodeCheck::Match
    } else {
        CodeCheck::Mismatch
    }
}

/// Uniform 6-digit code, never starting with 0.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}
