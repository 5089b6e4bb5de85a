//! Secret and public identifiers handed out to projects.

use rand::rngs::OsRng;
use rand::RngCore;

/// Random bytes behind an API key (hex-encoded to 48 characters).
pub const API_KEY_BYTES: usize = 24;

/// Random bytes behind an invite code (hex-encoded to 8 characters).
pub const INVITE_CODE_BYTES: usize = 4;

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn generate_api_key() -> String {
    random_hex(API_KEY_BYTES)
}

pub fn generate_invite_code() -> String {
    random_hex(INVITE_CODE_BYTES)
}
