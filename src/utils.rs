use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Length of a Spotify base-62 track ID.
pub const TRACK_ID_LEN: usize = 22;

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    random_alphanumeric(32)
}

pub fn generate_session_id() -> String {
    random_alphanumeric(48)
}

pub fn is_valid_track_id(id: &str) -> bool {
    id.len() == TRACK_ID_LEN && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Keeps the string entries that look like track IDs, in input order.
///
/// Non-string values and strings of the wrong shape are dropped.
pub fn filter_track_ids(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(Value::as_str)
        .filter(|id| is_valid_track_id(id))
        .map(str::to_string)
        .collect()
}

/// Parses the year from the first four characters of a release date.
///
/// Spotify reports `YYYY`, `YYYY-MM` or `YYYY-MM-DD` depending on precision.
pub fn parse_release_year(date: &str) -> Option<i32> {
    date.get(..4)
        .filter(|year| year.chars().all(|c| c.is_ascii_digit()))
        .and_then(|year| year.parse().ok())
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
