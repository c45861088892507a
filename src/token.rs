//! Form tokens.
//!
//! A token is issued into the session under its name so a later request can
//! compare the submitted copy against it.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::store::{KeyedStore, SetOptions};

pub const DEFAULT_TOKEN_NAME: &str = "__token__";

static ISSUED: AtomicU64 = AtomicU64::new(0);

/// Issues a fresh token, stores it in `session` under `name` and returns it
/// as 64 lowercase hex characters.
pub fn build_token<S: KeyedStore + ?Sized>(session: &mut S, name: &str) -> Result<String> {
    let serial = ISSUED.fetch_add(1, Ordering::Relaxed);
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let mut hasher = blake3::Hasher::new();
    hasher.update(name.as_bytes());
    hasher.update(&nanos.to_le_bytes());
    hasher.update(&serial.to_le_bytes());
    let token = hasher.finalize().to_hex().to_string();
    session.set(name, Value::String(token.clone()), &SetOptions::default())?;
    debug!(name = %name, "token issued");
    Ok(token)
}

pub fn token_field(name: &str, token: &str) -> String {
    format!(
        "<input type=\"hidden\" name=\"{}\" value=\"{}\" />",
        escape_attribute(name),
        escape_attribute(token)
    )
}

pub fn token_meta(token: &str) -> String {
    format!("<meta name=\"csrf-token\" content=\"{}\">", escape_attribute(token))
}

fn escape_attribute(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
