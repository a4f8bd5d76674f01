//! Keyed single-document persistence with a cookie-sized ceiling.
//!
//! The original wizard kept its state in one browser cookie. This store
//! keeps the same contract — one serialized record per key, percent
//! encoded, hard 4096-byte ceiling, expiry — but backs it with a typed
//! record under the data directory so schema drift is caught at parse
//! time instead of surfacing as missing fields.
//!
//! `write` never propagates an error to the caller: failures are logged
//! and reported as `false`, with the previous record left intact.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Hard ceiling on a serialized record, matching the 4096-byte cookie
/// limit the original storage lived under.
pub const MAX_RECORD_BYTES: usize = 4096;

/// Cross-site policy flag, recorded for parity with the original
/// cookie transport options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

/// Per-write options.
///
/// `obfuscate` is a reversible base64 encoding of the payload. It keeps
/// casual eyes off the record and nothing more; sensitive fields still
/// need server-side encryption.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    pub secure: bool,
    pub same_site: SameSite,
    pub obfuscate: bool,
}

/// Errors from the storage internals. These never cross the `write`
/// boundary; they are logged and collapsed to a `false` return.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error for {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    #[error("Failed to encode record: {0}")]
    Encode(String),

    #[error("Record for '{key}' is {size} bytes, over the {limit}-byte limit")]
    TooLarge { key: String, size: usize, limit: usize },
}

/// On-disk envelope around one encoded payload.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    expires_at: DateTime<Utc>,
    secure: bool,
    same_site: SameSite,
    obfuscated: bool,
    payload: String,
}

/// Keyed store holding at most one document per key.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    data_dir: PathBuf,
}

impl DocumentStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.kv", key))
    }

    /// Serialized size of `key` + encoded `value`, as counted against
    /// the ceiling.
    pub fn size_of(&self, key: &str, value: &Value) -> usize {
        key.len() + encode_payload(value, false).len()
    }

    /// True if a write of `value` under `key` would fit the ceiling.
    pub fn can_write(&self, key: &str, value: &Value) -> bool {
        self.size_of(key, value) <= MAX_RECORD_BYTES
    }

    /// Persist `value` under `key` with the given time-to-live.
    ///
    /// Returns `false` (and logs) on any failure; the previous record
    /// is untouched in that case.
    pub fn write(&self, key: &str, value: &Value, ttl: Duration, options: &StoreOptions) -> bool {
        match self.try_write(key, value, ttl, options) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Store write for '{}' failed: {}", key, e);
                false
            }
        }
    }

    fn try_write(
        &self,
        key: &str,
        value: &Value,
        ttl: Duration,
        options: &StoreOptions,
    ) -> Result<(), StoreError> {
        let payload = encode_payload(value, options.obfuscate);
        let size = key.len() + payload.len();
        if size > MAX_RECORD_BYTES {
            return Err(StoreError::TooLarge {
                key: key.to_string(),
                size,
                limit: MAX_RECORD_BYTES,
            });
        }

        let record = StoredRecord {
            expires_at: Utc::now() + ttl,
            secure: options.secure,
            same_site: options.same_site,
            obfuscated: options.obfuscate,
            payload,
        };
        let encoded =
            serde_json::to_string(&record).map_err(|e| StoreError::Encode(e.to_string()))?;

        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StoreError::Io(self.data_dir.clone(), e))?;

        // Write to a sibling temp file and rename so a failed write
        // leaves the previous record intact.
        let path = self.path(key);
        let tmp = path.with_extension("kv.tmp");
        fs::write(&tmp, encoded).map_err(|e| StoreError::Io(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| StoreError::Io(path, e))?;

        Ok(())
    }

    /// Read the value stored under `key`.
    ///
    /// Missing, expired or unreadable records read as `None`. A payload
    /// that is not valid JSON comes back as a raw string value.
    pub fn read(&self, key: &str) -> Option<Value> {
        let path = self.path(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Store read for '{}' failed: {}", key, e);
                return None;
            }
        };

        let record: StoredRecord = match serde_json::from_str(&contents) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Store record for '{}' is corrupt: {}", key, e);
                return None;
            }
        };

        if record.expires_at < Utc::now() {
            tracing::debug!("Store record for '{}' expired, removing", key);
            self.delete(key);
            return None;
        }

        decode_payload(&record.payload, record.obfuscated)
    }

    /// Remove the record under `key`. Returns `false` if nothing was
    /// stored there.
    pub fn delete(&self, key: &str) -> bool {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::warn!("Store delete for '{}' failed: {}", key, e);
                false
            }
        }
    }

    pub fn exists(&self, key: &str) -> bool {
        self.path(key).exists()
    }
}

/// JSON-encode non-string values, percent-encode for storage, and
/// optionally obfuscate.
fn encode_payload(value: &Value, obfuscate: bool) -> String {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let encoded = urlencoding::encode(&raw).into_owned();
    if obfuscate {
        BASE64.encode(encoded.as_bytes())
    } else {
        encoded
    }
}

fn decode_payload(payload: &str, obfuscated: bool) -> Option<Value> {
    let encoded = if obfuscated {
        let bytes = match BASE64.decode(payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to deobfuscate payload: {}", e);
                return None;
            }
        };
        match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("Deobfuscated payload is not UTF-8: {}", e);
                return None;
            }
        }
    } else {
        payload.to_string()
    };

    let raw = match urlencoding::decode(&encoded) {
        Ok(raw) => raw.into_owned(),
        Err(e) => {
            tracing::warn!("Failed to percent-decode payload: {}", e);
            return None;
        }
    };

    // Non-JSON payloads fall back to plain strings.
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(raw)),
    }
}
