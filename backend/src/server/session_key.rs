//! Session signing key loading and fingerprinting.
//!
//! The key file holds raw bytes; at least 32 are needed to derive an Actix
//! cookie key. Only a truncated SHA-256 fingerprint is ever logged.

use std::path::{Path, PathBuf};

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

const KEY_MIN_LEN: usize = 32;
const FINGERPRINT_BYTES: usize = 8;

/// Failures while loading the session key.
#[derive(Debug, thiserror::Error)]
pub enum SessionKeyError {
    /// The key file could not be read and ephemeral keys are not allowed.
    #[error("failed to read session key at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file holds too little material.
    #[error("session key at {path} too short: need >= {KEY_MIN_LEN} bytes, got {length}")]
    TooShort { path: PathBuf, length: usize },
}

/// Load the cookie key from `path`, or generate a throwaway key when
/// `allow_ephemeral` is set and the file cannot be read.
pub fn load_session_key(path: &Path, allow_ephemeral: bool) -> Result<Key, SessionKeyError> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            if bytes.len() < KEY_MIN_LEN {
                return Err(SessionKeyError::TooShort {
                    path: path.to_path_buf(),
                    length: bytes.len(),
                });
            }
            Ok(Key::derive_from(&bytes))
        }
        Err(source) if allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "using ephemeral session key");
            Ok(Key::generate())
        }
        Err(source) => Err(SessionKeyError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// First eight bytes of the SHA-256 of the signing key, hex encoded.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    digest
        .get(..FINGERPRINT_BYTES)
        .map(hex::encode)
        .unwrap_or_default()
}
