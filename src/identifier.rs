//! Identifier capability and codecs
//!
//! Two type tokens deal with identifiers:
//!
//! - `objectId` asks whether a value behaves like an identifier. This is the
//!   [`Identifier`] capability carried by [`Value::Identifier`] and needs no
//!   setup.
//! - `objectIdString` asks whether a string is a valid identifier encoding.
//!   That question is answered by an [`IdentifierCodec`] installed on the
//!   rule registry; without one, schemas using the token fail with a
//!   configuration error.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;

use chrono::Utc;
use hex::FromHexError;
use rand::RngCore;
use thiserror::Error;
use uuid::Uuid;

use crate::value::Value;

/// Capability of an identifier value.
pub trait Identifier: fmt::Debug + Send + Sync {
    /// Canonical hexadecimal encoding
    fn to_hex_string(&self) -> String;
}

/// Decides whether a string is a valid identifier encoding.
pub trait IdentifierCodec: fmt::Debug + Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    fn is_valid_encoding(&self, encoded: &str) -> bool;
}

/// Errors from parsing an [`ObjectId`] encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseObjectIdError {
    #[error("object id must be 24 hex characters, got {0}")]
    InvalidLength(usize),

    #[error("invalid hex character '{ch}' at index {index}")]
    InvalidCharacter { ch: char, index: usize },
}

/// A 12-byte document identifier.
///
/// Layout: 4-byte big-endian creation time in seconds, 5 process-random
/// bytes, 3-byte counter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        let timestamp = Utc::now().timestamp() as u32;
        let counter = next_counter();

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Creation time in seconds since the Unix epoch
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Parses the 24-character hex encoding.
    pub fn parse_str(encoded: &str) -> Result<Self, ParseObjectIdError> {
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(encoded, &mut bytes).map_err(|err| match err {
            FromHexError::InvalidHexCharacter { c, index } => {
                ParseObjectIdError::InvalidCharacter { ch: c, index }
            }
            _ => ParseObjectIdError::InvalidLength(encoded.chars().count()),
        })?;

        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ParseObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl Identifier for ObjectId {
    fn to_hex_string(&self) -> String {
        self.to_hex()
    }
}

impl From<ObjectId> for Value {
    fn from(id: ObjectId) -> Self {
        Value::identifier(id)
    }
}

fn process_unique() -> &'static [u8; 5] {
    static UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    UNIQUE.get_or_init(|| {
        let mut bytes = [0u8; 5];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes
    })
}

fn next_counter() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER
        .get_or_init(|| AtomicU32::new(rand::thread_rng().next_u32() & 0x00ff_ffff))
        .fetch_add(1, Ordering::Relaxed)
        & 0x00ff_ffff
}

/// Codec accepting 24-digit hex [`ObjectId`] encodings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectIdCodec;

impl IdentifierCodec for ObjectIdCodec {
    fn name(&self) -> &'static str {
        "object_id"
    }

    fn is_valid_encoding(&self, encoded: &str) -> bool {
        ObjectId::parse_str(encoded).is_ok()
    }
}

/// Codec accepting UUID encodings (hyphenated, simple, braced or URN).
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidCodec;

impl IdentifierCodec for UuidCodec {
    fn name(&self) -> &'static str {
        "uuid"
    }

    fn is_valid_encoding(&self, encoded: &str) -> bool {
        Uuid::parse_str(encoded).is_ok()
    }
}

impl Identifier for Uuid {
    fn to_hex_string(&self) -> String {
        self.simple().to_string()
    }
}

impl From<Uuid> for Value {
    fn from(id: Uuid) -> Self {
        Value::identifier(id)
    }
}
