//! Store-assigned document identifiers.
//!
//! An `ObjectId` is 12 bytes rendered as 24 lowercase hex characters:
//! a 4-byte big-endian seconds timestamp, a 5-byte value chosen once per
//! process, and a 3-byte counter seeded randomly at startup. Ids generated
//! by one process sort in creation order.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const ID_LEN: usize = 12;
const HEX_LEN: usize = ID_LEN * 2;
const COUNTER_MASK: u32 = 0x00ff_ffff;

static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(rand::random::<[u8; 5]>);
static COUNTER: LazyLock<AtomicU32> =
    LazyLock::new(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK));

/// Error returned when a string is not a well-formed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid identifier")]
pub struct InvalidObjectId(pub String);

/// 12-byte document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; ID_LEN]);

impl ObjectId {
    /// Generates a fresh identifier stamped with the current time.
    pub fn new() -> Self {
        let seconds = jiff::Timestamp::now().as_second().clamp(0, u32::MAX as i64) as u32;
        Self::from_parts(seconds, *PROCESS_UNIQUE, COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    fn from_parts(seconds: u32, process: [u8; 5], counter: u32) -> Self {
        let mut bytes = [0u8; ID_LEN];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&process);
        bytes[9..].copy_from_slice(&(counter & COUNTER_MASK).to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Returns `true` iff `value` is exactly 24 ASCII hex digits.
    ///
    /// Pure check with no side effects; handlers call it before any store
    /// access so malformed identifiers never reach the store.
    pub fn is_valid(value: &str) -> bool {
        value.len() == HEX_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Parses a 24-character hex string.
    pub fn parse_str(value: &str) -> Result<Self, InvalidObjectId> {
        if !Self::is_valid(value) {
            return Err(InvalidObjectId(value.to_string()));
        }

        let mut bytes = [0u8; ID_LEN];
        for (i, chunk) in value.as_bytes().chunks_exact(2).enumerate() {
            bytes[i] = (hex_value(chunk[0]) << 4) | hex_value(chunk[1]);
        }
        Ok(Self(bytes))
    }

    pub fn bytes(&self) -> [u8; ID_LEN] {
        self.0
    }

    /// Seconds since the Unix epoch encoded in the first four bytes.
    pub fn timestamp_seconds(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_str(&raw).map_err(serde::de::Error::custom)
    }
}
