use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Owner of every account that no program has claimed yet.
pub const SYSTEM_PROGRAM_ID: Address = Address::zeroed();

/// Owner of mint and balance records managed by the token ledger.
pub const TOKEN_LEDGER_ID: Address = Address::from_tag(b"sil-token-ledger");

/// A 32-byte account address.
///
/// The same type names two different things: a signer identity (the raw
/// bytes of an Ed25519 public key) and a record location computed by the
/// address deriver. Derived addresses are guaranteed to lie off the Ed25519
/// curve, so no private key can ever sign for them.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Address([u8; 32]);

impl Address {
    /// Create an address from raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The all-zero address.
    pub const fn zeroed() -> Self {
        Self([0u8; 32])
    }

    /// Build a well-known address from a short ASCII tag, zero padded.
    ///
    /// Tags longer than 32 bytes are truncated.
    pub const fn from_tag(tag: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        let mut i = 0;
        while i < tag.len() && i < 32 {
            bytes[i] = tag[i];
            i += 1;
        }
        Self(bytes)
    }

    /// The raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Copy out the raw 32 bytes.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("ad:{}", hex::encode(&self.0[..4]))
    }

    /// Parse from a hex string (64 hex characters, optional `ad:` prefix).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("ad:").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::try_from(bytes.as_slice())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<Address> for [u8; 32] {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = TypeError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| TypeError::InvalidLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.short_id())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
