//! Typed records stored in account data.
//!
//! Layout: an 8-byte discriminator naming the record type, followed by the
//! `bincode` encoding of the record. The discriminator keeps one record kind
//! from ever being decoded as another, even when a caller passes the wrong
//! account. Bytes past the encoded record are zero.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sil_crypto::ContentHasher;

use crate::error::{ProgramError, ProgramResult};

/// Length of the type tag at the front of every record.
pub const DISCRIMINATOR_LEN: usize = 8;

/// Length prefix `bincode` writes before every string.
pub const STRING_PREFIX_LEN: usize = 8;

/// Encoded length of an address.
pub const ADDRESS_LEN: usize = 32;

/// A record that lives in account data.
pub trait AccountRecord: Serialize + DeserializeOwned {
    /// Stable type name hashed into the discriminator.
    const NAME: &'static str;

    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        ContentHasher::ACCOUNT.discriminator(Self::NAME)
    }

    /// Decode from account data, checking the discriminator.
    fn try_from_bytes(data: &[u8]) -> ProgramResult<Self> {
        if data.len() < DISCRIMINATOR_LEN || data[..DISCRIMINATOR_LEN] != Self::discriminator() {
            return Err(ProgramError::InvalidAccountData);
        }
        bincode::deserialize(&data[DISCRIMINATOR_LEN..])
            .map_err(|_| ProgramError::InvalidAccountData)
    }

    /// Bytes needed to store this value, discriminator included.
    fn encoded_len(&self) -> ProgramResult<usize> {
        let body = bincode::serialized_size(self).map_err(|_| ProgramError::InvalidAccountData)?;
        Ok(DISCRIMINATOR_LEN + body as usize)
    }

    /// Encode into `data`, zeroing any trailing bytes.
    fn write_into(&self, data: &mut [u8]) -> ProgramResult {
        let body = bincode::serialize(self).map_err(|_| ProgramError::InvalidAccountData)?;
        let needed = DISCRIMINATOR_LEN + body.len();
        if data.len() < needed {
            return Err(ProgramError::AccountDataTooSmall {
                needed,
                available: data.len(),
            });
        }
        data[..DISCRIMINATOR_LEN].copy_from_slice(&Self::discriminator());
        data[DISCRIMINATOR_LEN..needed].copy_from_slice(&body);
        data[needed..].fill(0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
        count: u64,
    }

    impl AccountRecord for Note {
        const NAME: &'static str = "test::Note";
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Other {
        text: String,
        count: u64,
    }

    impl AccountRecord for Other {
        const NAME: &'static str = "test::Other";
    }

    fn note() -> Note {
        Note {
            text: "hi".into(),
            count: 3,
        }
    }

    #[test]
    fn encoded_len_matches_layout() {
        assert_eq!(
            note().encoded_len().unwrap(),
            DISCRIMINATOR_LEN + STRING_PREFIX_LEN + 2 + 8
        );
    }

    #[test]
    fn write_then_read() {
        let mut data = vec![0xff; 40];
        note().write_into(&mut data).unwrap();
        assert_eq!(Note::try_from_bytes(&data).unwrap(), note());
        assert!(data[note().encoded_len().unwrap()..].iter().all(|b| *b == 0));
    }

    #[test]
    fn wrong_discriminator_is_rejected() {
        let mut data = vec![0; 40];
        note().write_into(&mut data).unwrap();
        assert_eq!(
            Other::try_from_bytes(&data).unwrap_err(),
            ProgramError::InvalidAccountData
        );
    }

    #[test]
    fn short_buffer_is_rejected() {
        let mut data = vec![0; 10];
        assert_eq!(
            note().write_into(&mut data).unwrap_err(),
            ProgramError::AccountDataTooSmall {
                needed: 26,
                available: 10
            }
        );
    }

    #[test]
    fn empty_data_is_rejected() {
        assert!(Note::try_from_bytes(&[]).is_err());
    }
}
