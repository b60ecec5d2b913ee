//! Deterministic record addresses.
//!
//! A derived address is the BLAKE3 digest of an ordered list of seeds, the
//! owning program's address, and a fixed marker. The digest must not be a
//! valid Ed25519 point: if it were, whoever held the matching private key
//! could sign for the record. [`derive_address`] appends a one-byte bump
//! seed, counting down from 255, until it lands off the curve.

use curve25519_dalek::edwards::CompressedEdwardsY;
use sil_types::Address;

/// Maximum number of seeds, bump included.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed in bytes.
pub const MAX_SEED_LEN: usize = 32;

const DERIVED_ADDRESS_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Errors from address derivation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeriveError {
    #[error("too many seeds: {count} (max {MAX_SEEDS})")]
    TooManySeeds { count: usize },

    #[error("seed {index} is {len} bytes (max {MAX_SEED_LEN})")]
    MaxSeedLengthExceeded { index: usize, len: usize },

    /// The seeds hash to a point on the Ed25519 curve.
    #[error("seeds produce an on-curve address")]
    InvalidSeeds,

    #[error("no bump in 0..=255 yields an off-curve address")]
    BumpSpaceExhausted,
}

/// Returns `true` if `bytes` decode to a valid compressed Edwards point.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}

/// Hash `seeds` under `program_id` into an address, without searching bumps.
///
/// Fails with [`DeriveError::InvalidSeeds`] if the result is on the curve.
pub fn create_address(seeds: &[&[u8]], program_id: &Address) -> Result<Address, DeriveError> {
    if seeds.len() > MAX_SEEDS {
        return Err(DeriveError::TooManySeeds { count: seeds.len() });
    }
    for (index, seed) in seeds.iter().enumerate() {
        if seed.len() > MAX_SEED_LEN {
            return Err(DeriveError::MaxSeedLengthExceeded {
                index,
                len: seed.len(),
            });
        }
    }

    let mut hasher = blake3::Hasher::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.as_ref());
    hasher.update(DERIVED_ADDRESS_MARKER);
    let hash = *hasher.finalize().as_bytes();

    if is_on_curve(&hash) {
        return Err(DeriveError::InvalidSeeds);
    }
    Ok(Address::new(hash))
}

/// Find the canonical derived address for `seeds` and its bump.
///
/// The canonical bump is the highest value that yields an off-curve
/// address. The same inputs always produce the same pair.
pub fn derive_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<(Address, u8), DeriveError> {
    if seeds.len() >= MAX_SEEDS {
        return Err(DeriveError::TooManySeeds {
            count: seeds.len() + 1,
        });
    }

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut seeds_with_bump = seeds.to_vec();
        seeds_with_bump.push(&bump_seed);
        match create_address(&seeds_with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(DeriveError::InvalidSeeds) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(DeriveError::BumpSpaceExhausted)
}

/// Re-derive `seeds + [bump]` and compare against `address`.
pub fn verify_derived(address: &Address, seeds: &[&[u8]], bump: u8, program_id: &Address) -> bool {
    let bump_seed = [bump];
    let mut seeds_with_bump = seeds.to_vec();
    seeds_with_bump.push(&bump_seed);
    matches!(create_address(&seeds_with_bump, program_id), Ok(derived) if derived == *address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::Keypair;
    use proptest::prelude::*;

    fn program() -> Address {
        Address::from_tag(b"test-program")
    }

    #[test]
    fn derive_is_deterministic() {
        let a = derive_address(&[b"counter", b"abc"], &program()).unwrap();
        let b = derive_address(&[b"counter", b"abc"], &program()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn derived_address_is_off_curve() {
        let (address, _) = derive_address(&[b"mint"], &program()).unwrap();
        assert!(!is_on_curve(address.as_bytes()));
    }

    #[test]
    fn public_keys_are_on_curve() {
        let key = Keypair::generate();
        assert!(is_on_curve(key.address().as_bytes()));
    }

    #[test]
    fn program_id_separates_addresses() {
        let other = Address::from_tag(b"other-program");
        let (a, _) = derive_address(&[b"mint"], &program()).unwrap();
        let (b, _) = derive_address(&[b"mint"], &other).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn seed_order_matters() {
        let (a, _) = derive_address(&[b"a", b"b"], &program()).unwrap();
        let (b, _) = derive_address(&[b"b", b"a"], &program()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn canonical_bump_is_highest_off_curve() {
        let seeds: &[&[u8]] = &[b"canonical"];
        let (address, bump) = derive_address(seeds, &program()).unwrap();
        for higher in (u16::from(bump) + 1)..=u16::from(u8::MAX) {
            let bump_seed = [higher as u8];
            assert_eq!(
                create_address(&[seeds[0], &bump_seed], &program()),
                Err(DeriveError::InvalidSeeds)
            );
        }
        assert!(verify_derived(&address, seeds, bump, &program()));
    }

    #[test]
    fn verify_rejects_wrong_bump() {
        let (address, bump) = derive_address(&[b"x"], &program()).unwrap();
        assert!(!verify_derived(&address, &[b"x"], bump.wrapping_sub(1), &program()));
    }

    #[test]
    fn seed_too_long_is_rejected() {
        let long = [0u8; MAX_SEED_LEN + 1];
        assert_eq!(
            derive_address(&[&long], &program()),
            Err(DeriveError::MaxSeedLengthExceeded {
                index: 0,
                len: MAX_SEED_LEN + 1
            })
        );
    }

    #[test]
    fn too_many_seeds_is_rejected() {
        let seed: &[u8] = b"s";
        let seeds = vec![seed; MAX_SEEDS];
        assert_eq!(
            derive_address(&seeds, &program()),
            Err(DeriveError::TooManySeeds {
                count: MAX_SEEDS + 1
            })
        );
    }

    #[test]
    fn counter_encodings_never_collide() {
        let record = Address::new([3; 32]);
        let at = |index: u64| {
            derive_address(&[record.as_ref(), &index.to_le_bytes()], &program())
                .unwrap()
                .0
        };
        let (first, second) = (at(0), at(1));
        assert_ne!(first, second);
    }

    proptest! {
        #[test]
        fn derived_addresses_verify_and_stay_off_curve(
            seeds in proptest::collection::vec(
                proptest::collection::vec(any::<u8>(), 0..=MAX_SEED_LEN),
                0..4,
            )
        ) {
            let refs: Vec<&[u8]> = seeds.iter().map(Vec::as_slice).collect();
            let (address, bump) = derive_address(&refs, &program()).unwrap();
            prop_assert!(!is_on_curve(address.as_bytes()));
            prop_assert!(verify_derived(&address, &refs, bump, &program()));
            prop_assert_eq!(derive_address(&refs, &program()).unwrap(), (address, bump));
        }
    }
}
