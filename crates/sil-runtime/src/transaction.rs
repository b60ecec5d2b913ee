use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sil_crypto::{verify_signature, ContentHasher, Keypair, Signature};
use sil_types::Address;

use crate::error::TransactionError;

/// An account referenced by an instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    pub address: Address,
    /// The transaction must carry a signature from this address.
    pub is_signer: bool,
    /// The instruction may change this account.
    pub is_writable: bool,
}

impl AccountMeta {
    /// A writable account.
    pub fn new(address: Address, is_signer: bool) -> Self {
        Self {
            address,
            is_signer,
            is_writable: true,
        }
    }

    /// A read-only account.
    pub fn new_readonly(address: Address, is_signer: bool) -> Self {
        Self {
            address,
            is_signer,
            is_writable: false,
        }
    }
}

/// One program call inside a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub program_id: Address,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

impl Instruction {
    pub fn new(program_id: Address, data: Vec<u8>, accounts: Vec<AccountMeta>) -> Self {
        Self {
            program_id,
            accounts,
            data,
        }
    }
}

/// The signed body of a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Caller-chosen value that makes otherwise identical messages distinct.
    pub nonce: u64,
    pub instructions: Vec<Instruction>,
}

impl Message {
    pub fn new(instructions: Vec<Instruction>, nonce: u64) -> Self {
        Self {
            nonce,
            instructions,
        }
    }

    /// Canonical bytes covered by signatures.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        bincode::serialize(self).map_err(|e| TransactionError::Serialization(e.to_string()))
    }

    /// Domain-separated hash of the canonical bytes.
    pub fn hash(&self) -> Result<[u8; 32], TransactionError> {
        Ok(ContentHasher::MESSAGE.hash(&self.to_bytes()?))
    }

    /// Every address flagged as a signer by any instruction, sorted.
    pub fn required_signers(&self) -> BTreeSet<Address> {
        self.instructions
            .iter()
            .flat_map(|ix| ix.accounts.iter())
            .filter(|meta| meta.is_signer)
            .map(|meta| meta.address)
            .collect()
    }

    /// Every referenced account with its merged writability, sorted by address.
    ///
    /// An address that is writable in any instruction is writable for the
    /// whole transaction.
    pub fn account_keys(&self) -> Vec<(Address, bool)> {
        let mut keys: BTreeMap<Address, bool> = BTreeMap::new();
        for meta in self.instructions.iter().flat_map(|ix| ix.accounts.iter()) {
            *keys.entry(meta.address).or_insert(false) |= meta.is_writable;
        }
        keys.into_iter().collect()
    }
}

/// A message plus the signatures that authorize it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub message: Message,
    pub signatures: Vec<(Address, Signature)>,
}

impl Transaction {
    /// Sign `message` with every keypair in `signers`.
    pub fn new_signed(message: Message, signers: &[&Keypair]) -> Result<Self, TransactionError> {
        let bytes = message.to_bytes()?;
        let signatures = signers
            .iter()
            .map(|key| (key.address(), key.sign(&bytes)))
            .collect();
        Ok(Self {
            message,
            signatures,
        })
    }

    /// Verify every signature and return the set of proven signers.
    ///
    /// Fails if any signature is invalid or any required signer is missing.
    pub fn verify(&self) -> Result<BTreeSet<Address>, TransactionError> {
        let bytes = self.message.to_bytes()?;
        let mut signers = BTreeSet::new();
        for (address, signature) in &self.signatures {
            verify_signature(address, &bytes, signature)
                .map_err(|_| TransactionError::InvalidSignature(*address))?;
            signers.insert(*address);
        }
        if let Some(missing) = self
            .message
            .required_signers()
            .into_iter()
            .find(|address| !signers.contains(address))
        {
            return Err(TransactionError::MissingSignature(missing));
        }
        Ok(signers)
    }
}
