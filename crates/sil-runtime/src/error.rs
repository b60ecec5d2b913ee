use sil_store::StoreError;
use sil_types::Address;

/// Errors raised while executing a single instruction.
///
/// Programs report their own failure kinds through [`ProgramError::Custom`];
/// every other variant is raised by the substrate itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
    #[error("custom program error: {0:#x}")]
    Custom(u32),

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("account {0} already in use")]
    AccountAlreadyInUse(Address),

    #[error("missing required signature for {0}")]
    MissingRequiredSignature(Address),

    #[error("instruction modified read-only account {0}")]
    ReadonlyAccountModified(Address),

    #[error("instruction modified data of account {0} it does not own")]
    ExternalAccountModified(Address),

    #[error("account {0} was not passed to the instruction")]
    MissingAccount(Address),

    #[error("instruction lists fewer accounts than required")]
    NotEnoughAccountKeys,

    #[error("signer seeds do not derive the expected address")]
    InvalidSeeds,

    #[error("account data is invalid for this operation")]
    InvalidAccountData,

    #[error("account data too small: need {needed}, have {available}")]
    AccountDataTooSmall { needed: usize, available: usize },

    #[error("instruction data could not be decoded")]
    InvalidInstructionData,

    #[error("account size {requested} exceeds maximum {max}")]
    MaxAccountSize { requested: usize, max: usize },

    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}

/// Result alias for instruction execution.
pub type ProgramResult<T = ()> = Result<T, ProgramError>;

/// Errors that abort a whole transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("missing signature for required signer {0}")]
    MissingSignature(Address),

    #[error("invalid signature from {0}")]
    InvalidSignature(Address),

    #[error("no program registered at {0}")]
    UnknownProgram(Address),

    #[error("lamports not conserved: {before} before, {after} after")]
    UnbalancedTransaction { before: u128, after: u128 },

    #[error("lamport balance overflow")]
    LamportOverflow,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("instruction {index} failed: {error}")]
    InstructionError { index: usize, error: ProgramError },
}

impl TransactionError {
    /// The instruction-level error, if that is what aborted the transaction.
    pub fn instruction_error(&self) -> Option<&ProgramError> {
        match self {
            Self::InstructionError { error, .. } => Some(error),
            _ => None,
        }
    }
}
