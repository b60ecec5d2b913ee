use sil_crypto::DeriveError;
use sil_runtime::ProgramError;
use sil_token::TokenError;
use thiserror::Error;

/// Failure kinds of the student intro protocol.
///
/// Every variant except [`SubstrateAbort`](Self::SubstrateAbort) travels
/// through the runtime as `ProgramError::Custom(code)` and can be recovered
/// with [`IntroError::from_code`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntroError {
    #[error("reward mint is already initialized")]
    AlreadyInitialized,

    #[error("an introduction already exists for this author")]
    RecordAlreadyExists,

    #[error("signer is not allowed to perform this operation")]
    Unauthorized,

    #[error("supplied account does not match its derived address")]
    AddressMismatch,

    #[error("content exceeds the protocol limit")]
    ContentTooLarge,

    #[error("reward mint has not been initialized")]
    MintUninitialized,

    #[error("record could not be resized")]
    ResizeFailed,

    #[error("introduction not found")]
    RecordNotFound,

    #[error("reply counter overflow")]
    CounterOverflow,

    #[error("instruction data could not be decoded")]
    InvalidInstruction,

    #[error("substrate aborted: {0}")]
    SubstrateAbort(ProgramError),
}

/// Result alias for protocol operations.
pub type IntroResult<T = ()> = Result<T, IntroError>;

const CODE_BASE: u32 = 6000;

impl IntroError {
    /// Custom error code, or `None` for substrate failures.
    pub fn code(&self) -> Option<u32> {
        let offset = match self {
            Self::AlreadyInitialized => 0,
            Self::RecordAlreadyExists => 1,
            Self::Unauthorized => 2,
            Self::AddressMismatch => 3,
            Self::ContentTooLarge => 4,
            Self::MintUninitialized => 5,
            Self::ResizeFailed => 6,
            Self::RecordNotFound => 7,
            Self::CounterOverflow => 8,
            Self::InvalidInstruction => 9,
            Self::SubstrateAbort(_) => return None,
        };
        Some(CODE_BASE + offset)
    }

    /// Inverse of [`code`](Self::code).
    pub fn from_code(code: u32) -> Option<Self> {
        let error = match code.checked_sub(CODE_BASE)? {
            0 => Self::AlreadyInitialized,
            1 => Self::RecordAlreadyExists,
            2 => Self::Unauthorized,
            3 => Self::AddressMismatch,
            4 => Self::ContentTooLarge,
            5 => Self::MintUninitialized,
            6 => Self::ResizeFailed,
            7 => Self::RecordNotFound,
            8 => Self::CounterOverflow,
            9 => Self::InvalidInstruction,
            _ => return None,
        };
        Some(error)
    }

    /// Decode a failure reported by the runtime.
    pub fn from_program_error(error: ProgramError) -> Self {
        match error {
            ProgramError::Custom(code) => {
                Self::from_code(code).unwrap_or(Self::SubstrateAbort(error))
            }
            other => Self::SubstrateAbort(other),
        }
    }
}

impl From<IntroError> for ProgramError {
    fn from(err: IntroError) -> Self {
        match err {
            IntroError::SubstrateAbort(inner) => inner,
            other => other
                .code()
                .map_or(ProgramError::InvalidAccountData, ProgramError::Custom),
        }
    }
}

impl From<ProgramError> for IntroError {
    fn from(err: ProgramError) -> Self {
        Self::SubstrateAbort(err)
    }
}

impl From<TokenError> for IntroError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::UninitializedMint => Self::MintUninitialized,
            other => Self::SubstrateAbort(other.into()),
        }
    }
}

impl From<DeriveError> for IntroError {
    fn from(_: DeriveError) -> Self {
        Self::SubstrateAbort(ProgramError::InvalidSeeds)
    }
}
