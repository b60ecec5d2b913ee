use sil_runtime::ProgramError;
use thiserror::Error;

/// Errors raised by the token ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("mint is not initialized")]
    UninitializedMint,

    #[error("account is already initialized")]
    AccountAlreadyInitialized,

    #[error("balance belongs to a different mint")]
    MintMismatch,

    #[error("balance belongs to a different owner")]
    OwnerMismatch,

    #[error("signer is not the mint authority")]
    AuthorityMismatch,

    #[error("mint authority did not sign")]
    MissingAuthoritySignature,

    #[error("balance address does not match its derivation")]
    InvalidBalanceAddress,

    #[error("token amount overflow")]
    Overflow,

    #[error(transparent)]
    Program(#[from] ProgramError),
}

/// Result alias for token ledger operations.
pub type TokenResult<T> = Result<T, TokenError>;

impl TokenError {
    /// Code carried in `ProgramError::Custom` when this error leaves the ledger.
    pub fn code(&self) -> Option<u32> {
        match self {
            Self::UninitializedMint => Some(0x100),
            Self::AccountAlreadyInitialized => Some(0x101),
            Self::MintMismatch => Some(0x102),
            Self::OwnerMismatch => Some(0x103),
            Self::AuthorityMismatch => Some(0x104),
            Self::MissingAuthoritySignature => Some(0x105),
            Self::InvalidBalanceAddress => Some(0x106),
            Self::Overflow => Some(0x107),
            Self::Program(_) => None,
        }
    }
}

impl From<TokenError> for ProgramError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Program(inner) => inner,
            other => other
                .code()
                .map_or(ProgramError::InvalidAccountData, ProgramError::Custom),
        }
    }
}
