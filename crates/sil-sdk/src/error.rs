use sil_crypto::DeriveError;
use sil_intro::IntroError;
use sil_runtime::TransactionError;
use sil_types::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    /// The protocol rejected the operation. Substrate failures inside the
    /// instruction arrive as [`IntroError::SubstrateAbort`].
    #[error("operation rejected: {0}")]
    Protocol(IntroError),

    /// The transaction failed outside any instruction (signatures, storage).
    #[error("transaction aborted: {0}")]
    Transaction(TransactionError),

    #[error("address derivation failed: {0}")]
    Derive(#[from] DeriveError),

    #[error("account {0} does not hold the expected record")]
    UnexpectedAccount(Address),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;

impl SdkError {
    /// The protocol error, if the failure came from the protocol or from the
    /// substrate while executing it.
    pub fn intro_error(&self) -> Option<&IntroError> {
        match self {
            Self::Protocol(error) => Some(error),
            _ => None,
        }
    }

    /// Returns `true` if the substrate, not the protocol, aborted the call.
    pub fn is_substrate_abort(&self) -> bool {
        matches!(
            self,
            Self::Protocol(IntroError::SubstrateAbort(_)) | Self::Transaction(_)
        )
    }
}

impl From<TransactionError> for SdkError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::InstructionError { error, .. } => {
                Self::Protocol(IntroError::from_program_error(error))
            }
            other => Self::Transaction(other),
        }
    }
}
