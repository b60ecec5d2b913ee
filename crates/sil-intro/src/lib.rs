//! The student intro protocol.
//!
//! Students publish one introduction each, anyone may reply, and both
//! actions earn reward tokens. Every record lives at an address derived
//! from its relationships (see [`address`]), so no record stores a pointer
//! to another:
//!
//! - Mint controller: creates the single reward mint, owned by the protocol
//! - Record store: create, update (with in-place resize), and close introductions
//! - Reply index and reply store: a per-introduction counter that names each
//!   reply's address and advances by exactly one per reply
//! - Reward dispatcher: mints a fixed amount to the acting signer as the
//!   last step of every rewarded action
//!
//! Each instruction runs as one runtime transaction, so a failing reward
//! undoes the record changes made before it.

pub mod address;
pub mod config;
pub mod error;
pub mod instruction;
pub mod processor;
pub mod state;

pub use address::{
    counter_address, intro_address, reply_address, reward_mint_address, COUNTER_SEED, MINT_SEED,
    PROGRAM_ID,
};
pub use config::ProgramConfig;
pub use error::{IntroError, IntroResult};
pub use instruction::IntroInstruction;
pub use processor::StudentIntroProgram;
pub use state::{IntroductionRecord, ReplyCounter, ReplyRecord};
