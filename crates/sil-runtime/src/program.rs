use sil_types::Address;

use crate::context::InvokeContext;
use crate::error::ProgramResult;

/// Something the runtime can execute.
///
/// A program is stateless: everything it knows arrives through the
/// instruction data and the accounts exposed by the [`InvokeContext`].
pub trait Program: Send + Sync {
    /// Address instructions use to reach this program.
    fn id(&self) -> Address;

    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Execute one instruction.
    fn process(&self, ctx: &mut InvokeContext<'_>, data: &[u8]) -> ProgramResult;
}
