/*!
# Tidepool Environment Composer

Turns a declarative deployment description ([`tidepool_sdk::RootSpec`] plus a
list of [`tidepool_sdk::PoolSpec`]s) into the minimal, correctly ordered set of
program instructions, and, depending on the execution mode, either hands the
plan back for later signing or drives every envelope to ledger confirmation
through `tidepool-batch-tx`.

Composition emits per pool, in fixed dependency order: pool registration,
price sources, lending (plus its fee curves), swapping (plus its fee curves),
trading, then strategies. A pre-existing root can be passed back in to resume
a partially applied run; already-confirmed pools are never rolled back.
*/

mod composer;
mod dispatcher;
mod error;
mod handles;

pub use composer::compose_environment;
pub use dispatcher::{Dispatcher, ExecutionMode, InstructionGroup};
pub use error::{ComposeError, ComposeResult};
pub use handles::{EnvironmentHandle, EnvironmentPlan, PoolHandle};
