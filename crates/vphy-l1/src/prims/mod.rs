pub mod pm;
pub mod rach;

use crate::prims::rach::RachBurst;

/// Work items deferred through the frame-number scheduler. Each payload
/// carries everything its action needs at fire time; nothing is re-read
/// from ambient state except the serving cell's carrier.
#[derive(Debug)]
pub enum SchedWork {
    /// Transmit an access burst and confirm to the upper layer
    RachTx(RachBurst),
}
