//! Critical-Section Locks
//!
//! Mutual exclusion that is safe to enter from both preemptive tasks and
//! interrupt handlers. Acquisition never yields to a scheduler: it masks
//! interrupts on the calling core and, for the multi-core backend, spins on
//! a per-instance flag.
//!
//! Locks are not reentrant. Bodies executed under a lock must be short and
//! bounded (no I/O, no loops over unbounded input). Protected data is only
//! reachable inside a closure, so nested sections always end in reverse
//! order of entry.

mod irq;
mod protected;
mod raw;

pub use irq::IrqState;
pub use protected::Protected;
pub use raw::{InterruptLock, RawLock, SpinLock};
