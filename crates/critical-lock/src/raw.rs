//! Raw Lock Backends

use crate::irq::{self, IrqState};
use core::marker::PhantomData;
use core::sync::atomic::{AtomicBool, Ordering};

/// A non-reentrant, non-suspending lock.
///
/// # Safety
///
/// Implementors must guarantee that between a successful `acquire` (or
/// `try_acquire`) and the matching `release`, no other execution context
/// (task, interrupt handler, or the other core) can acquire the same lock,
/// and that writes made while holding it are visible to the next holder.
pub unsafe trait RawLock {
    /// Unlocked initial value, usable in `static` initializers
    const INIT: Self;

    /// Busy-wait until exclusive entry is obtained.
    fn acquire(&self) -> IrqState;

    /// Single attempt; never spins.
    fn try_acquire(&self) -> Option<IrqState>;

    /// Leave the critical section.
    ///
    /// # Safety
    ///
    /// `state` must come from the most recent successful acquisition of this
    /// lock by the current execution context. Nested critical sections must
    /// be released in the reverse order of acquisition.
    unsafe fn release(&self, state: IrqState);
}

/// Interrupt-mask lock for single-core targets.
///
/// Entry masks interrupts on the calling core. While masked, nothing else on
/// the core can run, so finding the `entered` flag already set means the
/// current context is re-entering its own lock.
pub struct InterruptLock {
    entered: AtomicBool,
}

impl InterruptLock {
    pub const fn new() -> Self {
        Self {
            entered: AtomicBool::new(false),
        }
    }
}

impl Default for InterruptLock {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl RawLock for InterruptLock {
    const INIT: Self = Self::new();

    fn acquire(&self) -> IrqState {
        match self.try_acquire() {
            Some(state) => state,
            None => panic!("critical section re-entered by its holder"),
        }
    }

    fn try_acquire(&self) -> Option<IrqState> {
        let state = irq::disable();
        if self
            .entered
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            // SAFETY: pairs with the disable above.
            unsafe { irq::restore(state) };
            return None;
        }
        Some(state)
    }

    unsafe fn release(&self, state: IrqState) {
        self.entered.store(false, Ordering::Release);
        irq::restore(state);
    }
}

/// Interrupt-mask plus spin lock for multi-core targets.
///
/// Entry first masks interrupts on the calling core, so no handler on that
/// core can preempt the holder, then spins on a per-instance flag to exclude
/// the other core. Exit clears the flag with `Release` ordering before
/// restoring the interrupt state. Instances never wait on each other.
pub struct SpinLock {
    locked: AtomicBool,
}

impl SpinLock {
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

impl Default for SpinLock {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl RawLock for SpinLock {
    const INIT: Self = Self::new();

    fn acquire(&self) -> IrqState {
        let state = irq::disable();
        while self
            .locked
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            while self.locked.load(Ordering::Relaxed) {
                core::hint::spin_loop();
            }
        }
        state
    }

    fn try_acquire(&self) -> Option<IrqState> {
        let state = irq::disable();
        if self
            .locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            Some(state)
        } else {
            // SAFETY: pairs with the disable above.
            unsafe { irq::restore(state) };
            None
        }
    }

    unsafe fn release(&self, state: IrqState) {
        self.locked.store(false, Ordering::Release);
        irq::restore(state);
    }
}

/// Scoped acquisition of a raw lock, released on drop.
///
/// Only built inside closure-scoped helpers, so nested sections always end
/// in reverse order. Cannot be sent to another execution context.
pub(crate) struct CriticalSection<'a, R: RawLock> {
    lock: &'a R,
    state: IrqState,
    _not_send: PhantomData<*const ()>,
}

impl<'a, R: RawLock> CriticalSection<'a, R> {
    /// Enter the critical section, spinning until it is free
    pub(crate) fn enter(lock: &'a R) -> Self {
        let state = lock.acquire();
        Self {
            lock,
            state,
            _not_send: PhantomData,
        }
    }

    /// Enter only if the lock is free right now
    pub(crate) fn try_enter(lock: &'a R) -> Option<Self> {
        lock.try_acquire().map(|state| Self {
            lock,
            state,
            _not_send: PhantomData,
        })
    }
}

impl<R: RawLock> Drop for CriticalSection<'_, R> {
    fn drop(&mut self) {
        // SAFETY: `state` came from the acquisition that created this guard.
        unsafe { self.lock.release(self.state) };
    }
}
