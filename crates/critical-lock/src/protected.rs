//! Lock-protected cell

use crate::raw::{CriticalSection, RawLock, SpinLock};
use core::cell::UnsafeCell;

/// Data that is only reachable while holding its own lock.
///
/// Every instance owns exactly one lock; no two instances ever serialize
/// against each other. Access is closure-scoped only.
pub struct Protected<T, R: RawLock = SpinLock> {
    lock: R,
    data: UnsafeCell<T>,
}

// SAFETY: access to `data` is serialized by `lock`.
unsafe impl<T: Send, R: RawLock + Sync> Sync for Protected<T, R> {}

impl<T, R: RawLock> Protected<T, R> {
    /// Wrap `data` behind an unlocked lock
    pub const fn new(data: T) -> Self {
        Self {
            lock: R::INIT,
            data: UnsafeCell::new(data),
        }
    }

    /// Run `f` inside one critical section, spinning until the lock is free.
    ///
    /// `f` must be a bounded, pure data operation and must not lock `self`
    /// again.
    pub fn with<U>(&self, f: impl FnOnce(&mut T) -> U) -> U {
        let _section = CriticalSection::enter(&self.lock);
        // SAFETY: the section holds the lock until `f` returns.
        f(unsafe { &mut *self.data.get() })
    }

    /// Run `f` only if the lock is free right now; `None` otherwise
    pub fn try_with<U>(&self, f: impl FnOnce(&mut T) -> U) -> Option<U> {
        let _section = CriticalSection::try_enter(&self.lock)?;
        // SAFETY: the section holds the lock until `f` returns.
        Some(f(unsafe { &mut *self.data.get() }))
    }
}

impl<T: Default, R: RawLock> Default for Protected<T, R> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InterruptLock;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_with_returns_closure_result() {
        let cell: Protected<u32> = Protected::new(41);
        let out = cell.with(|v| {
            *v += 1;
            *v
        });
        assert_eq!(out, 42);
        assert_eq!(cell.try_with(|v| *v), Some(42));
    }

    #[test]
    fn test_try_with_fails_inside_own_section() {
        let cell: Protected<u32> = Protected::new(0);
        let nested = cell.with(|_| cell.try_with(|v| *v));
        assert_eq!(nested, None);
        assert_eq!(cell.try_with(|v| *v), Some(0));
    }

    #[test]
    fn test_nested_sections_on_different_cells() {
        let a: Protected<u32, InterruptLock> = Protected::new(1);
        let b: Protected<u32, InterruptLock> = Protected::new(2);
        let sum = a.with(|x| b.with(|y| *x + *y));
        assert_eq!(sum, 3);
        // Both released, inner first
        assert_eq!(a.try_with(|x| *x), Some(1));
        assert_eq!(b.try_with(|y| *y), Some(2));
    }

    #[test]
    #[should_panic(expected = "re-entered by its holder")]
    fn test_interrupt_lock_reentry_panics() {
        let cell: Protected<u32, InterruptLock> = Protected::new(0);
        cell.with(|_| cell.with(|_| ()));
    }

    #[test]
    fn test_static_initialization() {
        static FLAG: Protected<i32, InterruptLock> = Protected::new(7);
        assert_eq!(FLAG.with(|v| *v), 7);
        FLAG.with(|v| *v = -3);
        assert_eq!(FLAG.with(|v| *v), -3);
    }

    #[test]
    fn test_unrelated_cell_not_blocked_by_other_thread() {
        static A: Protected<u32> = Protected::new(0);
        static B: Protected<u32> = Protected::new(0);
        let holding = Arc::new(AtomicBool::new(false));
        let checked = Arc::new(AtomicBool::new(false));

        let holder = {
            let (holding, checked) = (Arc::clone(&holding), Arc::clone(&checked));
            thread::spawn(move || {
                A.with(|_| {
                    holding.store(true, Ordering::Release);
                    let deadline = Instant::now() + Duration::from_secs(5);
                    while !checked.load(Ordering::Acquire) && Instant::now() < deadline {
                        thread::yield_now();
                    }
                })
            })
        };

        while !holding.load(Ordering::Acquire) {
            thread::yield_now();
        }

        let started = Instant::now();
        assert_eq!(A.try_with(|v| *v), None);
        assert_eq!(B.try_with(|v| *v + 1), Some(1));
        assert!(started.elapsed() < Duration::from_millis(100));
        checked.store(true, Ordering::Release);

        holder.join().unwrap();
        assert_eq!(A.try_with(|v| *v), Some(0));
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        const THREADS: usize = 4;
        const ROUNDS: usize = 1_000;

        let counter: Arc<Protected<usize>> = Arc::new(Protected::new(0));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..ROUNDS {
                        counter.with(|c| *c += 1);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.with(|c| *c), THREADS * ROUNDS);
    }
}
