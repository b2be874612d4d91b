//! Protected Integer Variable
//!
//! A single `i32` shared between one writer (typically an interrupt handler
//! recording an event or alarm id) and any number of readers.

use critical_lock::{Protected, RawLock, SpinLock};

/// Integer that is only read or replaced under its own critical section.
///
/// Only whole-value `get_value`/`set_value` are offered. There is no
/// read-modify-write operation; `get_value` followed by `set_value` is two
/// separate critical sections.
pub struct ProtectedInt<R: RawLock = SpinLock> {
    value: Protected<i32, R>,
}

impl<R: RawLock> ProtectedInt<R> {
    pub const fn new(initial: i32) -> Self {
        Self {
            value: Protected::new(initial),
        }
    }

    /// Current value
    pub fn get_value(&self) -> i32 {
        self.value.with(|v| *v)
    }

    /// Replace the value
    pub fn set_value(&self, value: i32) {
        self.value.with(|v| *v = value);
    }
}

impl<R: RawLock> Default for ProtectedInt<R> {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critical_lock::InterruptLock;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_default_is_zero() {
        let var: ProtectedInt = ProtectedInt::default();
        assert_eq!(var.get_value(), 0);
    }

    #[test]
    fn test_static_alarm_id() {
        static CURRENT_ALARM: ProtectedInt<InterruptLock> = ProtectedInt::new(-1);

        assert_eq!(CURRENT_ALARM.get_value(), -1);
        CURRENT_ALARM.set_value(3);
        assert_eq!(CURRENT_ALARM.get_value(), 3);
    }

    #[test]
    fn test_readers_only_see_written_values() {
        const WRITES: i32 = 10_000;

        let var: Arc<ProtectedInt> = Arc::new(ProtectedInt::new(0));

        let writer = {
            let var = Arc::clone(&var);
            thread::spawn(move || {
                for v in 1..=WRITES {
                    // Every written value is even and non-negative
                    var.set_value(v * 2);
                }
            })
        };

        let readers: Vec<_> = (0..2)
            .map(|_| {
                let var = Arc::clone(&var);
                thread::spawn(move || {
                    let mut last = 0;
                    for _ in 0..WRITES {
                        let seen = var.get_value();
                        assert_eq!(seen % 2, 0);
                        // Single writer, increasing values: never goes backwards
                        assert!(seen >= last);
                        last = seen;
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(var.get_value(), WRITES * 2);
    }

    proptest! {
        #[test]
        fn prop_set_then_get_round_trips(v in any::<i32>()) {
            let var: ProtectedInt = ProtectedInt::new(0);
            var.set_value(v);
            prop_assert_eq!(var.get_value(), v);
        }
    }
}
