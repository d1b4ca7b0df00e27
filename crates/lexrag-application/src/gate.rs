//! Single-occupancy gate for network operations.

use std::sync::atomic::{AtomicBool, Ordering};

/// Admits at most one holder at a time.
///
/// The flag is cleared when the returned guard drops, so every exit path of
/// an operation (success, failure, early return) releases it.
#[derive(Debug, Default)]
pub struct BusyGate {
    busy: AtomicBool,
}

impl BusyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the gate, or returns `None` when someone already holds it.
    pub fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Holds a `BusyGate` until dropped.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    gate: &'a BusyGate,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let gate = BusyGate::new();
        let guard = gate.try_acquire();
        assert!(guard.is_some());
        assert!(gate.is_busy());
        assert!(gate.try_acquire().is_none());
    }

    #[test]
    fn test_drop_releases() {
        let gate = BusyGate::new();
        {
            let _guard = gate.try_acquire().unwrap();
            assert!(gate.is_busy());
        }
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    fn test_release_on_early_return() {
        fn failing_operation(gate: &BusyGate) -> Result<(), &'static str> {
            let _guard = gate.try_acquire().ok_or("busy")?;
            Err("backend unreachable")
        }

        let gate = BusyGate::new();
        assert_eq!(failing_operation(&gate), Err("backend unreachable"));
        assert!(!gate.is_busy());
    }
}
