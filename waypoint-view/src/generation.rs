use std::sync::atomic::{AtomicU64, Ordering};

/// Stamp of one full render pass. Deferred work carries the epoch it was
/// scheduled under and must check it before touching the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

impl Epoch {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic render counter, one per controller.
#[derive(Debug, Default)]
pub struct RenderGenerationGuard {
    current: AtomicU64,
}

impl RenderGenerationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new pass; every epoch handed out earlier becomes stale.
    pub fn begin_render(&self) -> Epoch {
        Epoch(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.current.load(Ordering::SeqCst) == epoch.0
    }

    pub fn current(&self) -> Epoch {
        Epoch(self.current.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_pass_supersedes_older() {
        let guard = RenderGenerationGuard::new();
        let first = guard.begin_render();
        assert!(guard.is_current(first));

        let second = guard.begin_render();
        assert!(second > first);
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
        assert_eq!(guard.current(), second);
    }

    #[test]
    fn test_guards_are_independent() {
        let a = RenderGenerationGuard::new();
        let b = RenderGenerationGuard::new();

        let epoch = a.begin_render();
        b.begin_render();
        b.begin_render();

        assert!(a.is_current(epoch));
        assert_eq!(b.current().value(), 2);
    }
}
