use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Tracks whether a digest run is in flight so runs never overlap.
#[derive(Debug, Clone, Default)]
pub struct OverlapGuard {
    is_running: Arc<AtomicBool>,
}

impl OverlapGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` when another run still holds the guard.
    pub fn try_acquire(&self) -> Option<RunGuard> {
        self.is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| RunGuard {
                flag: Arc::clone(&self.is_running),
            })
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }
}

/// Releases the running flag when dropped, including during a panic unwind.
#[derive(Debug)]
pub struct RunGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn second_acquire_fails_until_the_first_drops() {
        let guard = OverlapGuard::new();

        let first = guard.try_acquire();
        assert!(first.is_some());
        assert!(guard.is_running());
        assert!(guard.try_acquire().is_none());

        drop(first);
        assert!(!guard.is_running());
        assert!(guard.try_acquire().is_some());
    }

    #[test]
    fn panicking_run_releases_the_flag() {
        let guard = OverlapGuard::new();
        let shared = guard.clone();

        let result = thread::spawn(move || {
            let _run = shared.try_acquire().expect("free");
            panic!("digest blew up");
        })
        .join();

        assert!(result.is_err());
        assert!(!guard.is_running());
    }
}
