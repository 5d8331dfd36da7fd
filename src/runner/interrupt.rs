//! User interrupt (Ctrl-C) tracking.
//!
//! A run never aborts mid-step on SIGINT. The handler only raises a flag,
//! and runners check it between steps so the last persisted session stays
//! intact.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Exit status reported when a run was interrupted by the user.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// A cloneable view of an interrupt flag.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    local: Option<Arc<AtomicBool>>,
}

impl InterruptFlag {
    /// Flag backed by the process-wide SIGINT state.
    pub fn process() -> Self {
        Self { local: None }
    }

    /// Independent flag, triggered only via [`InterruptFlag::trigger`].
    pub fn detached() -> Self {
        Self {
            local: Some(Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn is_set(&self) -> bool {
        match &self.local {
            Some(flag) => flag.load(Ordering::SeqCst),
            None => INTERRUPTED.load(Ordering::SeqCst),
        }
    }

    pub fn trigger(&self) {
        match &self.local {
            Some(flag) => flag.store(true, Ordering::SeqCst),
            None => INTERRUPTED.store(true, Ordering::SeqCst),
        }
    }
}

#[cfg(unix)]
extern "C" fn on_sigint(_signal: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Install the SIGINT handler that sets the process-wide flag.
///
/// The handler stays installed after delivery and interrupted system calls
/// are restarted (`SA_RESTART`).
#[cfg(unix)]
pub fn install_handler() {
    let handler: extern "C" fn(libc::c_int) = on_sigint;
    // SAFETY: `sigaction` is plain data and zero is a valid initial state; the
    // handler only performs an atomic store, which is async-signal-safe.
    let installed = unsafe {
        let mut action: libc::sigaction = std::mem::zeroed();
        action.sa_sigaction = handler as libc::sighandler_t;
        action.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&mut action.sa_mask);
        libc::sigaction(libc::SIGINT, &action, std::ptr::null_mut())
    };
    if installed != 0 {
        tracing::warn!(
            "Could not install SIGINT handler: {}",
            std::io::Error::last_os_error()
        );
    }
}

/// No-op outside unix.
///
/// Without a handler, Ctrl-C terminates the process immediately instead of
/// raising the interrupt flag; the session holds whatever was checkpointed
/// before the last finished step.
#[cfg(not(unix))]
pub fn install_handler() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_flag_starts_clear() {
        let flag = InterruptFlag::detached();
        assert!(!flag.is_set());
    }

    #[test]
    fn trigger_is_visible_to_clones() {
        let flag = InterruptFlag::detached();
        let clone = flag.clone();
        flag.trigger();
        assert!(clone.is_set());
    }

    #[test]
    fn detached_flags_are_independent() {
        let a = InterruptFlag::detached();
        let b = InterruptFlag::detached();
        a.trigger();
        assert!(!b.is_set());
    }

    #[cfg(unix)]
    #[test]
    fn handler_persists_with_restart() {
        install_handler();

        // SAFETY: querying the current disposition writes only into `current`.
        let current = unsafe {
            let mut current: libc::sigaction = std::mem::zeroed();
            libc::sigaction(libc::SIGINT, std::ptr::null(), &mut current);
            current
        };
        let expected: extern "C" fn(libc::c_int) = on_sigint;
        assert_eq!(current.sa_sigaction, expected as libc::sighandler_t);
        assert_ne!(current.sa_flags & libc::SA_RESTART, 0);
        assert_eq!(current.sa_flags & libc::SA_RESETHAND, 0);
    }
}
