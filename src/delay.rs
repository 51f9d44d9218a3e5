//! Interruptible blocking delays
//!
//! The fixtures' only suspension points are fixed-duration waits that an
//! external cancellation signal may cut short. The contract at every wait
//! site is the same: the wait returns early, the caller logs it, and control
//! flow continues as though the wait had completed. Nothing propagates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use thiserror::Error;

/// Upper bound on a single condvar wait. Signal handlers cannot notify a
/// condvar, so waits are sliced into ticks; signal latency is at most one
/// tick.
const WAIT_TICK: Duration = Duration::from_millis(5);

/// Set from the signal handler, observed by every in-progress wait.
static SIGNAL_FIRED: AtomicBool = AtomicBool::new(false);

/// Errors from the delay plumbing itself. Interruption is not an error.
#[derive(Error, Debug)]
pub enum DelayError {
    #[error("failed to install {signal} handler: {source}")]
    Signal {
        signal: Signal,
        source: nix::Error,
    },
}

/// How a blocking delay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepOutcome {
    /// The full duration elapsed.
    Completed,
    /// The wait was cut short; `remaining` is the unslept portion.
    Interrupted { remaining: Duration },
}

impl SleepOutcome {
    pub fn was_interrupted(&self) -> bool {
        matches!(self, SleepOutcome::Interrupted { .. })
    }
}

#[derive(Debug, Default)]
struct InterruptInner {
    fired: AtomicBool,
    lock: Mutex<()>,
    wakeup: Condvar,
}

/// Cancellation handle shared between the fixture thread and whatever fires
/// the interrupt (a signal handler, or another thread in tests).
///
/// The flag is sticky: once fired, every subsequent delay returns
/// immediately until [`Interrupter::reset`] is called. Each wait site still
/// reports its own interruption, so a late interrupt never increases total
/// elapsed time.
#[derive(Debug, Clone, Default)]
pub struct Interrupter {
    inner: Arc<InterruptInner>,
}

impl Interrupter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interrupt the current wait (if any) and all future ones.
    pub fn fire(&self) {
        self.inner.fired.store(true, Ordering::SeqCst);
        let _guard = self.inner.lock.lock().unwrap();
        self.inner.wakeup.notify_all();
    }

    /// Whether an interrupt (in-process or signal-delivered) is pending.
    pub fn fired(&self) -> bool {
        self.inner.fired.load(Ordering::SeqCst) || SIGNAL_FIRED.load(Ordering::SeqCst)
    }

    /// Clear a pending interrupt. Only embedders that reuse a fixture across
    /// runs need this; the binaries never do.
    pub fn reset(&self) {
        self.inner.fired.store(false, Ordering::SeqCst);
        SIGNAL_FIRED.store(false, Ordering::SeqCst);
    }
}

/// Block the calling thread for `duration`, returning early if `interrupter`
/// fires. Never overshoots the deadline by more than one tick.
pub fn interruptible_sleep(duration: Duration, interrupter: &Interrupter) -> SleepOutcome {
    let deadline = Instant::now() + duration;
    let mut guard = interrupter.inner.lock.lock().unwrap();
    loop {
        if interrupter.fired() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            return SleepOutcome::Interrupted { remaining };
        }
        let now = Instant::now();
        if now >= deadline {
            return SleepOutcome::Completed;
        }
        let wait = (deadline - now).min(WAIT_TICK);
        let (reacquired, _timeout) = interrupter.inner.wakeup.wait_timeout(guard, wait).unwrap();
        guard = reacquired;
    }
}

extern "C" fn on_interrupt_signal(_signum: libc::c_int) {
    // Single atomic store: async-signal-safe.
    SIGNAL_FIRED.store(true, Ordering::SeqCst);
}

/// Route SIGINT and SIGTERM into the interrupt flag so an external signal
/// cuts the current delay short instead of killing the process mid-phase.
pub fn install_signal_interrupt() -> Result<(), DelayError> {
    let action = SigAction::new(
        SigHandler::Handler(on_interrupt_signal),
        SaFlags::empty(),
        SigSet::empty(),
    );
    for sig in [Signal::SIGINT, Signal::SIGTERM] {
        unsafe { signal::sigaction(sig, &action) }
            .map_err(|source| DelayError::Signal { signal: sig, source })?;
    }
    Ok(())
}
