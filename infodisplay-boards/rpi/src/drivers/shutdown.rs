use std::sync::atomic::{AtomicBool, Ordering};

use infodisplay_common::ShutdownSignal;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_signal(_signal: libc::c_int) {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

/// SIGINT/SIGTERM 置位的关机标志
#[derive(Debug, Clone, Copy)]
pub struct SignalShutdown;

impl SignalShutdown {
    pub fn install() -> std::io::Result<Self> {
        for signal in [libc::SIGINT, libc::SIGTERM] {
            // SAFETY: the handler only stores to an atomic, which is async-signal-safe.
            let previous = unsafe { libc::signal(signal, handle_signal as libc::sighandler_t) };
            if previous == libc::SIG_ERR {
                return Err(std::io::Error::last_os_error());
            }
        }
        Ok(Self)
    }
}

impl ShutdownSignal for SignalShutdown {
    fn is_requested(&self) -> bool {
        SHUTDOWN.load(Ordering::SeqCst)
    }
}
