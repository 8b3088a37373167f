use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub trait ShutdownSignal {
    fn is_requested(&self) -> bool;
}

impl ShutdownSignal for Arc<AtomicBool> {
    fn is_requested(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

impl ShutdownSignal for &'static AtomicBool {
    fn is_requested(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}
