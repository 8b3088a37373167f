mod display_manager;
mod main_loop;
mod refresh_policy;

pub use display_manager::{DisplayManager, ScreenCursor};
pub use main_loop::{DRAW_QUANTUM, IDLE_POLL, MainLoop, Tick};
pub use refresh_policy::{Cadence, RESUME_GAP_SECS, RefreshPolicy, ScreenState};
