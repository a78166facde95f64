//! Session timer domain module.
//!
//! # Module Structure
//!
//! - `model`: session types, durations/policies and the display snapshot
//! - `machine`: the `SessionTimer` state machine
//! - `event`: transitions reported by the state machine
//! - `format`: `mm:ss` formatting and progress computation

mod event;
mod format;
mod machine;
mod model;

pub use event::TimerEvent;
pub use format::{format_time, progress};
pub use machine::SessionTimer;
pub use model::{
    DEFAULT_BREAK_SECONDS, DEFAULT_WORK_SECONDS, SessionType, TimerSettings, TimerSnapshot,
};
