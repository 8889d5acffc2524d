//! The focus timer: a drift-free countdown cycling through focus and
//! break modes.
//!
//! - [`machine`]: pure state transitions
//! - [`engine`]: [`TimerEngine`], the stateful owner of one countdown
//! - [`block`]: [`TimerBlock`], the engine plus its tick and config tasks
//! - [`clock`]: injectable time sources
//! - [`schedule`]: abort-on-drop task handles
//!
//! Remaining time is always recomputed from an absolute target timestamp,
//! never decremented per tick, so late, dropped or coalesced ticks cannot
//! accumulate error.

pub mod block;
pub mod clock;
pub mod engine;
pub mod machine;
pub mod schedule;

pub use block::{TimerBlock, TICK_INTERVAL};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{TimerEngine, TimerEvent};
pub use machine::{
    advance_mode, next_mode, transition, Command, ModeSwitch, Outcome, SwitchReason, Transition,
};
pub use schedule::ScheduledTask;
