// crates/hrflowcore/src/events/mod.rs

mod bus;

pub use bus::{EventBus, ExecutionEvent, RunId};
