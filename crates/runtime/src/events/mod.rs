//! Topic-based event bus for coordination outcomes.
//!
//! Presentation layers (animation, audio, UI) subscribe to the topics they
//! care about. Nothing flows back from subscribers into coordination.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{HordeEvent, PerceptionEvent};
