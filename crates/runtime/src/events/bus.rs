//! Topic-based event bus implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoEnumIterator};
use tokio::sync::broadcast;

use super::types::{HordeEvent, PerceptionEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, EnumCount, EnumIter)]
pub enum Topic {
    /// Horde formation, membership and rally points
    Horde,
    /// Player detection
    Perception,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Horde(HordeEvent),
    Perception(PerceptionEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Horde(_) => Topic::Horde,
            Event::Perception(_) => Topic::Perception,
        }
    }
}

impl From<HordeEvent> for Event {
    fn from(event: HordeEvent) -> Self {
        Event::Horde(event)
    }
}

impl From<PerceptionEvent> for Event {
    fn from(event: PerceptionEvent) -> Self {
        Event::Perception(event)
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; slow subscribers observe
/// `RecvError::Lagged` instead of stalling coordination.
pub struct EventBus {
    channels: Arc<[broadcast::Sender<Event>; Topic::COUNT]>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(std::array::from_fn(|_| broadcast::channel(capacity).0)),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();
        if self.channels[topic as usize].send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels[topic as usize].subscribe()
    }

    /// Subscribe to every topic at once.
    pub fn subscribe_all(&self) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        Topic::iter().map(|topic| (topic, self.subscribe(topic))).collect()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
