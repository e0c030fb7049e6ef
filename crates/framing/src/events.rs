use foundation::math::EulerXyz;
use streaming::TileCoord;

use crate::pose::{GroundTarget, OrbitalPose};

/// Notifications surfaced to the host application.
#[derive(Debug, Clone, PartialEq)]
pub enum FramingEvent {
    /// Camera was re-aimed for a newly selected pass; `euler` is the initial
    /// orientation, in the same convention as [`FramingEvent::Settled`].
    PassSelected {
        pose: OrbitalPose,
        target: GroundTarget,
        euler: EulerXyz,
    },
    /// A drag ended; `euler` is the orientation to display or persist.
    Settled { euler: EulerXyz },
    /// The tile neighborhood was rebuilt around `center`.
    TilesRebuilt { center: TileCoord },
}

/// Event with its position in the session's stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub seq: u64,
    pub kind: E,
}

/// Append-only queue the host drains after each call.
#[derive(Debug)]
pub struct EventBus<E> {
    next_seq: u64,
    events: Vec<Event<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            events: Vec::new(),
        }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, kind: E) {
        self.events.push(Event {
            seq: self.next_seq,
            kind,
        });
        self.next_seq += 1;
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;

    #[test]
    fn sequence_numbers_survive_drain() {
        let mut bus = EventBus::new();
        bus.emit("a");
        bus.emit("b");
        let drained = bus.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[1].seq, 1);
        assert!(bus.drain().is_empty());

        bus.emit("c");
        assert_eq!(bus.drain()[0].seq, 2);
    }
}
