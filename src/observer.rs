//! Observer Channel
//!
//! Simulation entities broadcast state changes without knowing who renders
//! or plays them. Presentation-layer observers (sprite views, audio
//! emitters) subscribe to an entity's channel and react to tagged events.
//!
//! The registry is keyed by stable subscriber ids and holds weak references:
//! an observer's lifetime is independent of the entity it watches, and a
//! dead observer is pruned on the next broadcast, never dereferenced.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A notification raised by the simulation for presentation-layer consumers.
///
/// Events carry the minimum payload the view side needs to resync; the
/// observer pulls anything else (position, scale, rotation) from the entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// Generic "re-pull my state" signal, raised once per tick and after
    /// any collision-driven move
    Refresh,
    /// The animation advanced to a different sprite frame
    FrameChanged {
        texture_index: u32,
        mirrored: bool,
    },
    /// Start playing the sound with this id
    SoundTriggered(u32),
    /// Start playing the music track with this id
    MusicTriggered(u32),
    /// Whether the current audio should play to completion
    AudioFinish(bool),
    /// Whether the current audio should loop
    AudioLoop(bool),
    /// Stop the active sound
    SoundStopped,
    /// Stop the active music track
    MusicStopped,
    /// Volume changed, 0-100
    VolumeChanged(u32),
    /// One-shot cue raised by a bonus effect (fixed per-bonus code)
    BonusCue(u32),
}

/// Presentation-layer consumer of simulation events.
pub trait Observer {
    fn on_event(&mut self, event: &SimEvent);
}

/// Stable handle to a subscription, usable after the observer itself drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u32);

/// Subscribe/broadcast registry owned by each subject entity.
#[derive(Default)]
pub struct ObserverChannel {
    subscribers: Vec<(SubscriberId, Weak<RefCell<dyn Observer>>)>,
    next_id: u32,
}

impl ObserverChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. The channel keeps only a weak reference; the
    /// caller retains ownership.
    pub fn subscribe<O: Observer + 'static>(&mut self, observer: &Rc<RefCell<O>>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;

        let rc: Rc<RefCell<dyn Observer>> = observer.clone();
        let weak: Weak<RefCell<dyn Observer>> = Rc::downgrade(&rc);
        self.subscribers.push((id, weak));
        id
    }

    /// Remove a subscription by id. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Deliver an event to every live subscriber, pruning dead ones.
    pub fn broadcast(&mut self, event: &SimEvent) {
        let before = self.subscribers.len();

        self.subscribers.retain(|(_, weak)| match weak.upgrade() {
            Some(observer) => {
                observer.borrow_mut().on_event(event);
                true
            }
            None => false,
        });

        let pruned = before - self.subscribers.len();
        if pruned > 0 {
            log::trace!("pruned {} dead observer(s)", pruned);
        }
    }

    /// Number of currently registered subscriptions (live or not yet pruned).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
