//! Audio Delegate
//!
//! A value-semantics audio player owned by each entity. It resolves
//! sound/music names to the opaque numeric ids the audio backend registered
//! (see the entity audio creator on the presentation side) and tracks
//! volume and the last trigger so a re-activated entity can replay itself.
//!
//! The listener position is shared: the external camera-focus owner writes
//! it, every entity's update reads it for distance attenuation.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::math::Vec2;

/// Per-entity audio state.
#[derive(Debug, Clone, Default)]
pub struct AudioPlayer {
    sounds: HashMap<String, u32>,
    music: HashMap<String, u32>,
    current_volume: u32,
    current_sound: Option<String>,
    current_music: Option<String>,
    listener_position: Option<Rc<Cell<Vec2>>>,
    max_distance: f32,
}

impl AudioPlayer {
    /// Create a player with the backend's name->id registrations and the
    /// distance beyond which this entity is inaudible.
    pub fn new(sounds: HashMap<String, u32>, music: HashMap<String, u32>, max_distance: f32) -> Self {
        Self {
            sounds,
            music,
            current_volume: 0,
            current_sound: None,
            current_music: None,
            listener_position: None,
            max_distance,
        }
    }

    pub fn sound_id(&self, sound_name: &str) -> Option<u32> {
        self.sounds.get(sound_name).copied()
    }

    pub fn music_id(&self, music_name: &str) -> Option<u32> {
        self.music.get(music_name).copied()
    }

    /// Position volume attenuation is measured against, if one has been
    /// registered by the external listener owner.
    pub fn listener_position(&self) -> Option<Vec2> {
        self.listener_position.as_ref().map(|shared| shared.get())
    }

    pub fn set_listener_position(&mut self, listener: Option<Rc<Cell<Vec2>>>) {
        self.listener_position = listener;
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    pub fn current_volume(&self) -> u32 {
        self.current_volume
    }

    pub fn set_current_volume(&mut self, volume: u32) {
        self.current_volume = volume;
    }

    pub fn current_sound(&self) -> Option<&str> {
        self.current_sound.as_deref()
    }

    pub fn set_current_sound(&mut self, sound_name: &str) {
        self.current_sound = Some(sound_name.to_string());
    }

    pub fn current_music(&self) -> Option<&str> {
        self.current_music.as_deref()
    }

    pub fn set_current_music(&mut self, music_name: &str) {
        self.current_music = Some(music_name.to_string());
    }

    /// Whether a sound or music trigger is active on this entity.
    pub fn has_active_source(&self) -> bool {
        self.current_sound.is_some() || self.current_music.is_some()
    }
}
