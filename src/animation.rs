//! Animation Delegate
//!
//! A value-semantics animation player owned by each entity. It only tracks
//! which texture index of which named animation is current; texture loading
//! and sprite drawing live in the presentation layer, which resyncs through
//! `SimEvent::FrameChanged`.

use std::collections::HashMap;
use serde::{Serialize, Deserialize};

/// A named sequence of texture indices within the entity's texture group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// Texture indices played in order, one per tick, wrapping
    pub frames: Vec<u32>,
    /// Draw frames flipped horizontally (facing direction)
    pub horizontal_mirror: bool,
}

impl Animation {
    pub fn new(frames: Vec<u32>) -> Self {
        Self {
            frames,
            horizontal_mirror: false,
        }
    }

    pub fn mirrored(mut self) -> Self {
        self.horizontal_mirror = true;
        self
    }
}

/// Per-entity animation state.
#[derive(Debug, Clone, Default)]
pub struct AnimationPlayer {
    name: String,
    animations: HashMap<String, Animation>,
    current: Option<String>,
    frame_cursor: usize,
}

impl AnimationPlayer {
    /// Create a player for a texture group with its named animations.
    pub fn new(name: impl Into<String>, animations: HashMap<String, Animation>) -> Self {
        Self {
            name: name.into(),
            animations,
            current: None,
            frame_cursor: 0,
        }
    }

    /// Texture group name this player draws from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Step the current animation by one frame, wrapping at the end.
    pub fn advance_animation(&mut self) {
        if let Some(animation) = self.current_animation() {
            let count = animation.frames.len();
            if count > 0 {
                self.frame_cursor = (self.frame_cursor + 1) % count;
            }
        }
    }

    /// Switch to a named animation from its first frame. Unknown names are
    /// ignored.
    pub fn start_animation(&mut self, animation_name: &str) {
        if self.animations.contains_key(animation_name) {
            self.current = Some(animation_name.to_string());
            self.frame_cursor = 0;
        } else {
            log::debug!("unknown animation '{}' on '{}'", animation_name, self.name);
        }
    }

    pub fn current_animation_name(&self) -> &str {
        self.current.as_deref().unwrap_or("")
    }

    pub fn current_texture_index(&self) -> u32 {
        self.current_animation()
            .and_then(|animation| animation.frames.get(self.frame_cursor))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_horizontal_mirror(&self) -> bool {
        self.current_animation()
            .map(|animation| animation.horizontal_mirror)
            .unwrap_or(false)
    }

    fn current_animation(&self) -> Option<&Animation> {
        self.current
            .as_ref()
            .and_then(|name| self.animations.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> AnimationPlayer {
        let mut animations = HashMap::new();
        animations.insert("walk".to_string(), Animation::new(vec![4, 5, 6]));
        animations.insert("idle".to_string(), Animation::new(vec![0]).mirrored());
        AnimationPlayer::new("player", animations)
    }

    #[test]
    fn test_advance_wraps() {
        let mut player = player();
        player.start_animation("walk");
        assert_eq!(player.current_texture_index(), 4);

        player.advance_animation();
        assert_eq!(player.current_texture_index(), 5);
        player.advance_animation();
        assert_eq!(player.current_texture_index(), 6);
        player.advance_animation();
        assert_eq!(player.current_texture_index(), 4);
    }

    #[test]
    fn test_start_resets_cursor() {
        let mut player = player();
        player.start_animation("walk");
        player.advance_animation();
        player.start_animation("walk");
        assert_eq!(player.current_texture_index(), 4);
    }

    #[test]
    fn test_unknown_animation_ignored() {
        let mut player = player();
        player.start_animation("walk");
        player.start_animation("no-such-animation");
        assert_eq!(player.current_animation_name(), "walk");
    }

    #[test]
    fn test_mirror_flag() {
        let mut player = player();
        assert!(!player.is_horizontal_mirror());
        player.start_animation("idle");
        assert!(player.is_horizontal_mirror());
    }

    #[test]
    fn test_empty_player_is_inert() {
        let mut player = AnimationPlayer::default();
        player.advance_animation();
        assert_eq!(player.current_texture_index(), 0);
        assert_eq!(player.current_animation_name(), "");
    }
}
