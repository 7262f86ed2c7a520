//! Bonus Effects
//!
//! One-shot effects a power-up applies to another body on contact. The
//! effect is a capability attached to a `PhysicsEntity`, selected by
//! variant; the back-reference to the affected body is weak, so a bonus
//! never keeps its target alive.
//!
//! Contact flow, driven by the external world loop: overlap detection
//! calls `apply_entity` (records the target, emits the visual/audio cue),
//! then `apply_effect` fires the state change exactly once.

use std::rc::{Rc, Weak};
use std::cell::RefCell;

use crate::animation::AnimationPlayer;
use crate::audio::AudioPlayer;
use crate::config::WorldConfig;
use crate::math::Vec2;
use crate::observer::SimEvent;
use crate::physics::PhysicsEntity;

/// Cue code broadcast when a spring is touched.
pub const SPRING_CUE_CODE: u32 = 100;

/// Effect capability variants a bonus entity can carry.
pub enum Effect {
    /// Launches the affected body upward on a jump arc scaled by the
    /// multiplier.
    Spring {
        active: bool,
        affected: Weak<RefCell<PhysicsEntity>>,
        velocity_multiplier: f32,
    },
}

impl PhysicsEntity {
    /// Build a spring power-up: a passthrough body carrying a one-shot
    /// launch effect tuned from the world config.
    pub fn spring_bonus(
        position: Vec2,
        view_size: Vec2,
        animation: AnimationPlayer,
        audio: AudioPlayer,
        is_static: bool,
        config: WorldConfig,
    ) -> Self {
        let velocity_multiplier = config.spring_velocity_multiplier;
        let mut bonus = PhysicsEntity::new(position, view_size, animation, audio, is_static, config);
        bonus.set_passthrough(true);
        bonus.effect = Some(Effect::Spring {
            active: true,
            affected: Weak::new(),
            velocity_multiplier,
        });
        bonus
    }

    /// Record the body this bonus will affect and emit the contact cue.
    /// No-op on entities without an effect capability.
    pub fn apply_entity(&mut self, target: &Rc<RefCell<PhysicsEntity>>) {
        let Some(Effect::Spring { affected, .. }) = &mut self.effect else {
            return;
        };
        *affected = Rc::downgrade(target);

        self.entity_mut().notify(SimEvent::BonusCue(SPRING_CUE_CODE));
    }

    /// Fire the recorded effect once. A dead target skips the mutation
    /// silently; either way the effect is spent afterwards.
    pub fn apply_effect(&mut self) {
        let jump_height = self.config().jump_height;
        let jump_dt = self.config().jump_dt;

        let Some(Effect::Spring { active, affected, velocity_multiplier }) = &mut self.effect
        else {
            return;
        };

        if *active {
            if let Some(target) = affected.upgrade() {
                let launch = 2.0 * (jump_height * *velocity_multiplier) / jump_dt;
                target.borrow_mut().set_velocity(Vec2::new(0.0, launch));
            }
        }
        *active = false;
    }

    /// Whether the attached effect can still fire.
    pub fn is_effect_active(&self) -> bool {
        match &self.effect {
            Some(Effect::Spring { active, .. }) => *active,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Simulate;
    use crate::observer::Observer;

    struct Recorder {
        events: Vec<SimEvent>,
    }

    impl Recorder {
        fn new() -> Rc<RefCell<Self>> {
            Rc::new(RefCell::new(Self { events: Vec::new() }))
        }
    }

    impl Observer for Recorder {
        fn on_event(&mut self, event: &SimEvent) {
            self.events.push(*event);
        }
    }

    fn spring() -> PhysicsEntity {
        PhysicsEntity::spring_bonus(
            Vec2::new(0.0, -0.5),
            Vec2::new(0.2, 0.1),
            AnimationPlayer::default(),
            AudioPlayer::default(),
            true,
            WorldConfig::default(),
        )
    }

    fn target() -> Rc<RefCell<PhysicsEntity>> {
        let mut body = PhysicsEntity::new(
            Vec2::ZERO,
            Vec2::ONE,
            AnimationPlayer::default(),
            AudioPlayer::default(),
            false,
            WorldConfig::default(),
        );
        body.set_velocity_bounds(Vec2::new(-10.0, -10.0), Vec2::new(10.0, 10.0));
        Rc::new(RefCell::new(body))
    }

    #[test]
    fn test_spring_is_passthrough() {
        let spring = spring();
        assert!(spring.is_passthrough());
        assert!(spring.is_effect_active());
    }

    #[test]
    fn test_contact_emits_cue() {
        let mut spring = spring();
        let recorder = Recorder::new();
        spring.entity_mut().subscribe(&recorder);

        spring.apply_entity(&target());
        assert_eq!(
            recorder.borrow().events,
            vec![SimEvent::BonusCue(SPRING_CUE_CODE)]
        );
    }

    #[test]
    fn test_effect_fires_once() {
        let mut spring = spring();
        let target = target();

        spring.apply_entity(&target);
        spring.apply_effect();

        // v = 2 * (jump_height * multiplier) / jump_dt
        //   = 2 * (0.3 * 1.5) / 0.2 = 4.5
        let launch = target.borrow().velocity();
        assert!((launch.y - 4.5).abs() < 1e-5);
        assert_eq!(launch.x, 0.0);
        assert!(!spring.is_effect_active());

        // Spent springs do nothing
        target.borrow_mut().set_velocity(Vec2::new(0.0, -1.0));
        spring.apply_effect();
        assert!((target.borrow().velocity().y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_dead_target_skipped() {
        let mut spring = spring();
        {
            let target = target();
            spring.apply_entity(&target);
        }

        // The affected body is gone; the effect is skipped but spent
        spring.apply_effect();
        assert!(!spring.is_effect_active());
    }

    #[test]
    fn test_plain_body_has_no_effect() {
        let mut body = PhysicsEntity::new(
            Vec2::ZERO,
            Vec2::ONE,
            AnimationPlayer::default(),
            AudioPlayer::default(),
            false,
            WorldConfig::default(),
        );
        assert!(!body.is_effect_active());
        body.apply_effect();
        body.apply_entity(&target());
        assert!(!body.is_effect_active());
    }

    #[test]
    fn test_spring_still_updates_as_static_body() {
        // The bonus is a regular (static) body for the rest of the sim
        let mut spring = spring();
        let position = spring.position();
        spring.update(0.0, 1.0 / 60.0);
        assert_eq!(spring.position(), position);
    }
}
