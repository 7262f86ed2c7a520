//! Base Entity
//!
//! The base simulatable object: a spatial transform (position, scale,
//! rotation, view size), an optional owned hitbox, owned debug rays,
//! animation and audio delegates, and the observer channel presentation
//! code subscribes to.
//!
//! Entities never reference the view layer. Every observable change goes
//! out as a `SimEvent`; screen-space queries take the `Camera` projection
//! as a context argument and return derived values.

use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::AnimationPlayer;
use crate::audio::AudioPlayer;
use crate::camera::Camera;
use crate::hitbox::Hitbox;
use crate::math::Vec2;
use crate::observer::{Observer, ObserverChannel, SimEvent, SubscriberId};
use crate::ray::Ray;

/// Explicit liveness state instead of a zeroed-geometry tombstone.
///
/// `disappear` turns a physics entity `Inert`: the object stays valid so
/// outstanding references do not dangle, but callers exclude it from
/// collision and render passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifeState {
    #[default]
    Alive,
    Inert,
}

/// Polymorphic per-tick update point shared by all simulatable objects.
pub trait Simulate {
    /// Advance one tick. `t` is absolute simulation time, `dt` the tick
    /// duration in seconds.
    fn update(&mut self, t: f64, dt: f32);
}

/// Base simulatable object.
pub struct Entity {
    position: Vec2,
    scale: Vec2,
    rotation: f32,
    view_size: Vec2,
    hitbox: Option<Hitbox>,
    rays: Vec<Ray>,
    animation: AnimationPlayer,
    audio: AudioPlayer,
    channel: ObserverChannel,
    life: LifeState,
}

impl Entity {
    pub fn new(position: Vec2, view_size: Vec2, animation: AnimationPlayer, audio: AudioPlayer) -> Self {
        Self {
            position,
            scale: Vec2::ONE,
            rotation: 0.0,
            view_size,
            hitbox: None,
            rays: Vec::new(),
            animation,
            audio,
            channel: ObserverChannel::new(),
            life: LifeState::Alive,
        }
    }

    // --- observer channel ---

    pub fn subscribe<O: Observer + 'static>(&mut self, observer: &Rc<RefCell<O>>) -> SubscriberId {
        self.channel.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.channel.unsubscribe(id);
    }

    /// Broadcast an event to all live subscribers.
    pub fn notify(&mut self, event: SimEvent) {
        self.channel.broadcast(&event);
    }

    /// Generic refresh signal: view-layer observers re-pull position,
    /// scale, rotation and frame.
    pub fn update_view(&mut self) {
        self.notify(SimEvent::Refresh);
    }

    // --- transform ---

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn screen_position(&self, camera: &dyn Camera) -> Vec2 {
        camera.project_coord(self.position)
    }

    /// Move to an absolute position. The owned hitbox and rays translate
    /// by the same delta.
    pub fn set_position(&mut self, position: Vec2) {
        let delta = position - self.position;

        if let Some(hitbox) = &mut self.hitbox {
            hitbox.translate(delta);
        }
        for ray in &mut self.rays {
            ray.translate(delta);
        }

        self.position = position;
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.set_position(self.position + delta);
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Set an absolute scale. Hitbox extents and ray endpoints follow the
    /// relative multiplier (pivoting rays around the entity position);
    /// skipped when the current scale has a zero component.
    pub fn set_scale(&mut self, scale: Vec2) {
        if self.scale.x != 0.0 && self.scale.y != 0.0 {
            let factor = Vec2::new(scale.x / self.scale.x, scale.y / self.scale.y);

            if let Some(hitbox) = &mut self.hitbox {
                hitbox.rescale(factor);
            }
            for ray in &mut self.rays {
                ray.rescale(factor, self.position);
            }
        }
        self.scale = scale;
    }

    pub fn rescale(&mut self, factor: Vec2) {
        self.set_scale(self.scale * factor);
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn rotate(&mut self, rotation: f32) {
        self.set_rotation(self.rotation + rotation);
    }

    pub fn view_size(&self) -> Vec2 {
        self.view_size
    }

    pub fn screen_view_size(&self, camera: &dyn Camera) -> Vec2 {
        camera.project_size(self.view_size)
    }

    pub fn set_view_size(&mut self, view_size: Vec2) {
        self.view_size = view_size;
    }

    // --- hitbox and rays ---

    pub fn hitbox(&self) -> Option<&Hitbox> {
        self.hitbox.as_ref()
    }

    pub fn set_hitbox(&mut self, hitbox: Hitbox) {
        self.hitbox = Some(hitbox);
    }

    pub fn screen_hitbox(&self, camera: &dyn Camera) -> Option<Hitbox> {
        self.hitbox.as_ref().map(|hitbox| {
            Hitbox::new(
                camera.project_coord(hitbox.position()),
                camera.project_size(hitbox.size()),
            )
        })
    }

    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    pub fn set_rays(&mut self, rays: Vec<Ray>) {
        self.rays = rays;
    }

    pub fn screen_rays(&self, camera: &dyn Camera) -> Vec<Ray> {
        self.rays
            .iter()
            .map(|ray| Ray::new(camera.project_coord(ray.origin()), camera.project_coord(ray.end())))
            .collect()
    }

    // --- animation ---

    pub fn texture_group_name(&self) -> &str {
        self.animation.name()
    }

    pub fn current_texture_index(&self) -> u32 {
        self.animation.current_texture_index()
    }

    pub fn is_horizontal_mirror(&self) -> bool {
        self.animation.is_horizontal_mirror()
    }

    /// Switch to a named animation if it is not already playing.
    pub fn play_animation(&mut self, animation_name: &str) {
        if self.animation.current_animation_name() != animation_name {
            self.animation.start_animation(animation_name);
            if self.animation.current_animation_name() == animation_name {
                self.emit_animation_frame();
            }
        }
    }

    pub fn animation_player(&self) -> &AnimationPlayer {
        &self.animation
    }

    pub fn animation_player_mut(&mut self) -> &mut AnimationPlayer {
        &mut self.animation
    }

    fn emit_animation_frame(&mut self) {
        let event = SimEvent::FrameChanged {
            texture_index: self.animation.current_texture_index(),
            mirrored: self.animation.is_horizontal_mirror(),
        };
        self.notify(event);
    }

    // --- audio ---

    /// Trigger a named sound. Resolves to the backend's numeric id and
    /// emits finish/loop tags followed by the trigger. Unregistered names
    /// are a no-op.
    pub fn play_sound(&mut self, sound_name: &str, finish: bool, loop_audio: bool) {
        if let Some(id) = self.audio.sound_id(sound_name) {
            self.audio.set_current_sound(sound_name);
            self.notify(SimEvent::AudioFinish(finish));
            self.notify(SimEvent::AudioLoop(loop_audio));
            self.notify(SimEvent::SoundTriggered(id));
        }
    }

    /// Trigger a named music track. Same tag sequence as `play_sound`.
    pub fn play_music(&mut self, music_name: &str, finish: bool, loop_audio: bool) {
        if let Some(id) = self.audio.music_id(music_name) {
            self.audio.set_current_music(music_name);
            self.notify(SimEvent::AudioFinish(finish));
            self.notify(SimEvent::AudioLoop(loop_audio));
            self.notify(SimEvent::MusicTriggered(id));
        }
    }

    pub fn stop_sound(&mut self) {
        self.notify(SimEvent::SoundStopped);
    }

    pub fn stop_music(&mut self) {
        self.notify(SimEvent::MusicStopped);
    }

    /// Re-emit the last volume and re-trigger whichever of sound/music was
    /// last active. Used when an entity becomes visible again after a pause.
    pub fn replay_audio(&mut self) {
        self.set_audio_volume(self.audio.current_volume());

        if let Some(sound) = self.audio.current_sound().map(str::to_owned) {
            self.play_sound(&sound, false, false);
        }
        if let Some(music) = self.audio.current_music().map(str::to_owned) {
            self.play_music(&music, false, false);
        }
    }

    /// Store a volume clamped to 0-100 and notify the view layer.
    pub fn set_audio_volume(&mut self, volume: u32) {
        let volume = volume.min(100);
        self.audio.set_current_volume(volume);
        self.notify(SimEvent::VolumeChanged(volume));
    }

    pub fn audio_player(&self) -> &AudioPlayer {
        &self.audio
    }

    pub fn audio_player_mut(&mut self) -> &mut AudioPlayer {
        &mut self.audio
    }

    // --- lifecycle ---

    pub fn life_state(&self) -> LifeState {
        self.life
    }

    pub fn is_inert(&self) -> bool {
        self.life == LifeState::Inert
    }

    pub(crate) fn set_inert(&mut self) {
        self.life = LifeState::Inert;
    }

    fn attenuated_volume(&self) -> Option<u32> {
        if !self.audio.has_active_source() {
            return None;
        }

        let listener = self.audio.listener_position()?;
        let max_distance = self.audio.max_distance();
        if max_distance <= 0.0 {
            return Some(0);
        }

        let distance = (listener - self.position).length();
        if distance <= max_distance {
            Some(((1.0 - distance / max_distance) * 100.0).round() as u32)
        } else {
            Some(0)
        }
    }
}

impl Simulate for Entity {
    fn update(&mut self, _t: f64, _dt: f32) {
        let previous_index = self.animation.current_texture_index();
        let previous_mirror = self.animation.is_horizontal_mirror();
        self.animation.advance_animation();

        if self.animation.current_texture_index() != previous_index
            || self.animation.is_horizontal_mirror() != previous_mirror
        {
            self.emit_animation_frame();
        }

        if let Some(volume) = self.attenuated_volume() {
            self.set_audio_volume(volume);
        }

        self.update_view();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animation;
    use std::cell::Cell;
    use std::collections::HashMap;

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

    /// Camera that shifts by (10, 20) and doubles sizes.
    struct TestCamera;

    impl Camera for TestCamera {
        fn project_coord(&self, coord: Vec2) -> Vec2 {
            coord + Vec2::new(10.0, 20.0)
        }

        fn project_size(&self, size: Vec2) -> Vec2 {
            size * 2.0
        }
    }

    fn entity_at(x: f32, y: f32) -> Entity {
        Entity::new(
            Vec2::new(x, y),
            Vec2::new(1.0, 1.0),
            AnimationPlayer::default(),
            AudioPlayer::default(),
        )
    }

    fn assert_vec_eq(a: Vec2, b: Vec2) {
        assert!((a.x - b.x).abs() < 1e-5, "{:?} != {:?}", a, b);
        assert!((a.y - b.y).abs() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_move_round_trip() {
        let mut entity = entity_at(1.0, 1.0);
        entity.set_hitbox(Hitbox::new(Vec2::new(1.0, 1.0), Vec2::new(0.5, 0.5)));
        entity.set_rays(vec![Ray::new(Vec2::new(1.0, 1.0), Vec2::new(2.0, 1.0))]);

        let delta = Vec2::new(0.3, -0.4);
        entity.move_by(delta);
        entity.move_by(-delta);

        assert_vec_eq(entity.position(), Vec2::new(1.0, 1.0));
        assert_vec_eq(entity.hitbox().unwrap().position(), Vec2::new(1.0, 1.0));
        assert_vec_eq(entity.rays()[0].origin(), Vec2::new(1.0, 1.0));
        assert_vec_eq(entity.rays()[0].end(), Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_rescale_round_trip() {
        let mut entity = entity_at(0.0, 0.0);
        entity.set_hitbox(Hitbox::new(Vec2::ZERO, Vec2::new(1.0, 2.0)));
        entity.set_rays(vec![Ray::new(Vec2::ZERO, Vec2::new(1.0, 0.0))]);

        entity.rescale(Vec2::new(2.0, 4.0));
        assert_vec_eq(entity.hitbox().unwrap().size(), Vec2::new(2.0, 8.0));
        assert_vec_eq(entity.rays()[0].end(), Vec2::new(2.0, 0.0));

        entity.rescale(Vec2::new(0.5, 0.25));
        assert_vec_eq(entity.scale(), Vec2::ONE);
        assert_vec_eq(entity.hitbox().unwrap().size(), Vec2::new(1.0, 2.0));
        assert_vec_eq(entity.rays()[0].end(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_zero_scale_guard() {
        let mut entity = entity_at(0.0, 0.0);
        entity.set_hitbox(Hitbox::new(Vec2::ZERO, Vec2::new(1.0, 1.0)));

        entity.set_scale(Vec2::new(0.0, 1.0));
        assert_vec_eq(entity.hitbox().unwrap().size(), Vec2::new(0.0, 1.0));

        // Rescaling out of a zero component skips the hitbox (no division
        // by zero) but still stores the new scale
        entity.set_scale(Vec2::new(2.0, 2.0));
        assert_vec_eq(entity.hitbox().unwrap().size(), Vec2::new(0.0, 1.0));
        assert_vec_eq(entity.scale(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_screen_projection() {
        let mut entity = entity_at(1.0, 2.0);
        entity.set_hitbox(Hitbox::new(Vec2::new(1.0, 2.0), Vec2::new(1.0, 1.0)));
        entity.set_rays(vec![Ray::new(Vec2::ZERO, Vec2::new(1.0, 0.0))]);

        let camera = TestCamera;
        assert_vec_eq(entity.screen_position(&camera), Vec2::new(11.0, 22.0));
        assert_vec_eq(entity.screen_view_size(&camera), Vec2::new(2.0, 2.0));

        let screen_hitbox = entity.screen_hitbox(&camera).unwrap();
        assert_vec_eq(screen_hitbox.position(), Vec2::new(11.0, 22.0));
        assert_vec_eq(screen_hitbox.size(), Vec2::new(2.0, 2.0));

        let screen_rays = entity.screen_rays(&camera);
        assert_vec_eq(screen_rays[0].origin(), Vec2::new(10.0, 20.0));
        assert_vec_eq(screen_rays[0].end(), Vec2::new(11.0, 20.0));

        // Projection does not mutate stored state
        assert_vec_eq(entity.position(), Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_update_broadcasts_refresh() {
        let mut entity = entity_at(0.0, 0.0);
        let recorder = Recorder::new();
        entity.subscribe(&recorder);

        entity.update(0.0, 1.0 / 60.0);
        assert!(recorder.borrow().events.contains(&SimEvent::Refresh));
    }

    #[test]
    fn test_frame_change_event() {
        let mut animations = HashMap::new();
        animations.insert("spin".to_string(), Animation::new(vec![1, 2]));
        let mut entity = Entity::new(
            Vec2::ZERO,
            Vec2::ONE,
            AnimationPlayer::new("coin", animations),
            AudioPlayer::default(),
        );
        let recorder = Recorder::new();
        entity.subscribe(&recorder);

        entity.play_animation("spin");
        assert_eq!(
            recorder.borrow().events[0],
            SimEvent::FrameChanged { texture_index: 1, mirrored: false }
        );

        // Re-playing the current animation emits nothing
        let count = recorder.borrow().events.len();
        entity.play_animation("spin");
        assert_eq!(recorder.borrow().events.len(), count);

        // The tick advance flips to frame 2
        entity.update(0.0, 1.0 / 60.0);
        assert!(recorder
            .borrow()
            .events
            .contains(&SimEvent::FrameChanged { texture_index: 2, mirrored: false }));
    }

    #[test]
    fn test_volume_attenuation() {
        let listener = Rc::new(Cell::new(Vec2::new(5.0, 0.0)));

        let mut audio = AudioPlayer::new(HashMap::new(), HashMap::new(), 10.0);
        audio.set_listener_position(Some(listener.clone()));
        audio.set_current_sound("hum");

        let mut entity = Entity::new(Vec2::ZERO, Vec2::ONE, AnimationPlayer::default(), audio);

        // Distance 5 of max 10: half volume
        entity.update(0.0, 1.0 / 60.0);
        assert_eq!(entity.audio_player().current_volume(), 50);

        // Distance exactly at max: silent
        listener.set(Vec2::new(10.0, 0.0));
        entity.update(0.0, 1.0 / 60.0);
        assert_eq!(entity.audio_player().current_volume(), 0);

        // Beyond max: silent
        listener.set(Vec2::new(15.0, 0.0));
        entity.update(0.0, 1.0 / 60.0);
        assert_eq!(entity.audio_player().current_volume(), 0);
    }

    #[test]
    fn test_no_attenuation_without_source() {
        let listener = Rc::new(Cell::new(Vec2::ZERO));
        let mut audio = AudioPlayer::new(HashMap::new(), HashMap::new(), 10.0);
        audio.set_listener_position(Some(listener));

        let mut entity = Entity::new(Vec2::ZERO, Vec2::ONE, AnimationPlayer::default(), audio);
        entity.set_audio_volume(70);

        // No active sound or music: update leaves the volume alone
        entity.update(0.0, 1.0 / 60.0);
        assert_eq!(entity.audio_player().current_volume(), 70);
    }

    #[test]
    fn test_volume_clamp() {
        let mut entity = entity_at(0.0, 0.0);
        entity.set_audio_volume(250);
        assert_eq!(entity.audio_player().current_volume(), 100);
    }

    #[test]
    fn test_sound_trigger_event_order() {
        let mut sounds = HashMap::new();
        sounds.insert("jump".to_string(), 7);
        let audio = AudioPlayer::new(sounds, HashMap::new(), 1.0);

        let mut entity = Entity::new(Vec2::ZERO, Vec2::ONE, AnimationPlayer::default(), audio);
        let recorder = Recorder::new();
        entity.subscribe(&recorder);

        entity.play_sound("jump", true, false);
        assert_eq!(
            recorder.borrow().events,
            vec![
                SimEvent::AudioFinish(true),
                SimEvent::AudioLoop(false),
                SimEvent::SoundTriggered(7),
            ]
        );

        // Unregistered names emit nothing
        entity.play_sound("missing", false, false);
        assert_eq!(recorder.borrow().events.len(), 3);
    }

    #[test]
    fn test_replay_audio() {
        let mut sounds = HashMap::new();
        sounds.insert("engine".to_string(), 2);
        let audio = AudioPlayer::new(sounds, HashMap::new(), 1.0);

        let mut entity = Entity::new(Vec2::ZERO, Vec2::ONE, AnimationPlayer::default(), audio);
        entity.play_sound("engine", false, true);
        entity.set_audio_volume(60);

        let recorder = Recorder::new();
        entity.subscribe(&recorder);
        entity.replay_audio();

        let events = recorder.borrow();
        assert_eq!(events.events[0], SimEvent::VolumeChanged(60));
        assert!(events.events.contains(&SimEvent::SoundTriggered(2)));
    }
}
