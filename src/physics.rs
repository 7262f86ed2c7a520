//! Physics Entities
//!
//! Movable (or deliberately immovable) bodies: per-tick semi-implicit
//! integration, caller-driven force accumulation, and pairwise collision
//! resolution over axis-aligned hitboxes.
//!
//! The external world loop owns the tick ordering: apply forces
//! (gravity/friction/drag), then `update`, then resolve collisions for the
//! overlapping pairs it selected. `update` consumes and clears the
//! force/acceleration accumulators, so forces must be re-applied every
//! tick.

use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::AnimationPlayer;
use crate::audio::AudioPlayer;
use crate::bonus::Effect;
use crate::config::WorldConfig;
use crate::entity::{Entity, Simulate};
use crate::hitbox::Hitbox;
use crate::math::{lerp_vec, Vec2};

/// Velocity components below this are snapped to zero after integration,
/// stopping perpetual creep from floating point noise.
const VELOCITY_EPSILON: f32 = 1.0e-4;

/// A falling body registers on a one-way platform only while its vertical
/// penetration is below this depth.
const PASSTHROUGH_MAX_PENETRATION: f32 = 0.05;

/// A simulatable body: an `Entity` base plus the physics capability.
pub struct PhysicsEntity {
    entity: Entity,

    is_static: bool,
    collided: bool,

    mass: f32,
    force: Vec2,
    velocity: Vec2,
    acceleration: Vec2,

    gravitational_acceleration: Vec2,
    min_neg_velocity: Vec2,
    max_pos_velocity: Vec2,
    drag: Vec2,
    friction: Vec2,

    passthrough: bool,

    max_hit_points: u32,
    current_hit_points: u32,
    hp_bar: Option<Rc<RefCell<Entity>>>,
    can_shoot: bool,
    shoot_delay_time_passed: f32,

    config: WorldConfig,
    pub(crate) effect: Option<Effect>,
}

impl PhysicsEntity {
    /// Build a body with its hitbox covering the view rectangle, as the
    /// entity factory expects. Velocity clamp bounds start at zero; the
    /// factory configures them (`set_velocity_bounds` or
    /// `setup_player_physics`) before the body is expected to move.
    pub fn new(
        position: Vec2,
        view_size: Vec2,
        animation: AnimationPlayer,
        audio: AudioPlayer,
        is_static: bool,
        config: WorldConfig,
    ) -> Self {
        let mut entity = Entity::new(position, view_size, animation, audio);
        entity.set_hitbox(Hitbox::new(position, view_size));

        Self {
            entity,
            is_static,
            collided: false,
            mass: 1.0,
            force: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            gravitational_acceleration: Vec2::ZERO,
            min_neg_velocity: Vec2::ZERO,
            max_pos_velocity: Vec2::ZERO,
            drag: Vec2::ZERO,
            friction: Vec2::ZERO,
            passthrough: false,
            max_hit_points: 0,
            current_hit_points: 0,
            hp_bar: None,
            can_shoot: true,
            shoot_delay_time_passed: 0.0,
            config,
            effect: None,
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Derive gravity, velocity bounds, drag and friction from the player
    /// jump arc: apex height `jump_height` reached after `jump_dt` seconds.
    pub fn setup_player_physics(&mut self, jump_dt: f32, jump_height: f32) {
        let jump_velocity = 2.0 * jump_height / jump_dt;

        self.gravitational_acceleration = Vec2::new(0.0, -2.0 * jump_height / (jump_dt * jump_dt));
        self.min_neg_velocity = Vec2::new(-1.5, -(jump_velocity * 1.5));
        self.max_pos_velocity = Vec2::new(1.5, jump_velocity * 5.0);
        self.drag = Vec2::new(0.15, 0.0);
        self.friction = Vec2::new(5.0, 0.0);
    }

    // --- transform (keeps the attached HP bar in step) ---

    pub fn position(&self) -> Vec2 {
        self.entity.position()
    }

    pub fn set_position(&mut self, position: Vec2) {
        if let Some(hp_bar) = &self.hp_bar {
            hp_bar.borrow_mut().move_by(position - self.entity.position());
        }
        self.entity.set_position(position);
    }

    pub fn move_by(&mut self, delta: Vec2) {
        self.set_position(self.entity.position() + delta);
    }

    // --- body kind ---

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn set_is_static(&mut self, is_static: bool) {
        self.is_static = is_static;
    }

    pub fn is_passthrough(&self) -> bool {
        self.passthrough
    }

    pub fn set_passthrough(&mut self, passthrough: bool) {
        self.passthrough = passthrough;
    }

    // --- kinematic state ---

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
    }

    pub fn force(&self) -> Vec2 {
        self.force
    }

    pub fn set_force(&mut self, force: Vec2) {
        self.force = force;
    }

    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn add_velocity(&mut self, velocity: Vec2) {
        self.velocity += velocity;
    }

    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    pub fn set_acceleration(&mut self, acceleration: Vec2) {
        self.acceleration = acceleration;
    }

    pub fn gravitational_acceleration(&self) -> Vec2 {
        self.gravitational_acceleration
    }

    pub fn set_gravitational_acceleration(&mut self, acceleration: Vec2) {
        self.gravitational_acceleration = acceleration;
    }

    pub fn velocity_bounds(&self) -> (Vec2, Vec2) {
        (self.min_neg_velocity, self.max_pos_velocity)
    }

    pub fn set_velocity_bounds(&mut self, min_neg: Vec2, max_pos: Vec2) {
        self.min_neg_velocity = min_neg;
        self.max_pos_velocity = max_pos;
    }

    pub fn drag(&self) -> Vec2 {
        self.drag
    }

    pub fn set_drag(&mut self, drag: Vec2) {
        self.drag = drag;
    }

    pub fn friction(&self) -> Vec2 {
        self.friction
    }

    pub fn set_friction(&mut self, friction: Vec2) {
        self.friction = friction;
    }

    // --- force helpers, applied by the world loop before `update` ---

    pub fn apply_gravity(&mut self) {
        self.acceleration += self.gravitational_acceleration;
    }

    /// Velocity-proportional deceleration. Tripled below speed 0.1 so
    /// near-resting bodies stop instead of sliding (approximates static
    /// friction).
    pub fn apply_friction(&mut self) {
        let mut friction_force = self.velocity * self.friction;
        if self.velocity.length() < 0.1 {
            friction_force = friction_force * 3.0;
        }
        self.acceleration -= friction_force;
    }

    /// Quadratic air resistance: coefficient scaled by squared speed.
    pub fn apply_drag(&mut self) {
        let drag_force = self.drag * self.velocity.length_squared();
        self.acceleration -= drag_force;
    }

    /// Wrap across the configured world x-bounds (cyclic worlds): exiting
    /// one edge re-enters the opposite edge.
    pub fn apply_side_scrolling(&mut self) {
        let wrapped = self.config.wrap_x(self.entity.position());
        if wrapped != self.entity.position() {
            self.set_position(wrapped);
        }
    }

    // --- collision ---

    pub fn is_collided(&self) -> bool {
        self.collided
    }

    pub fn set_collided(&mut self) {
        self.collided = true;
    }

    /// The flag is sticky; the world loop clears it once it has reacted.
    pub fn clear_collided(&mut self) {
        self.collided = false;
    }

    /// Resolve a discrete overlap against `other`, mutating positions and
    /// velocities in place.
    ///
    /// `resolve = false` runs detection only (trigger volumes): `collided`
    /// flags are set but nothing moves. `set_collided = false` suppresses
    /// the flags. Pair ordering is caller-determined and not commutative.
    ///
    /// One-way platforms (`other.passthrough`) register only when this
    /// body is falling onto them with a small positive vertical
    /// penetration; they never resolve horizontally. Two static bodies
    /// never move.
    pub fn resolve_collision(&mut self, other: &mut PhysicsEntity, resolve: bool, set_collided: bool) {
        let displacement = match (self.entity.hitbox(), other.entity.hitbox()) {
            (Some(this_hitbox), Some(other_hitbox)) => {
                this_hitbox.displacement_to_collision(other_hitbox)
            }
            _ => return,
        };

        let mut new_velocity_this = self.velocity;
        let mut new_velocity_other = other.velocity;

        if other.passthrough {
            if self.velocity.y < 0.0
                && displacement.y > 0.0
                && displacement.y < PASSTHROUGH_MAX_PENETRATION
            {
                if resolve {
                    self.move_by(Vec2::new(0.0, displacement.y));
                    self.velocity.y = 0.0;
                    self.entity.update_view();
                }

                if set_collided {
                    self.collided = true;
                    other.collided = true;
                }
            }

            return;
        }

        if set_collided {
            self.collided = true;
            other.collided = true;
        }

        if !resolve {
            return;
        }

        // Separate along the axis of smaller penetration; both axes when
        // the depths tie exactly.
        let move_vector = if displacement.x.abs() == displacement.y.abs() {
            displacement
        } else if displacement.x.abs() < displacement.y.abs() {
            new_velocity_this.x = 0.0;
            new_velocity_other.x = 0.0;
            Vec2::new(displacement.x, 0.0)
        } else {
            new_velocity_this.y = 0.0;
            new_velocity_other.y = 0.0;
            Vec2::new(0.0, displacement.y)
        };

        if !self.is_static && other.is_static {
            self.move_by(move_vector);
            self.velocity = new_velocity_this;

            self.entity.update_view();
        } else if self.is_static && !other.is_static {
            other.move_by(-move_vector);
            other.velocity = new_velocity_other;

            other.entity.update_view();
        } else if !self.is_static && !other.is_static {
            // Mass-weighted split: the lighter body is displaced less.
            let alpha = if other.mass < self.mass {
                other.mass / self.mass
            } else {
                1.0 - self.mass / other.mass
            };

            self.move_by(lerp_vec(Vec2::ZERO, move_vector, alpha));
            other.move_by(lerp_vec(Vec2::ZERO, -move_vector, 1.0 - alpha));

            // Both bodies leave with the same velocity: the sum when the
            // vectors reinforce, otherwise whichever was faster. A
            // deliberate simplification, not momentum conservation.
            let new_velocity = if self.velocity.length() + other.velocity.length()
                < (self.velocity + other.velocity).length()
            {
                self.velocity + other.velocity
            } else if self.velocity.length() > other.velocity.length() {
                self.velocity
            } else {
                other.velocity
            };

            self.velocity = new_velocity;
            other.velocity = new_velocity;

            self.entity.update_view();
            other.entity.update_view();

            log::trace!(
                "dynamic pair separated by {:?} (alpha {})",
                move_vector,
                alpha
            );
        }
    }

    // --- hit points ---

    pub fn max_hit_points(&self) -> u32 {
        self.max_hit_points
    }

    pub fn set_max_hit_points(&mut self, max_hit_points: u32) {
        self.max_hit_points = max_hit_points;
    }

    pub fn current_hit_points(&self) -> u32 {
        self.current_hit_points
    }

    pub fn set_current_hit_points(&mut self, current_hit_points: u32) {
        self.current_hit_points = current_hit_points;
    }

    pub fn add_hit_points(&mut self, hit_points: u32) {
        self.current_hit_points = self
            .current_hit_points
            .saturating_add(hit_points)
            .min(self.max_hit_points);
    }

    pub fn subtract_hit_points(&mut self, hit_points: u32) {
        self.current_hit_points = self.current_hit_points.saturating_sub(hit_points);
    }

    pub fn set_hp_bar(&mut self, hp_bar: Option<Rc<RefCell<Entity>>>) {
        self.hp_bar = hp_bar;
    }

    pub fn hp_bar(&self) -> Option<&Rc<RefCell<Entity>>> {
        self.hp_bar.as_ref()
    }

    // --- shooting cooldown ---

    pub fn can_shoot(&self) -> bool {
        self.can_shoot
    }

    pub fn set_can_shoot(&mut self, can_shoot: bool) {
        self.can_shoot = can_shoot;
    }

    /// Soft-delete in place: the body stays a valid object (no dangling
    /// references elsewhere) but is `Inert` and collides with nothing.
    pub fn disappear(&mut self) {
        self.entity.set_hitbox(Hitbox::new(Vec2::ZERO, Vec2::ZERO));
        self.entity.set_view_size(Vec2::ZERO);
        self.entity.set_rays(Vec::new());
        self.collided = false;
        self.hp_bar = None;
        self.entity.set_inert();

        log::debug!("entity disappeared");
    }
}

impl Simulate for PhysicsEntity {
    fn update(&mut self, t: f64, dt: f32) {
        if self.is_static {
            self.entity.update(t, dt);
            return;
        }

        if let Some(hp_bar) = &self.hp_bar {
            hp_bar.borrow_mut().update(t, dt);
        }

        // Shoot cooldown
        if !self.can_shoot {
            self.shoot_delay_time_passed += dt;
        }
        if self.shoot_delay_time_passed > self.config.bullet_delay {
            self.shoot_delay_time_passed = 0.0;
            self.can_shoot = true;
        }

        // Velocity clamp
        self.velocity = Vec2::new(
            self.velocity
                .x
                .clamp(self.min_neg_velocity.x, self.max_pos_velocity.x),
            self.velocity
                .y
                .clamp(self.min_neg_velocity.y, self.max_pos_velocity.y),
        );

        self.acceleration += self.force / self.mass;

        // position(t + dt) = position + v*dt + a/2*dt^2
        let step = self.velocity * dt + self.acceleration * 0.5 * (dt * dt);
        self.move_by(step);
        self.velocity += self.acceleration * dt;

        // Snap sub-epsilon velocities to zero
        if self.velocity.x.abs() < VELOCITY_EPSILON {
            self.velocity.x = 0.0;
        }
        if self.velocity.y.abs() < VELOCITY_EPSILON {
            self.velocity.y = 0.0;
        }

        // Accumulators are rebuilt by the world loop each tick
        self.force = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;

        self.entity.update(t, dt);
    }
}
