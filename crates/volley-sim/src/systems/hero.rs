//! The hero: locomotion FSM, movement input and the health slot.
//!
//! Locomotion runs on the generic FSM with polled predicates over the hero
//! body: `Idle` → `Run` once speed is positive, back when it drops to zero.

use glam::DVec3;

use volley_core::config::GameConfig;
use volley_core::constants::{HERO_SPAWN_X, HERO_SPAWN_Z};
use volley_core::enums::HeroMotion;
use volley_core::types::{yaw_forward, ArenaBounds};

use crate::arena::Arena;
use crate::fsm::{Machine, Predicate, State, Transition};
use crate::systems::health::HeroHealth;

/// Kinematic state the locomotion machine runs over.
#[derive(Debug, Clone)]
pub struct HeroBody {
    pub position: DVec3,
    pub yaw: f64,
    /// Current joystick speed (units/s), already clamped to the hero's max.
    pub speed: f64,
    pub bounds: ArenaBounds,
    /// Step length of the tick being processed.
    pub frame_dt: f64,
}

pub type LocomotionMachine = Machine<HeroMotion, (), HeroBody>;

/// Singleton hero slot.
pub struct Hero {
    pub body: HeroBody,
    pub locomotion: LocomotionMachine,
    pub health: HeroHealth,
    pub max_speed: f64,
    /// Cleared on failure; movement input is dropped afterwards.
    pub input_enabled: bool,
}

struct Idle;

impl State<(), HeroBody> for Idle {}

struct Run;

impl State<(), HeroBody> for Run {
    fn update(&mut self, body: &mut HeroBody) {
        let step = yaw_forward(body.yaw) * body.speed * body.frame_dt;
        body.position = body.bounds.clamp(body.position + step);
    }
}

struct StartRun;

impl Predicate<HeroMotion, (), HeroBody> for StartRun {
    fn check(&mut self, body: &HeroBody) -> Option<Transition<HeroMotion, ()>> {
        (body.speed > 0.0).then_some(Transition {
            to: HeroMotion::Run,
            params: (),
        })
    }
}

struct StopRun;

impl Predicate<HeroMotion, (), HeroBody> for StopRun {
    fn check(&mut self, body: &HeroBody) -> Option<Transition<HeroMotion, ()>> {
        (body.speed <= 0.0).then_some(Transition {
            to: HeroMotion::Idle,
            params: (),
        })
    }
}

impl Hero {
    pub fn new(config: &GameConfig) -> Self {
        let mut body = HeroBody {
            position: DVec3::new(HERO_SPAWN_X, 0.0, HERO_SPAWN_Z),
            yaw: std::f64::consts::PI,
            speed: 0.0,
            bounds: config.arena,
            frame_dt: 0.0,
        };

        let mut locomotion = LocomotionMachine::new();
        locomotion
            .add_state(HeroMotion::Idle, Idle)
            .add_state(HeroMotion::Run, Run)
            .add_predicate(HeroMotion::Idle, StartRun)
            .add_predicate(HeroMotion::Run, StopRun);
        locomotion.set(HeroMotion::Idle, (), &mut body);

        Self {
            body,
            locomotion,
            health: HeroHealth::new(&config.hero),
            // Unvalidated configs may carry a negative or NaN speed.
            max_speed: config.hero.move_speed.max(0.0),
            input_enabled: true,
        }
    }

    pub fn position(&self) -> DVec3 {
        self.body.position
    }

    pub fn motion(&self) -> HeroMotion {
        self.locomotion.current().unwrap_or_default()
    }

    pub fn is_moving(&self) -> bool {
        self.body.speed > 0.0
    }

    /// Apply joystick output. Ignored once input is disabled or the hero died.
    pub fn set_movement(&mut self, speed: f64, facing: f64) {
        if !self.input_enabled || self.health.is_dead {
            return;
        }
        self.body.speed = speed.max(0.0).min(self.max_speed);
        if self.body.speed > 0.0 {
            self.body.yaw = facing;
        }
    }

    pub fn stop(&mut self) {
        self.body.speed = 0.0;
    }
}

pub fn install(arena: &mut Arena) {
    arena.scheduler.frames.register("hero_locomotion", update);
}

/// Frame callback: run the locomotion machine. Not gated by pause.
pub fn update(arena: &mut Arena, dt: f64) {
    let hero = &mut arena.hero;
    hero.body.frame_dt = dt;
    hero.locomotion.update(&mut hero.body);
}
