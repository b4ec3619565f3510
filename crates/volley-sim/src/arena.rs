//! The arena context: every subsystem's state in one struct.
//!
//! Event handlers, frame callbacks and scheduled tasks all receive
//! `&mut Arena`. Each field is owned by one subsystem; other subsystems go
//! through that subsystem's functions or through events.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use volley_core::config::GameConfig;
use volley_core::enums::FlowPhase;
use volley_core::events::{EventKind, GameEvent};
use volley_core::types::{ActorId, EffectId, SimTime};

use crate::event_bus::{BusEvent, EventBus, EventHost};
use crate::fsm::{Machine, MachineHost, Transition};
use crate::scheduler::{Scheduler, SchedulerHost};
use crate::systems::encounter::EncounterState;
use crate::systems::enemies::EnemyRegistry;
use crate::systems::flow::{FlowController, FlowParams};
use crate::systems::hero::Hero;
use crate::systems::hero_attack::HeroAttack;
use crate::systems::loot::LootState;
use crate::systems::status_effects::StatusEffects;
use crate::systems::{encounter, flow, loot, projectiles, status_effects};

impl BusEvent for GameEvent {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        GameEvent::kind(self)
    }
}

/// Work deferred through the scheduler's timer queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Task {
    /// Next damage tick of a status effect.
    BurnTick(EffectId),
    /// Spawn markers are done; spawn the wave's enemies.
    WaveTelegraphEnd,
    /// Enemies are placed; lift the gameplay pause.
    WaveResume,
    BoostHint,
    BoostAutoPick,
    ShowFailUi,
    /// Remove a projectile after its cosmetic linger.
    DespawnProjectile(Entity),
    /// Start pulling loot towards the hero.
    LootAttract,
}

pub type FlowMachine = Machine<FlowPhase, FlowParams, Arena>;

/// Complete simulation state for one run.
pub struct Arena {
    pub world: World,
    pub bus: EventBus<Arena, GameEvent>,
    pub scheduler: Scheduler<Arena, Task>,
    pub config: GameConfig,
    pub rng: ChaCha8Rng,
    pub time: SimTime,
    pub hero: Hero,
    pub enemies: EnemyRegistry,
    pub effects: StatusEffects,
    pub encounter: EncounterState,
    pub flow: FlowController,
    pub flow_machine: Option<FlowMachine>,
    pub attack: HeroAttack,
    pub loot: LootState,
    /// Events emitted since the last snapshot, in emission order.
    pub outbox: Vec<GameEvent>,
}

impl Arena {
    /// Build an empty arena. Nothing is subscribed or registered yet.
    pub fn new(seed: u64, config: GameConfig) -> Self {
        let hero = Hero::new(&config);
        let attack = HeroAttack::new(&config.default_preset);
        let enemies = EnemyRegistry::new(&config);
        Self {
            world: World::new(),
            bus: EventBus::new(),
            scheduler: Scheduler::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            time: SimTime::default(),
            hero,
            enemies,
            effects: StatusEffects::default(),
            encounter: EncounterState::default(),
            flow: FlowController::default(),
            flow_machine: None,
            attack,
            loot: LootState::default(),
            outbox: Vec::new(),
            config,
        }
    }

    /// Take every event recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }
}

/// Stable id carried by events for an ECS entity.
pub fn actor_id(entity: Entity) -> ActorId {
    ActorId(entity.to_bits().get())
}

/// Resolve an event id back to its entity handle.
pub fn entity_of(id: ActorId) -> Option<Entity> {
    Entity::from_bits(id.0)
}

impl EventHost for Arena {
    type Event = GameEvent;

    fn bus(&mut self) -> &mut EventBus<Arena, GameEvent> {
        &mut self.bus
    }

    fn record(&mut self, event: &GameEvent) {
        self.outbox.push(event.clone());
    }
}

impl SchedulerHost for Arena {
    type Task = Task;

    fn scheduler(&mut self) -> &mut Scheduler<Arena, Task> {
        &mut self.scheduler
    }

    fn current_tick(&self) -> u64 {
        self.time.tick
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::BurnTick(id) => status_effects::on_burn_tick(self, id),
            Task::WaveTelegraphEnd => encounter::on_telegraph_end(self),
            Task::WaveResume => encounter::on_resume(self),
            Task::BoostHint => flow::on_boost_hint(self),
            Task::BoostAutoPick => flow::on_boost_auto_pick(self),
            Task::ShowFailUi => flow::on_show_fail_ui(self),
            Task::DespawnProjectile(entity) => projectiles::despawn(self, entity),
            Task::LootAttract => loot::begin_attract(self),
        }
    }
}

impl MachineHost<FlowPhase, FlowParams> for Arena {
    fn machine_slot(&mut self) -> &mut Option<FlowMachine> {
        &mut self.flow_machine
    }

    fn pending_transitions(&mut self) -> &mut VecDeque<Transition<FlowPhase, FlowParams>> {
        &mut self.flow.pending
    }
}
