//! Fixed timestep simulation tick
//!
//! `Simulation` owns the live entities and the match state. An external
//! scheduler calls `on_tick` at the configured cadence; taps are queued from
//! any thread and applied at the start of the next tick.

use crossbeam_channel::{Receiver, Sender};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::entity::{Category, Entity};
use super::spawner::WaveSpawner;
use super::state::{EndReason, Field, GameEvent, MatchPhase, MatchState};
use crate::config::MatchConfig;
use crate::error::Result;

/// Thread-safe handle for queueing taps from an input source
#[derive(Debug, Clone)]
pub struct TapSender {
    tx: Sender<Vec2>,
}

impl TapSender {
    /// Queue a tap in field coordinates
    ///
    /// Returns false once the simulation has been dropped.
    pub fn tap(&self, pos: Vec2) -> bool {
        self.tx.send(pos).is_ok()
    }
}

/// Receives the end-of-match notification (game-over screen, restart prompt)
pub trait MatchObserver {
    fn on_match_end(&mut self, final_score: u64, reason: EndReason);
}

/// What a renderer needs after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub entities: Vec<Entity>,
    pub score: u64,
    pub lives: u32,
    pub elapsed_ms: u64,
    pub time_remaining_ms: u64,
    pub wave: u32,
    pub phase: MatchPhase,
    /// Events emitted since the previous snapshot
    pub events: Vec<GameEvent>,
}

impl Snapshot {
    /// Countdown text for the HUD, "MM:SS"
    pub fn clock_text(&self) -> String {
        let secs = self.time_remaining_ms / 1000;
        format!("{:02}:{:02}", (secs / 60) % 60, secs % 60)
    }
}

/// The fixed-tick simulation loop for one match at a time
pub struct Simulation {
    config: MatchConfig,
    field: Option<Field>,
    state: MatchState,
    /// Live entities, ascending id order
    entities: Vec<Entity>,
    spawner: WaveSpawner,
    taps_tx: Sender<Vec2>,
    taps_rx: Receiver<Vec2>,
    /// Events awaiting the next snapshot
    events: Vec<GameEvent>,
    observers: Vec<Box<dyn MatchObserver>>,
    next_id: u32,
}

impl Simulation {
    /// Create an idle simulation; nothing ticks until `start_match`
    pub fn new(seed: u64) -> Self {
        let config = MatchConfig::default();
        let (taps_tx, taps_rx) = crossbeam_channel::unbounded();
        Self {
            state: MatchState::waiting(&config),
            config,
            field: None,
            entities: Vec::new(),
            spawner: WaveSpawner::new(seed),
            taps_tx,
            taps_rx,
            events: Vec::new(),
            observers: Vec::new(),
            next_id: 1,
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn MatchObserver>) {
        self.observers.push(observer);
    }

    pub fn tap_sender(&self) -> TapSender {
        TapSender {
            tx: self.taps_tx.clone(),
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn field(&self) -> Option<Field> {
        self.field
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.spawner.seed()
    }

    /// Set the field size (surface created or resized)
    ///
    /// Invalid sizes are rejected and the previous field is kept.
    pub fn on_field_resize(&mut self, width: f32, height: f32) -> Result<()> {
        let field = Field::new(width, height);
        if let Err(e) = field.validate(self.config.entity_size) {
            log::warn!("Ignoring field resize: {e}");
            return Err(e);
        }
        log::info!("Field set to {width}x{height}");
        self.field = Some(field);
        Ok(())
    }

    /// Reset everything and begin a new match
    ///
    /// Validation happens before any state is touched.
    pub fn start_match(&mut self, width: f32, height: f32, config: MatchConfig) -> Result<()> {
        config.validate()?;
        let field = Field::new(width, height);
        field.validate(config.entity_size)?;

        let stale = self.taps_rx.try_iter().count();
        if stale > 0 {
            log::debug!("Discarded {stale} taps queued before match start");
        }

        self.state = MatchState::new(&config);
        self.config = config;
        self.field = Some(field);
        self.entities.clear();
        self.events.clear();
        self.next_id = 1;

        log::info!(
            "Match started: {}x{} field, {} ms, {} lives, seed {}",
            width,
            height,
            self.config.duration_ms,
            self.state.lives,
            self.spawner.seed()
        );
        Ok(())
    }

    /// Queue a tap; it is resolved at the start of the next tick
    ///
    /// Taps outside an active match are dropped.
    pub fn on_input(&mut self, pos: Vec2) {
        if !self.state.is_active() {
            return;
        }
        // We hold the receiver, so the send cannot fail
        let _ = self.taps_tx.send(pos);
    }

    /// Place an entity directly, using the configured size and category rule
    ///
    /// Returns the new entity's id.
    pub fn insert_entity(&mut self, category: Category, pos: Vec2, vel: Vec2) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let points = self.config.rules.get(category).points;
        self.entities
            .push(Entity::new(id, category, pos, self.config.entity_size, vel, points));
        id
    }

    /// Advance one fixed step and return the state for rendering
    ///
    /// Does nothing but report (and drop queued taps) outside an active match.
    pub fn on_tick(&mut self) -> Snapshot {
        if self.state.is_active() {
            self.step();
        } else {
            // Taps from other threads can still arrive while idle
            let dropped = self.taps_rx.try_iter().count();
            if dropped > 0 {
                log::debug!("Dropped {dropped} taps outside an active match");
            }
        }
        self.snapshot()
    }

    fn step(&mut self) {
        let Some(field) = self.field else {
            return;
        };

        self.drain_taps(&field);

        if WaveSpawner::should_spawn(&self.entities) {
            self.spawn_wave(&field);
        }

        for entity in &mut self.entities {
            entity.update();
        }

        let contacts = resolve_collisions(&mut self.entities, &field);
        if !contacts.is_empty() {
            log::trace!("tick {}: {} contacts", self.state.time_ticks, contacts.len());
        }

        self.remove_exits(&field);

        self.state.advance_clock(self.config.tick_ms);
        if let Some(reason) = self.state.check_termination() {
            self.finish(reason);
        }
    }

    fn drain_taps(&mut self, field: &Field) {
        while let Ok(pos) = self.taps_rx.try_recv() {
            self.apply_tap(pos, field);
        }
    }

    /// Remove and score every entity under the tap, not just the topmost
    fn apply_tap(&mut self, pos: Vec2, field: &Field) {
        if !pos.is_finite() {
            log::warn!("Ignoring malformed tap at {pos:?}");
            return;
        }
        if !field.contains(pos) {
            return;
        }

        let (hit, kept): (Vec<Entity>, Vec<Entity>) = std::mem::take(&mut self.entities)
            .into_iter()
            .partition(|e| e.contains_point(pos));
        self.entities = kept;

        for entity in hit {
            let rule = self.config.rules.get(entity.category);
            let (points, lives_lost) = if entity.is_penalty() {
                (0, rule.tap_life_cost)
            } else {
                (entity.points, 0)
            };
            self.state.add_points(points);
            self.state.lose_lives(lives_lost);
            log::debug!(
                "Tapped {:?} #{} at ({:.0}, {:.0}): +{} pts, -{} lives",
                entity.category,
                entity.id,
                pos.x,
                pos.y,
                points,
                lives_lost
            );
            self.events.push(GameEvent::Tapped {
                id: entity.id,
                category: entity.category,
                points,
                lives_lost,
            });
        }
    }

    fn spawn_wave(&mut self, field: &Field) {
        let count = self.config.wave_size_for(self.state.wave);
        let speed = self.state.wave_speed;
        let wave = self
            .spawner
            .spawn_wave(count, speed, field, &self.config, &mut self.next_id);
        self.entities.extend(wave);
        self.state.advance_wave(self.config.speed_increment);

        log::info!(
            "Wave {}: {} objects at speed {:.1}",
            self.state.wave,
            count,
            speed
        );
        self.events.push(GameEvent::WaveSpawned {
            wave: self.state.wave,
            count,
            speed,
        });
    }

    /// Drop everything that fell past the bottom edge
    fn remove_exits(&mut self, field: &Field) {
        let exited: Vec<(u32, Category)> = self
            .entities
            .iter()
            .filter(|e| e.pos.y > field.height)
            .map(|e| (e.id, e.category))
            .collect();
        if exited.is_empty() {
            return;
        }
        self.entities.retain(|e| e.pos.y <= field.height);

        for (id, category) in exited {
            let lives_lost = self.config.rules.get(category).miss_life_cost;
            self.state.lose_lives(lives_lost);
            if lives_lost > 0 {
                log::debug!("Missed {category:?} #{id}: -{lives_lost} lives");
            }
            self.events.push(GameEvent::Missed {
                id,
                category,
                lives_lost,
            });
        }
    }

    fn finish(&mut self, reason: EndReason) {
        let final_score = self.state.score;
        log::info!(
            "Match over ({reason:?}) after {} ticks: score {final_score}, wave {}",
            self.state.time_ticks,
            self.state.wave
        );
        self.events.push(GameEvent::MatchEnded {
            final_score,
            reason,
        });
        for observer in &mut self.observers {
            observer.on_match_end(final_score, reason);
        }
    }

    fn snapshot(&mut self) -> Snapshot {
        Snapshot {
            entities: self.entities.clone(),
            score: self.state.score,
            lives: self.state.lives,
            elapsed_ms: self.state.elapsed_ms,
            time_remaining_ms: self.state.time_remaining_ms(),
            wave: self.state.wave,
            phase: self.state.phase,
            events: std::mem::take(&mut self.events),
        }
    }
}
