//! Event system for the serial phase of a tick.
//!
//! Agents decide and move in parallel against a read-only map snapshot. The
//! interactions that touch more than one agent (walls, predation, grazing)
//! are collected into an [`EventQueue`] and applied afterwards, one at a time.

use std::collections::HashMap;

use super::agent::{Agent, AgentId, DeathCause, DeathReport, Species};
use super::ecosystem::SimulationState;
use super::params::Params;
use super::tile::{Tile, TileCoord, TileMap};

/// Events that modify simulation state.
///
/// Applied in queue order; an event naming an agent that is already dead is
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationEvent {
    /// An agent ended its move on a wall or off the map.
    HitWall {
        /// Species of the agent.
        species: Species,
        /// ID of the agent.
        agent_id: AgentId,
    },
    /// A predator shares a tile with a prey.
    Predation {
        /// ID of the predator.
        predator_id: AgentId,
        /// ID of the prey.
        prey_id: AgentId,
    },
    /// A prey stands on grass.
    Grazed {
        /// ID of the prey.
        prey_id: AgentId,
    },
}

/// Queue for collecting simulation events after the parallel update.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SimulationEvent>,
}

impl EventQueue {
    /// Creates an empty event queue.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Adds an event to the queue.
    pub fn push(&mut self, event: SimulationEvent) {
        self.events.push(event);
    }

    /// Queued events, in order.
    pub fn events(&self) -> &[SimulationEvent] {
        &self.events
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drains all events from the queue.
    pub fn drain(&mut self) -> std::vec::Drain<'_, SimulationEvent> {
        self.events.drain(..)
    }
}

/// Scans live agents for interactions: wall hits first, then predation, then
/// grazing.
///
/// Predators claim prey in ascending id order, lowest prey id first, and each
/// prey can be claimed once. An agent in a wall takes part in nothing else.
pub fn collect_events(map: &TileMap, predators: &[Agent], prey: &[Agent]) -> EventQueue {
    let mut queue = EventQueue::new();
    let in_wall = |tile: TileCoord| map.terrain_at(tile.0, tile.1) == Tile::Wall;

    let mut prey_by_tile: HashMap<TileCoord, Vec<AgentId>> = HashMap::new();
    for agent in prey.iter().chain(predators).filter(|a| a.is_alive()) {
        let tile = agent.tile(map);
        if in_wall(tile) {
            queue.push(SimulationEvent::HitWall {
                species: agent.species(),
                agent_id: agent.id,
            });
        } else if agent.species() == Species::Prey {
            prey_by_tile.entry(tile).or_default().push(agent.id);
        }
    }
    for ids in prey_by_tile.values_mut() {
        ids.sort_unstable();
        ids.reverse();
    }

    let mut hunters: Vec<&Agent> = predators.iter().filter(|a| a.is_alive()).collect();
    hunters.sort_by_key(|a| a.id);
    for predator in hunters {
        let tile = predator.tile(map);
        if in_wall(tile) {
            continue;
        }
        if let Some(prey_id) = prey_by_tile.get_mut(&tile).and_then(Vec::pop) {
            queue.push(SimulationEvent::Predation {
                predator_id: predator.id,
                prey_id,
            });
        }
    }

    let mut grazers: Vec<&Agent> = prey
        .iter()
        .filter(|a| {
            let (col, row) = a.tile(map);
            a.is_alive() && map.terrain_at(col, row) == Tile::Grass
        })
        .collect();
    grazers.sort_by_key(|a| a.id);
    for agent in grazers {
        queue.push(SimulationEvent::Grazed { prey_id: agent.id });
    }

    queue
}

/// Applies all queued events and returns the deaths they caused.
pub fn apply_events(
    state: &mut SimulationState,
    params: &Params,
    mut queue: EventQueue,
) -> Vec<DeathReport> {
    let generation = state.generation;
    let mut deaths = Vec::new();

    for event in queue.drain() {
        match event {
            SimulationEvent::HitWall { species, agent_id } => {
                if let Some(agent) = state.find_mut(species, agent_id) {
                    deaths.extend(agent.die(DeathCause::Wall, generation));
                }
            }
            SimulationEvent::Predation {
                predator_id,
                prey_id,
            } => {
                let predator_alive = state
                    .find_mut(Species::Predator, predator_id)
                    .is_some_and(|agent| agent.is_alive());
                if !predator_alive {
                    continue;
                }
                let Some(report) = state
                    .find_mut(Species::Prey, prey_id)
                    .and_then(|agent| agent.die(DeathCause::Predator, generation))
                else {
                    continue;
                };
                deaths.push(report);
                if let Some(predator) = state.find_mut(Species::Predator, predator_id) {
                    predator.feed(params.predator.food_energy);
                }
            }
            SimulationEvent::Grazed { prey_id } => {
                if let Some(agent) = state.find_mut(Species::Prey, prey_id) {
                    agent.feed(params.prey.food_energy);
                }
            }
        }
    }

    deaths
}
