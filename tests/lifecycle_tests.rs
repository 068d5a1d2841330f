#![allow(missing_docs)]

use std::collections::HashSet;
use std::f32::consts::TAU;

use ndarray::Array1;
use rand::SeedableRng;
use rand::rngs::StdRng;

use feorh::simulation::agent::{
    Agent, DeathCause, Perception, PredatorState, PreyState, Species, SpeciesBehavior, Status,
    TickContext,
};
use feorh::simulation::geometric_utils::normalize_heading;
use feorh::simulation::params::Params;
use feorh::simulation::tile::TileMap;

fn create_test_params() -> Params {
    Params {
        seed: Some(42),
        ..Params::default()
    }
}

fn open_map() -> TileMap {
    let row = "d".repeat(40);
    let text = vec![row; 40].join("\n");
    TileMap::from_ascii(&text, 30.0).unwrap()
}

fn spawn(species: Species, params: &Params) -> Agent {
    let mut rng = StdRng::seed_from_u64(9);
    Agent::founder(
        1,
        species,
        Array1::from_vec(vec![600.0, 600.0]),
        0.0,
        params,
        &mut rng,
    )
}

#[test]
fn test_energy_drains_each_tick() {
    let params = create_test_params();
    let map = open_map();
    let perception = Perception::from_params(&params.sensing).unwrap();
    let ctx = TickContext {
        map: &map,
        perception: &perception,
        params: &params,
        generation: 1,
    };

    let mut agent = spawn(Species::Prey, &params);
    assert_eq!(agent.energy, params.prey.max_energy);
    for tick in 1..=10 {
        assert!(agent.update(&ctx).is_none());
        assert_eq!(agent.energy, params.prey.max_energy - tick * params.prey.drain_rate);
        assert_eq!(agent.age, u64::from(tick));
    }
}

#[test]
fn test_starvation_happens_once() {
    let mut params = create_test_params();
    params.predator.max_energy = 5;
    let map = open_map();
    let perception = Perception::from_params(&params.sensing).unwrap();
    let ctx = TickContext {
        map: &map,
        perception: &perception,
        params: &params,
        generation: 1,
    };

    let mut agent = spawn(Species::Predator, &params);
    for _ in 0..4 {
        assert!(agent.update(&ctx).is_none());
        assert!(agent.is_alive());
    }

    let report = agent.update(&ctx).unwrap();
    assert_eq!(report.cause, DeathCause::Starvation);
    assert_eq!(agent.energy, 0);
    assert_eq!(agent.status, Status::Dead(DeathCause::Starvation));

    // Dead is terminal: no second report, no further change.
    let age = agent.age;
    assert!(agent.update(&ctx).is_none());
    assert!(agent.die(DeathCause::Wall, 1).is_none());
    assert_eq!(agent.age, age);
    assert_eq!(agent.status, Status::Dead(DeathCause::Starvation));
}

#[test]
fn test_prey_old_age_fitness() {
    let mut params = create_test_params();
    params.prey.max_age = Some(60);
    params.prey.max_energy = 10_000;
    let map = open_map();
    let perception = Perception::from_params(&params.sensing).unwrap();
    let ctx = TickContext {
        map: &map,
        perception: &perception,
        params: &params,
        generation: 3,
    };

    let mut agent = spawn(Species::Prey, &params);
    let report = loop {
        if let Some(report) = agent.update(&ctx) {
            break report;
        }
    };

    assert_eq!(report.cause, DeathCause::OldAge);
    assert_eq!(report.age, 60);
    assert_eq!(report.fitness, Some(60 + 15 + 100));
    assert!(report.breeds);
    assert_eq!(report.genome, agent.genome);
}

#[test]
fn test_predator_fitness_scenario() {
    let mut state = PredatorState {
        kill_count: 4,
        visited: (0..10).map(|i| (i, 0)).collect(),
    };
    assert_eq!(state.compute_fitness(0, 1), 70);

    let outcome = state.on_death(DeathCause::Starvation, 0, 1);
    assert_eq!(outcome.fitness, Some(70));
    assert!(outcome.breeds);
}

#[test]
fn test_predator_fitness_monotonic() {
    let mut state = PredatorState {
        kill_count: 0,
        visited: HashSet::new(),
    };
    let mut last = state.compute_fitness(0, 1);
    for i in 0..20 {
        if i % 2 == 0 {
            state.on_feed();
        } else {
            state.on_tick((i, i));
        }
        let fitness = state.compute_fitness(0, 1);
        assert!(fitness >= last);
        last = fitness;
    }

    // Revisiting a tile adds nothing.
    state.on_tick((1, 1));
    assert_eq!(state.compute_fitness(0, 1), last);
}

#[test]
fn test_wall_death_asymmetry() {
    let mut predator = PredatorState {
        kill_count: 2,
        visited: HashSet::new(),
    };
    let outcome = predator.on_death(DeathCause::Wall, 10, 1);
    assert_eq!(outcome.fitness, Some(20));
    assert!(!outcome.breeds);

    let mut prey = PreyState::default();
    let outcome = prey.on_death(DeathCause::Wall, 10, 1);
    assert_eq!(outcome.fitness, None);
    assert!(!outcome.breeds);
}

#[test]
fn test_eaten_prey_loses_bonus() {
    let mut prey = PreyState::default();
    let outcome = prey.on_death(DeathCause::Predator, 40, 2);
    assert_eq!(outcome.fitness, Some(40 + 10));
    assert!(outcome.breeds);
    assert!(prey.killed_by_predator);
}

#[test]
fn test_feeding_clamps_and_counts_kills() {
    let params = create_test_params();
    let mut predator = spawn(Species::Predator, &params);
    predator.energy = predator.max_energy - 1;

    predator.feed(params.predator.food_energy);
    assert_eq!(predator.energy, predator.max_energy);
    assert_eq!(predator.fitness(1), 10);

    predator.die(DeathCause::Retired, 1);
    predator.feed(params.predator.food_energy);
    assert_eq!(predator.fitness(1), 10);
}

#[test]
fn test_heading_stays_normalized() {
    let params = create_test_params();
    let map = open_map();
    let perception = Perception::from_params(&params.sensing).unwrap();
    let ctx = TickContext {
        map: &map,
        perception: &perception,
        params: &params,
        generation: 1,
    };

    let mut agent = spawn(Species::Predator, &params);
    for _ in 0..200 {
        agent.update(&ctx);
        assert!((0.0..TAU).contains(&agent.heading));
    }
}

#[test]
fn test_normalize_heading() {
    assert_eq!(normalize_heading(0.0), 0.0);
    assert!((normalize_heading(-0.5) - (TAU - 0.5)).abs() < 1e-6);
    assert!((normalize_heading(TAU + 0.25) - 0.25).abs() < 1e-6);
    assert_eq!(normalize_heading(TAU), 0.0);
    assert!((0.0..TAU).contains(&normalize_heading(-1e-9)));

    // Repeated turns accumulate modulo a full turn.
    let mut heading = 0.0;
    for _ in 0..1000 {
        heading = normalize_heading(heading + 0.2);
    }
    let expected = (1000.0f64 * 0.2).rem_euclid(std::f64::consts::TAU) as f32;
    assert!((heading - expected).abs() < 1e-2);
}

#[test]
fn test_genome_constructor_rejects_mismatch() {
    let params = create_test_params();
    let agent = spawn(Species::Prey, &params);

    let rebuilt = Agent::from_genome(
        2,
        Species::Prey,
        Array1::from_vec(vec![15.0, 15.0]),
        0.0,
        &agent.genome,
        &params,
    )
    .unwrap();
    assert_eq!(rebuilt.brain, agent.brain);
    assert_eq!(rebuilt.genome, agent.genome);

    let mut quadrant = params.clone();
    quadrant.sensing.mode = feorh::simulation::params::SensingMode::Quadrant;
    assert!(
        Agent::from_genome(
            3,
            Species::Prey,
            Array1::from_vec(vec![15.0, 15.0]),
            0.0,
            &agent.genome,
            &quadrant,
        )
        .is_err()
    );
}
