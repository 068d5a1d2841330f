#![allow(missing_docs)]

use feorh::simulation::agent::{DeathCause, DeathReport, Species};
use feorh::simulation::dna::Genome;
use feorh::simulation::mortality::MortalityLog;

fn create_test_report(id: u64, species: Species, cause: DeathCause, age: u64) -> DeathReport {
    DeathReport {
        id,
        species,
        cause,
        age,
        generation: 1,
        fitness: (cause != DeathCause::Wall).then_some(age),
        breeds: cause != DeathCause::Wall,
        genome: Genome::new("dna-v1:1x1x1:"),
    }
}

#[test]
fn test_recent_history_is_bounded() {
    let mut log = MortalityLog::new(3);
    for id in 1..=5 {
        log.record(&create_test_report(id, Species::Prey, DeathCause::Starvation, id * 10));
    }

    assert_eq!(log.recent.len(), 3);
    let ids: Vec<u64> = log.recent.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 4, 5]);
    assert_eq!(log.total_deaths(), 5);
    // Only the kept deaths count towards the recent age.
    assert!((log.avg_recent_age(Species::Prey) - 40.0).abs() < 1e-9);
    assert!(log.avg_recent_age(Species::Predator).abs() < 1e-9);
}

#[test]
fn test_generation_tallies_reset() {
    let mut log = MortalityLog::default();
    log.record(&create_test_report(1, Species::Predator, DeathCause::Wall, 5));
    log.record(&create_test_report(2, Species::Predator, DeathCause::Retired, 50));
    log.record(&create_test_report(3, Species::Prey, DeathCause::Predator, 20));

    let summary = log.finish_generation(1, 50);
    assert_eq!(summary.predator.deaths, 2);
    assert_eq!(summary.predator.wall_deaths, 1);
    assert_eq!(summary.predator.best_fitness, Some(50));
    assert_eq!(summary.prey.eaten, 1);
    assert!((summary.prey.mean_fitness() - 20.0).abs() < 1e-9);

    assert_eq!(log.tally(Species::Predator).deaths, 0);
    assert_eq!(log.tally(Species::Prey).deaths, 0);
    // History and totals span generations.
    assert_eq!(log.total_deaths(), 3);
    assert_eq!(log.recent.len(), 3);
    assert!((log.avg_recent_age(Species::Predator) - 27.5).abs() < 1e-9);
}
