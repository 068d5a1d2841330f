use std::process::ExitCode;

use feorh::simulation::agent::Species;
use feorh::simulation::ecosystem::Ecosystem;
use feorh::simulation::params::Params;
use feorh::simulation::tile::TileMap;

/// Usage: `feorh [config.json] [map.txt] [breeders.json]`
///
/// Runs `max_generations` generations headless and, if a third path is given,
/// writes the breeder history there.
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> feorh::Result<()> {
    let params = match args.first() {
        Some(path) => Params::from_json_file(path)?,
        None => Params::default(),
    };

    let mut ecosystem = match args.get(1) {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let map = TileMap::from_ascii(&text, params.tile_size)?;
            Ecosystem::new(params, map)?
        }
        None => Ecosystem::with_default_map(params)?,
    };

    log::info!(
        "starting with {} tigers and {} deer",
        ecosystem.population(Species::Predator),
        ecosystem.population(Species::Prey)
    );

    let generations = ecosystem.params.max_generations;
    for _ in 0..generations {
        ecosystem.run_generation()?;
    }
    log::info!(
        "ran {generations} generations, {} deaths in total",
        ecosystem.state.mortality.total_deaths()
    );

    if let Some(path) = args.get(2) {
        ecosystem.save_breeders(path)?;
        log::info!("breeders saved to {path}");
    }
    Ok(())
}
