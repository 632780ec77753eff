use std::{env::args, fs, path::Path, process::exit};

use golife::{Grid, Population, PresetCatalog, Result, Sim, SimConfig};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

pub use view::View;
mod view;

/// What the board starts with.
enum Setup {
    Random,
    Pattern(Population),
}

fn load(arg: Option<String>) -> Result<(SimConfig, Setup)> {
    let catalog = PresetCatalog::default();
    let Some(arg) = arg else {
        return Ok((SimConfig::default(), Setup::Random));
    };

    if arg.ends_with(".json") {
        let config = SimConfig::load(&arg)?;
        let setup = match &config.preset {
            Some(name) => Setup::Pattern(catalog.get(name)?),
            None => Setup::Random,
        };
        return Ok((config, setup));
    }

    let pattern = if Path::new(&arg).is_file() {
        Population::from_text(&fs::read_to_string(&arg)?)?
    } else {
        catalog.get(&arg)?
    };
    let defaults = SimConfig::default();
    let config = SimConfig {
        rows: defaults.rows.max(pattern.rows()),
        cols: defaults.cols.max(pattern.cols()),
        ..defaults
    };
    Ok((config, Setup::Pattern(pattern)))
}

fn run() -> Result<()> {
    let (config, setup) = load(args().nth(1))?;
    let rule = config.rule_set()?;

    let mut grid = Grid::built(config.rows, config.cols)?;
    match (setup, config.seed) {
        (Setup::Pattern(pattern), _) => {
            let model = pattern.centered_in(config.rows, config.cols)?;
            grid.set_population(Some(&model))?;
        }
        (Setup::Random, Some(seed)) => grid.randomize_with(&mut StdRng::seed_from_u64(seed))?,
        (Setup::Random, None) => grid.set_population(None)?,
    }
    info!(
        "{}x{} board, rule {:?}, {} alive",
        config.rows,
        config.cols,
        rule,
        grid.population()?.alive_count()
    );

    let simulation = Sim::spawn(grid, rule);
    let view = View::spawn(simulation.handle(), config.interval(), config.rule.clone());

    view.join();
    simulation.join();
    Ok(())
}

pub fn main() {
    env_logger::init();

    if let Err(err) = run() {
        eprintln!("[error] {err}");
        exit(1);
    }
}
