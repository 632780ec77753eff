use std::{thread, time::Duration};

use golife::{pos, Error, Grid, Population, PresetCatalog, RuleSet, Sim};

const INTERVAL: Duration = Duration::from_millis(5);

fn glider_sim() -> (Sim, Population) {
    let glider = PresetCatalog::default().get("glider").unwrap();
    let start = glider.centered_in(12, 12).unwrap();
    let mut grid = Grid::built(12, 12).unwrap();
    grid.set_population(Some(&start)).unwrap();
    (Sim::spawn(grid, RuleSet::Standard), start)
}

#[test]
fn test_reset_restores_latest_start() {
    let (sim, _) = glider_sim();
    let handle = sim.handle();

    handle.start(INTERVAL).unwrap();
    thread::sleep(INTERVAL * 10);
    handle.pause().unwrap();
    let status = handle.status().unwrap();
    assert!(status.ticks > 0);
    assert_eq!(status.generation, status.ticks);
    let restarted_from = handle.population().unwrap();

    handle.start(INTERVAL).unwrap();
    thread::sleep(INTERVAL * 4);
    handle.reset().unwrap();

    assert!(!handle.is_running().unwrap());
    assert_eq!(handle.population().unwrap(), restarted_from);
    sim.join();
}

#[test]
fn test_reset_restores_first_start() {
    let (sim, start) = glider_sim();
    let handle = sim.handle();

    handle.start(INTERVAL).unwrap();
    thread::sleep(INTERVAL * 10);
    handle.reset().unwrap();

    assert_eq!(handle.population().unwrap(), start);
    let status = handle.status().unwrap();
    assert!(!status.running);
    assert_eq!(status.generation, 0);
    sim.join();
}

#[test]
fn test_paused_simulation_is_frozen() {
    let (sim, _) = glider_sim();
    let handle = sim.handle();

    handle.start(INTERVAL).unwrap();
    thread::sleep(INTERVAL * 4);
    handle.pause().unwrap();
    let paused = handle.population().unwrap();
    let ticks = handle.status().unwrap().ticks;

    thread::sleep(INTERVAL * 10);
    assert_eq!(handle.population().unwrap(), paused);
    assert_eq!(handle.status().unwrap().ticks, ticks);
    sim.join();
}

#[test]
fn test_double_start_runs_one_timer() {
    let window = Duration::from_millis(200);
    let interval = Duration::from_millis(20);

    let count = |starts: usize| {
        let (sim, _) = glider_sim();
        let handle = sim.handle();
        for _ in 0..starts {
            handle.start(interval).unwrap();
        }
        thread::sleep(window);
        handle.pause().unwrap();
        let ticks = handle.status().unwrap().ticks;
        sim.join();
        ticks
    };

    let single = count(1);
    let double = count(2);
    // two timers would roughly double the count
    assert!(single > 0);
    assert!(double <= single + 2, "single {single}, double {double}");
}

#[test]
fn test_grid_operations_through_handle() {
    let sim = Sim::spawn(Grid::new(2, 2), RuleSet::Standard);
    let handle = sim.handle();

    assert!(matches!(handle.population(), Err(Error::NotBuilt)));
    assert!(matches!(handle.start(INTERVAL), Err(Error::NotBuilt)));
    assert!(!handle.is_running().unwrap());

    handle.build(3, 4).unwrap();
    assert_eq!(handle.population().unwrap().to_rows(), vec![vec![0; 4]; 3]);
    assert!(matches!(handle.build(0, 4), Err(Error::InvalidDimension { .. })));

    handle.set_cell(pos!(1, 1), true).unwrap();
    handle.set_cell(pos!(2, 1), true).unwrap();
    assert_eq!(handle.num_neighbors(1, 0).unwrap(), 2);
    assert_eq!(handle.num_neighbors(3, 2).unwrap(), 1);

    let wrong = Population::new(4, 3).unwrap();
    assert!(matches!(
        handle.set_population(Some(wrong)),
        Err(Error::DimensionMismatch { .. })
    ));

    handle.set_rule(RuleSet::Identity).unwrap();
    let before = handle.population().unwrap();
    handle.step().unwrap();
    assert_eq!(handle.population().unwrap(), before);

    handle.dispose().unwrap();
    assert!(matches!(handle.population(), Err(Error::NotBuilt)));
    sim.join();
}

#[test]
fn test_handle_after_shutdown() {
    let sim = Sim::spawn(Grid::built(2, 2).unwrap(), RuleSet::Standard);
    let handle = sim.handle();
    sim.join();
    assert!(matches!(handle.status(), Err(Error::Disconnected)));
}

#[test]
fn test_unschedulable_interval_keeps_thread_alive() {
    let (sim, start) = glider_sim();
    let handle = sim.handle();

    assert!(matches!(
        handle.start(Duration::MAX),
        Err(Error::InvalidInterval(_))
    ));
    assert!(matches!(
        handle.start(Duration::ZERO),
        Err(Error::InvalidInterval(_))
    ));
    let status = handle.status().unwrap();
    assert!(!status.running);
    assert_eq!(handle.population().unwrap(), start);

    handle.start(INTERVAL).unwrap();
    assert!(handle.is_running().unwrap());
    sim.join();
}
