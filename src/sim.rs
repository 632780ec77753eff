use std::{
    sync::mpsc::{self, RecvTimeoutError},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use log::{debug, error, info, warn};

use crate::{Error, Grid, Population, Pos, Result, RuleSet};

/// A repeating task: fires every `interval`, starting one interval after creation.
/// Dropping it cancels every future firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    interval: Duration,
    next_due: Instant,
}

impl Schedule {
    /// Fails with [`Error::InvalidInterval`] for a zero interval or one that
    /// cannot be added to `now`.
    pub fn new(interval: Duration, now: Instant) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::InvalidInterval(interval));
        }
        let next_due = now
            .checked_add(interval)
            .ok_or(Error::InvalidInterval(interval))?;
        Ok(Self { interval, next_due })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    /// Moves to the next slot. A late tick does not trigger a burst of catch-up
    /// ticks: the schedule restarts from `now` instead. Returns `false` when no
    /// later slot can be represented.
    fn advance(&mut self, now: Instant) -> bool {
        let next_due = match self.next_due.checked_add(self.interval) {
            Some(next_due) if next_due > now => Some(next_due),
            _ => now.checked_add(self.interval),
        };
        match next_due {
            Some(next_due) => {
                self.next_due = next_due;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status {
    pub running: bool,
    /// Generations computed since the population was last replaced.
    pub generation: u64,
    /// Timer-fired ticks since the driver was created.
    pub ticks: u64,
    pub alive: usize,
}

/// The start/pause/reset state machine around a grid and its rule.
///
/// The driver is either idle (`schedule` is `None`) or running. Ticks are only
/// fired from [`Driver::poll`], so two ticks can never overlap and a rule change
/// always lands between generations.
#[derive(Debug)]
pub struct Driver {
    grid: Grid,
    rule: RuleSet,
    last_started: Option<Population>,
    schedule: Option<Schedule>,
    generation: u64,
    ticks: u64,
}

impl Driver {
    pub fn new(grid: Grid, rule: RuleSet) -> Self {
        Self {
            grid,
            rule,
            last_started: None,
            schedule: None,
            generation: 0,
            ticks: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rule(&self) -> &RuleSet {
        &self.rule
    }

    pub fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn last_started(&self) -> Option<&Population> {
        self.last_started.as_ref()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.schedule.as_ref().map(Schedule::next_due)
    }

    pub fn status(&self) -> Status {
        Status {
            running: self.is_running(),
            generation: self.generation,
            ticks: self.ticks,
            alive: self
                .grid
                .population()
                .map_or(0, |population| population.alive_count()),
        }
    }

    pub fn start(&mut self, interval: Duration) -> Result<()> {
        self.start_at(interval, Instant::now())
    }

    /// Starts ticking every `interval` counted from `now`, replacing any running schedule.
    pub fn start_at(&mut self, interval: Duration, now: Instant) -> Result<()> {
        let population = self.grid.population()?;
        let schedule = Schedule::new(interval, now)?;
        if self.schedule.take().is_some() {
            debug!("restarting: previous schedule cancelled");
        }
        self.last_started = Some(population);
        self.grid.set_simulating(true);
        self.schedule = Some(schedule);
        info!("simulation started, one generation every {interval:?}");
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.schedule.take().is_some() {
            info!("simulation paused at generation {}", self.generation);
        }
        self.grid.set_simulating(false);
    }

    /// Pauses, then restores the population captured by the last `start`.
    pub fn reset(&mut self) -> Result<()> {
        self.pause();
        if let Some(population) = &self.last_started {
            self.grid.set_population(Some(population))?;
            self.generation = 0;
            info!("population reset");
        }
        Ok(())
    }

    pub fn set_rule(&mut self, rule: RuleSet) {
        debug!("rule set to {rule:?}");
        self.rule = rule;
    }

    /// Advances one generation by hand.
    pub fn step(&mut self) -> Result<()> {
        self.grid.apply_rule(&self.rule)?;
        self.generation += 1;
        Ok(())
    }

    /// Fires at most one tick if the schedule is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(schedule) = self.schedule.as_mut() else {
            return false;
        };
        if !schedule.is_due(now) {
            return false;
        }
        let rescheduled = schedule.advance(now);
        self.tick();
        if !rescheduled {
            warn!("no further tick can be scheduled");
            self.pause();
        }
        true
    }

    fn tick(&mut self) {
        self.ticks += 1;
        match self.step() {
            Ok(()) => debug!("tick {} -> generation {}", self.ticks, self.generation),
            Err(err) => {
                // only reachable if the grid lost its storage while running
                error!("tick failed: {err}");
                self.pause();
            }
        }
    }

    pub fn build(&mut self, rows: usize, cols: usize) -> Result<()> {
        self.grid.build(rows, cols)?;
        self.pause();
        self.last_started = None;
        self.generation = 0;
        Ok(())
    }

    pub fn dispose(&mut self) {
        self.pause();
        self.last_started = None;
        self.grid.dispose();
    }

    pub fn set_population(&mut self, model: Option<&Population>) -> Result<()> {
        self.grid.set_population(model)?;
        self.generation = 0;
        Ok(())
    }

    pub fn set_cell(&mut self, pos: Pos, alive: bool) -> Result<()> {
        if self.is_running() {
            warn!("editing cell ({}, {}) while the simulation runs", pos.x, pos.y);
        }
        self.grid.set_cell(pos, alive)
    }
}

type Reply<T> = mpsc::Sender<Result<T>>;

pub enum SimCmd {
    Build(usize, usize, Reply<()>),
    Dispose(Reply<()>),
    SetPopulation(Option<Population>, Reply<()>),
    Population(Reply<Population>),
    NumNeighbors(usize, usize, Reply<u8>),
    SetCell(Pos, bool, Reply<()>),
    Start(Duration, Reply<()>),
    Pause(Reply<()>),
    Reset(Reply<()>),
    Step(Reply<()>),
    SetRule(RuleSet, Reply<()>),
    Status(Reply<Status>),
    Shutdown,
}

/// A cloneable remote control for a running [`Sim`].
#[derive(Debug, Clone)]
pub struct SimHandle {
    sender: mpsc::Sender<SimCmd>,
}

impl SimHandle {
    pub fn new(sender: mpsc::Sender<SimCmd>) -> Self {
        Self { sender }
    }

    fn request<T>(&self, command: impl FnOnce(Reply<T>) -> SimCmd) -> Result<T> {
        let (sender, receiver) = mpsc::channel();
        self.sender
            .send(command(sender))
            .map_err(|_| Error::Disconnected)?;
        receiver.recv().map_err(|_| Error::Disconnected)?
    }

    pub fn build(&self, rows: usize, cols: usize) -> Result<()> {
        self.request(|reply| SimCmd::Build(rows, cols, reply))
    }

    pub fn dispose(&self) -> Result<()> {
        self.request(SimCmd::Dispose)
    }

    /// Copies `model` into the grid, or randomizes it when `None`.
    pub fn set_population(&self, model: Option<Population>) -> Result<()> {
        self.request(|reply| SimCmd::SetPopulation(model, reply))
    }

    pub fn population(&self) -> Result<Population> {
        self.request(SimCmd::Population)
    }

    pub fn num_neighbors(&self, x: usize, y: usize) -> Result<u8> {
        self.request(|reply| SimCmd::NumNeighbors(x, y, reply))
    }

    pub fn set_cell(&self, pos: Pos, alive: bool) -> Result<()> {
        self.request(|reply| SimCmd::SetCell(pos, alive, reply))
    }

    pub fn start(&self, interval: Duration) -> Result<()> {
        self.request(|reply| SimCmd::Start(interval, reply))
    }

    pub fn pause(&self) -> Result<()> {
        self.request(SimCmd::Pause)
    }

    pub fn reset(&self) -> Result<()> {
        self.request(SimCmd::Reset)
    }

    pub fn step(&self) -> Result<()> {
        self.request(SimCmd::Step)
    }

    pub fn set_rule(&self, rule: RuleSet) -> Result<()> {
        self.request(|reply| SimCmd::SetRule(rule, reply))
    }

    pub fn status(&self) -> Result<Status> {
        self.request(SimCmd::Status)
    }

    pub fn is_running(&self) -> Result<bool> {
        self.status().map(|status| status.running)
    }

    pub fn shutdown(&self) {
        let _ = self.sender.send(SimCmd::Shutdown);
    }
}

/// A [`Driver`] running on its own thread. The thread owns the grid; everything
/// else talks to it through [`SimHandle`]s, one command at a time, between ticks.
#[derive(Debug)]
pub struct Sim {
    thread: JoinHandle<()>,
    sender: mpsc::Sender<SimCmd>,
}

impl Sim {
    pub fn spawn(grid: Grid, rule: RuleSet) -> Self {
        let driver = Driver::new(grid, rule);
        let (sender, receiver) = mpsc::channel();
        let thread = thread::spawn(move || sim_loop(receiver, driver));

        Self { thread, sender }
    }

    pub fn handle(&self) -> SimHandle {
        SimHandle::new(self.sender.clone())
    }

    /// Stops the loop and waits for the thread to finish.
    pub fn join(self) {
        let _ = self.sender.send(SimCmd::Shutdown);
        if self.thread.join().is_err() {
            error!("simulation thread panicked");
        }
    }
}

fn sim_loop(receiver: mpsc::Receiver<SimCmd>, mut driver: Driver) {
    loop {
        let command = match driver.next_due() {
            Some(due) => {
                match receiver.recv_timeout(due.saturating_duration_since(Instant::now())) {
                    Ok(command) => Some(command),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match receiver.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            },
        };

        if let Some(command) = command {
            if !handle_command(&mut driver, command) {
                break;
            }
        }
        driver.poll(Instant::now());
    }
    debug!("simulation loop stopped after {} ticks", driver.ticks());
}

/// Returns `false` when the loop should stop.
fn handle_command(driver: &mut Driver, command: SimCmd) -> bool {
    match command {
        SimCmd::Build(rows, cols, reply) => {
            let _ = reply.send(driver.build(rows, cols));
        }
        SimCmd::Dispose(reply) => {
            driver.dispose();
            let _ = reply.send(Ok(()));
        }
        SimCmd::SetPopulation(model, reply) => {
            let _ = reply.send(driver.set_population(model.as_ref()));
        }
        SimCmd::Population(reply) => {
            let _ = reply.send(driver.grid().population());
        }
        SimCmd::NumNeighbors(x, y, reply) => {
            let _ = reply.send(driver.grid().num_neighbors(x, y));
        }
        SimCmd::SetCell(pos, alive, reply) => {
            let _ = reply.send(driver.set_cell(pos, alive));
        }
        SimCmd::Start(interval, reply) => {
            let result = driver.start(interval);
            if let Err(err) = &result {
                warn!("start rejected: {err}");
            }
            let _ = reply.send(result);
        }
        SimCmd::Pause(reply) => {
            driver.pause();
            let _ = reply.send(Ok(()));
        }
        SimCmd::Reset(reply) => {
            let _ = reply.send(driver.reset());
        }
        SimCmd::Step(reply) => {
            let _ = reply.send(driver.step());
        }
        SimCmd::SetRule(rule, reply) => {
            driver.set_rule(rule);
            let _ = reply.send(Ok(()));
        }
        SimCmd::Status(reply) => {
            let _ = reply.send(Ok(driver.status()));
        }
        SimCmd::Shutdown => return false,
    }
    true
}
