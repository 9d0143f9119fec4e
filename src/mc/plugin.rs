//! A plugin architecture so that reporting and checkpointing can be
//! shared between Monte Carlo drivers.

use super::*;

use std::cell::Cell;
use std::time;

/// A `Plugin` is an object that is consulted regularly while a
/// MonteCarlo simulation runs.  It may ask for the simulation to log,
/// save, or stop.
pub trait Plugin<MC: MonteCarlo> {
    /// Decide what should happen next.  If you want to modify
    /// information, you will have to use interior mutability, because
    /// the plugin only gets read access while the `MC` is borrowed.
    fn run(&self, _mc: &MC) -> Action { Action::None }
    /// How often we need the plugin to run.  This may change every time
    /// the plugin is called, so it should be cheap.  Note that this is
    /// an upper, not a lower bound.
    fn run_period(&self) -> TimeToRun { TimeToRun::Never }
    /// Called after the simulation has been checkpointed, in response
    /// to `Action::Save` and `Action::Exit`.
    fn save(&self, _mc: &MC) {}
    /// Log any interesting data.  This is called in response to
    /// `Action::Save`, `Action::Log` and `Action::Exit`.
    fn log(&self, _mc: &MC) {}
}

/// A time when we want to be run.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialOrd, Ord, PartialEq, Eq)]
pub enum TimeToRun {
    /// Don't stop on our behalf!
    Never,
    /// After this many moves in total.
    TotalMoves(u64),
    /// This often.
    Period(u64),
}

/// An action that should be taken based on this plugin's decision.
#[derive(Copy, Clone, Debug, PartialOrd, Ord, PartialEq, Eq)]
pub enum Action {
    /// Nothing special need be done.
    None,
    /// Log interesting information.
    Log,
    /// Save things.
    Save,
    /// Stop the simulation, after saving.
    Exit,
}
impl Action {
    /// Do both of two actions.
    pub fn and(self, other: Action) -> Action {
        ::std::cmp::max(self, other)
    }
}

/// A helper to let Monte Carlo implementations run their plugins
/// without duplicating code.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct PluginManager {
    /// The move count at which the plugins next need to run.
    #[serde(skip, default)]
    next_run: Cell<u64>,
}

impl PluginManager {
    /// Create a plugin manager.
    pub fn new() -> PluginManager {
        PluginManager { next_run: Cell::new(0) }
    }
    /// Run all the plugins, if needed, logging if any of them asks for
    /// it, and return what the simulation should do next.  This should
    /// always be called with the same set of plugins.
    pub fn run<MC: MonteCarlo>(&self, mc: &MC, plugins: &[&dyn Plugin<MC>]) -> Action {
        let moves = mc.num_moves();
        if moves < self.next_run.get() {
            return Action::None;
        }
        let mut todo = Action::None;
        for p in plugins.iter() {
            todo = todo.and(p.run(mc));
        }
        if todo >= Action::Log {
            for p in plugins.iter() {
                p.log(mc);
            }
        }
        self.schedule(mc, plugins);
        todo
    }
    /// Tell every plugin that a checkpoint was just written.
    pub fn saved<MC: MonteCarlo>(&self, mc: &MC, plugins: &[&dyn Plugin<MC>]) {
        for p in plugins.iter() {
            p.save(mc);
        }
        self.schedule(mc, plugins);
    }
    fn schedule<MC: MonteCarlo>(&self, mc: &MC, plugins: &[&dyn Plugin<MC>]) {
        let moves = mc.num_moves();
        // run plugins every trillion moves minimum
        let mut new_period = 1u64 << 40;
        for p in plugins.iter() {
            match p.run_period() {
                TimeToRun::Never => (),
                TimeToRun::TotalMoves(total) => {
                    if total > moves && total - moves < new_period {
                        new_period = total - moves;
                    }
                }
                TimeToRun::Period(period) => {
                    if period < new_period {
                        new_period = period;
                    }
                }
            }
        }
        self.next_run.set(moves + new_period);
    }
}

/// A plugin that reports progress, and stops the simulation after a
/// fixed number of moves.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Report {
    max_iter: TimeToRun,
    /// This is when and where the simulation started.
    #[serde(skip, default)]
    start: Cell<Option<(time::Instant, u64)>>,
    /// The user has requested that nothing be logged!
    pub quiet: bool,
}

/// The parameters to define the report information as well as stop
/// time (which is part of the report).
#[derive(AutoArgs, Debug)]
pub struct ReportParams {
    /// The maximum number of trials to complete before stopping.
    pub max_iter: Option<u64>,
    /// Do not make reports!
    pub quiet: bool,
}

impl Default for ReportParams {
    fn default() -> Self {
        ReportParams {
            max_iter: None,
            quiet: true,
        }
    }
}

impl From<ReportParams> for Report {
    fn from(params: ReportParams) -> Self {
        Report {
            max_iter: if let Some(mi) = params.max_iter {
                TimeToRun::TotalMoves(mi)
            } else {
                TimeToRun::Never
            },
            start: Cell::new(Some((time::Instant::now(), 0))),
            quiet: params.quiet,
        }
    }
}
impl Report {
    /// Allows a resuming simulation to get updated report parameters
    /// from the flags.
    pub fn update_from(&mut self, params: ReportParams) {
        let other = Self::from(params);
        self.max_iter = other.max_iter;
        self.quiet = other.quiet;
    }
    /// How many more moves we may make before stopping, if there is a
    /// limit.
    pub fn moves_left(&self, moves: u64) -> Option<u64> {
        match self.max_iter {
            TimeToRun::TotalMoves(max) => Some(if max > moves { max - moves } else { 0 }),
            _ => None,
        }
    }
}
impl<MC: MonteCarlo> Plugin<MC> for Report {
    fn run(&self, mc: &MC) -> Action {
        if let TimeToRun::TotalMoves(maxiter) = self.max_iter {
            if mc.num_moves() >= maxiter {
                return Action::Exit;
            }
        }
        if self.quiet { Action::None } else { Action::Log }
    }
    fn run_period(&self) -> TimeToRun {
        if self.quiet { self.max_iter } else { TimeToRun::Period(1) }
    }
    fn log(&self, mc: &MC) {
        if self.quiet { return; }
        match self.start.get() {
            Some((start_time, start_iter)) => {
                let moves = mc.num_moves();
                if moves <= start_iter {
                    return;
                }
                let runtime = start_time.elapsed();
                let time_per_move = runtime.as_secs_f64()/(moves - start_iter) as f64;
                let max = match self.max_iter {
                    TimeToRun::TotalMoves(max) if max < mc.total_moves() => max,
                    _ => mc.total_moves(),
                };
                let frac_complete = moves as f64/max as f64;
                let moves_left = if max >= moves { max - moves } else { 0 };
                let time_left = (time_per_move*moves_left as f64) as u64;
                info!("[{}/{}] {}% complete after {} ({} left, {:.3}s per trial)",
                      moves, max,
                      (100.*frac_complete) as isize,
                      format_duration(runtime.as_secs()),
                      format_duration(time_left),
                      time_per_move);
            }
            None => {
                self.start.set(Some((time::Instant::now(), mc.num_moves())));
            }
        }
    }
}


/// A plugin that schedules when to save
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Save {
    #[serde(skip, default)]
    next_output: Cell<u64>,
    /// This is when and where the simulation started.
    #[serde(skip, default)]
    start: Cell<Option<(time::Instant, u64)>>,
    /// How frequently to save...
    #[serde(default)]
    save_time_seconds: Option<f64>,
}

/// The parameter to define the save schedule
#[derive(AutoArgs, Debug, Default)]
pub struct SaveParams {
    /// Maximum time between saves in hours
    pub save_time: Option<f64>,
}

impl From<SaveParams> for Save {
    fn from(params: SaveParams) -> Self {
        Save {
            next_output: Cell::new(1),
            start: Cell::new(Some((time::Instant::now(), 0))),
            save_time_seconds: params.save_time.map(|h| 60.*60.*h),
        }
    }
}
impl Save {
    /// Allows a resuming simulation to get updated save parameters
    /// from the flags.
    pub fn update_from(&mut self, params: SaveParams) {
        self.save_time_seconds = params.save_time.map(|h| 60.*60.*h);
    }
}
impl<MC: MonteCarlo> Plugin<MC> for Save {
    fn run(&self, mc: &MC) -> Action {
        if mc.num_moves() >= self.next_output.get() {
            Action::Save
        } else {
            Action::None
        }
    }
    fn run_period(&self) -> TimeToRun {
        TimeToRun::TotalMoves(self.next_output.get())
    }
    fn save(&self, mc: &MC) {
        let moves = mc.num_moves();
        if let Some(period) = self.save_time_seconds {
            match self.start.get() {
                Some((start_time, start_iter)) if moves > start_iter => {
                    let time_per_move =
                        start_time.elapsed().as_secs_f64()/(moves - start_iter) as f64;
                    let moves_per_period = 1 + (period/time_per_move) as u64;
                    self.next_output.set(moves + moves_per_period);
                }
                _ => {
                    self.start.set(Some((time::Instant::now(), moves)));
                    self.next_output.set(moves + 1);
                }
            }
        } else {
            // a resumed run starts with next_output at zero
            self.next_output.set(std::cmp::max(moves, 1)*2)
        }
    }
}

fn format_duration(secs: u64) -> String {
    let mins = secs / 60;
    let hours = mins / 60;
    let mins = mins % 60;
    if hours > 50 {
        format!("{} hours", hours)
    } else if hours >= 2 {
        format!("{} hours, {} minutes", hours, mins)
    } else if hours == 1 {
        format!("1 hour, {} minutes", mins)
    } else if mins > 1 {
        format!("{} minutes", mins)
    } else if mins == 1 {
        format!("1 minute {} seconds", secs % 60)
    } else {
        format!("{} seconds", secs)
    }
}

#[test]
fn durations() {
    assert_eq!(format_duration(5), "5 seconds");
    assert_eq!(format_duration(75), "1 minute 15 seconds");
    assert_eq!(format_duration(600), "10 minutes");
    assert_eq!(format_duration(3600 + 120), "1 hour, 2 minutes");
    assert_eq!(format_duration(3*3600 + 60), "3 hours, 1 minutes");
    assert_eq!(format_duration(3600), "1 hour, 0 minutes");
    assert_eq!(format_duration(2*3600 + 30), "2 hours, 0 minutes");
    assert_eq!(format_duration(60*3600), "60 hours");
}

#[test]
fn actions_combine() {
    assert_eq!(Action::None.and(Action::Log), Action::Log);
    assert_eq!(Action::Exit.and(Action::Save), Action::Exit);
    assert_eq!(Action::Save.and(Action::None), Action::Save);
}
