//! A resumable experiment that estimates the percolation threshold
//! from many independent trials.

use super::*;
use super::plugin::Plugin;
use super::stats::{check_params, run_batch, ThresholdStats};
use crate::rng::{self, MyRng};

/// The parameters needed to configure an experiment.
#[derive(Debug, AutoArgs)]
pub struct ExperimentParams {
    /// Width of the square grid (default 200)
    pub size: Option<usize>,
    /// Number of independent trials (default 100)
    pub trials: Option<usize>,
    /// The seed for the random number generator.
    pub seed: Option<u64>,
    /// report input
    pub _report: plugin::ReportParams,
    /// save input
    pub _save: plugin::SaveParams,
}

impl Default for ExperimentParams {
    fn default() -> Self {
        ExperimentParams {
            size: None,
            trials: None,
            seed: None,
            _report: plugin::ReportParams::default(),
            _save: plugin::SaveParams::default(),
        }
    }
}

/// Many trials on grids of one size, and their results so far.
#[derive(Serialize, Deserialize, Debug)]
pub struct Experiment {
    /// Width of the square grid.
    pub size: usize,
    /// Number of trials to run.
    pub trials: usize,
    /// The fraction of sites open at percolation for each finished trial.
    pub samples: Vec<f64>,
    /// The random number generator, which hands one jump to each trial.
    pub rng: MyRng,
    /// Where to save the resume file.
    pub save_as: std::path::PathBuf,
    report: plugin::Report,
    save: plugin::Save,
    #[serde(skip, default)]
    manager: plugin::PluginManager,
}

impl Experiment {
    /// Have all the trials finished?
    pub fn is_complete(&self) -> bool {
        self.samples.len() >= self.trials
    }

    /// Statistics over the trials finished so far.
    pub fn stats(&self) -> error::Result<ThresholdStats> {
        ThresholdStats::from_samples(self.samples.clone())
    }

    /// Run trials until they are all done or a plugin asks us to stop,
    /// checkpointing along the way.  Returns whether the experiment is
    /// complete.
    pub fn run(&mut self) -> error::Result<bool> {
        while !self.is_complete() {
            self.move_once()?;
            let plugins: [&dyn Plugin<Self>; 2] = [&self.report, &self.save];
            let todo = self.manager.run(self, &plugins);
            if todo >= plugin::Action::Save {
                self.checkpoint()?;
                self.manager.saved(self, &plugins);
            }
            if todo >= plugin::Action::Exit {
                info!("Stopping after {} of {} trials", self.samples.len(), self.trials);
                return Ok(self.is_complete());
            }
        }
        self.checkpoint()?;
        Ok(true)
    }
}

impl MonteCarlo for Experiment {
    type Params = ExperimentParams;

    fn from_params(params: ExperimentParams, save_as: std::path::PathBuf) -> error::Result<Self> {
        let size = params.size.unwrap_or(200);
        let trials = params.trials.unwrap_or(100);
        check_params(size, trials)?;
        Ok(Experiment {
            size,
            trials,
            samples: Vec::with_capacity(trials),
            rng: rng::from_seed(params.seed),
            save_as,
            report: plugin::Report::from(params._report),
            save: plugin::Save::from(params._save),
            manager: plugin::PluginManager::new(),
        })
    }

    fn update_from_params(&mut self, params: ExperimentParams) {
        if params.size.map(|s| s != self.size).unwrap_or(false)
            || params.trials.map(|t| t != self.trials).unwrap_or(false)
        {
            warn!("ignoring --size and --trials, resuming {} trials on a {}x{} grid",
                  self.trials, self.size, self.size);
        }
        self.report.update_from(params._report);
        self.save.update_from(params._save);
    }

    /// Run one batch of trials, one per thread in the rayon pool.
    fn move_once(&mut self) -> error::Result<()> {
        let mut remaining = self.trials - self.samples.len();
        if let Some(left) = self.report.moves_left(self.num_moves()) {
            // always make progress, even when asked to stop right away
            remaining = std::cmp::min(remaining, std::cmp::max(left, 1) as usize);
        }
        let batch = std::cmp::min(rayon::current_num_threads(), remaining);
        let first = self.samples.len();
        let results = run_batch(self.size, rng::split(&mut self.rng, batch))?;
        for (i, x) in results.iter().enumerate() {
            debug!("trial {}: {}", first + i + 1, x);
        }
        self.samples.extend(results);
        Ok(())
    }

    fn num_moves(&self) -> u64 {
        self.samples.len() as u64
    }

    fn total_moves(&self) -> u64 {
        self.trials as u64
    }

    fn save_as(&self) -> &std::path::Path {
        &self.save_as
    }
}

#[cfg(test)]
fn params(size: usize, trials: usize, seed: u64) -> ExperimentParams {
    ExperimentParams {
        size: Some(size),
        trials: Some(trials),
        seed: Some(seed),
        .. ExperimentParams::default()
    }
}

#[test]
fn rejects_empty_experiments() {
    let p = std::path::PathBuf::from("never.yaml");
    assert!(matches!(Experiment::from_params(params(0, 3, 1), p.clone()),
                     Err(error::Error::InvalidArgument(_))));
    assert!(matches!(Experiment::from_params(params(3, 0, 1), p),
                     Err(error::Error::InvalidArgument(_))));
}

#[test]
fn experiment_matches_parallel_stats() {
    use rand::SeedableRng;
    let dir = tempfile::tempdir().unwrap();
    let mut mc = Experiment::from_params(params(10, 9, 137), dir.path().join("e.yaml"))
        .unwrap();
    assert!(mc.run().unwrap());
    assert!(mc.is_complete());
    assert_eq!(mc.num_moves(), 9);
    let mut rng = MyRng::seed_from_u64(137);
    let expected = ThresholdStats::run_parallel(10, 9, &mut rng).unwrap();
    assert_eq!(mc.stats().unwrap(), expected);
}

#[test]
fn resume_gives_same_answer() {
    let dir = tempfile::tempdir().unwrap();
    let whole = dir.path().join("whole.yaml");
    let part = dir.path().join("part.yaml");

    let mut mc = Experiment::from_params(params(8, 12, 5), whole.clone()).unwrap();
    assert!(mc.run().unwrap());

    let mut p = params(8, 12, 5);
    p._report.max_iter = Some(5);
    let mut first = Experiment::from_params(p, part.clone()).unwrap();
    assert!(!first.run().unwrap());
    assert_eq!(first.samples.len(), 5);

    let mut resumed: Experiment = read_checkpoint(&part).unwrap();
    assert_eq!(resumed.samples, first.samples);
    resumed.update_from_params(ExperimentParams::default());
    assert!(resumed.run().unwrap());
    assert_eq!(resumed.samples, mc.samples);

    let saved: Experiment = read_checkpoint(&whole).unwrap();
    assert_eq!(saved.samples, mc.samples);
}

#[test]
fn resume_from_drops_old_max_iter() {
    let dir = tempfile::tempdir().unwrap();
    let whole = dir.path().join("whole.yaml");
    let part = dir.path().join("part.yaml");

    let mut mc = Experiment::from_params(params(6, 10, 42), whole).unwrap();
    assert!(mc.run().unwrap());

    let mut p = params(6, 10, 42);
    p._report.max_iter = Some(4);
    let mut first = Experiment::from_params(p, part.clone()).unwrap();
    assert!(!first.run().unwrap());

    // resuming from the checkpoint with no --max-iter runs to the end
    let mut resumed: Experiment =
        start(ExperimentParams::default(), None, Some(part.clone())).unwrap();
    assert_eq!(resumed.samples.len(), 4);
    assert!(resumed.run().unwrap());
    assert_eq!(resumed.samples, mc.samples);
    assert_eq!(resumed.save_as, part);
}

#[test]
fn start_resumes_existing_save_file() {
    let dir = tempfile::tempdir().unwrap();
    let part = dir.path().join("part.yaml");
    let mut p = params(5, 6, 3);
    p._report.max_iter = Some(2);
    let mut first: Experiment = start(p, Some(part.clone()), None).unwrap();
    assert!(!first.run().unwrap());

    let mut resumed: Experiment =
        start(params(5, 6, 3), Some(part.clone()), None).unwrap();
    assert_eq!(resumed.samples, first.samples);
    assert!(resumed.run().unwrap());
    assert_eq!(resumed.samples.len(), 6);
}
