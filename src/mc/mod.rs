//! Monte Carlo drivers for percolation experiments.

pub mod experiment;
pub mod plugin;
pub mod stats;
pub mod trial;

use crate::atomicfile::AtomicFile;
use crate::error;

use auto_args::AutoArgs;
use std::path::{Path, PathBuf};

/// The version of the code, recorded when a simulation starts.
pub const VERSION: &str = git_version::git_version!(fallback = "unknown");

/// The command-line parameters of a Monte Carlo driver.
#[derive(AutoArgs, Debug)]
struct Params<MP> {
    _mc: MP,
    save_as: Option<PathBuf>,
    num_threads: Option<usize>,
    resume_from: Option<PathBuf>,
}

/// A Monte Carlo driver whose state can be checkpointed and resumed.
pub trait MonteCarlo: Sized + serde::Serialize + serde::de::DeserializeOwned {
    /// The parameters needed to configure the simulation.
    type Params: AutoArgs;
    /// Create a new simulation from parameters.
    fn from_params(params: Self::Params, save_as: PathBuf) -> error::Result<Self>;
    /// Take the (report, save schedule) parameters that may change when
    /// resuming a simulation.
    fn update_from_params(&mut self, params: Self::Params);
    /// Make one move.
    fn move_once(&mut self) -> error::Result<()>;
    /// The number of moves that have been made.
    fn num_moves(&self) -> u64;
    /// The number of moves needed to finish.
    fn total_moves(&self) -> u64;
    /// Where checkpoints go.
    fn save_as(&self) -> &Path;

    /// Write a checkpoint of the simulation.
    fn checkpoint(&self) -> error::Result<()> {
        write_checkpoint(self.save_as(), self)
    }

    /// Create a simulation from command-line flags, resuming one when
    /// asked to or when the `--save-as` file already exists.
    fn from_args() -> error::Result<Self> {
        info!("git version: {}", VERSION);
        let Params { _mc, save_as, num_threads, resume_from } =
            <Params<Self::Params>>::from_args();
        if let Some(num_threads) = num_threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()?;
        }
        start(_mc, save_as, resume_from)
    }
}

/// Start a simulation, or resume one from `resume_from` or from an
/// existing `save_as` file.  A resumed simulation takes its report and
/// save schedule from `params`, so a stop requested by an earlier
/// `--max-iter` does not carry over.
pub fn start<MC: MonteCarlo>(params: MC::Params, save_as: Option<PathBuf>,
                             resume_from: Option<PathBuf>) -> error::Result<MC> {
    let resume = match (resume_from, &save_as) {
        (Some(p), _) => Some(p),
        (None, Some(p)) if p.exists() => Some(p.clone()),
        _ => None,
    };
    if let Some(p) = resume {
        let mut mc: MC = read_checkpoint(&p)?;
        info!("Resuming from file {:?}", p);
        mc.update_from_params(params);
        return Ok(mc);
    }
    MC::from_params(params, save_as.unwrap_or_else(|| PathBuf::from("resume.yaml")))
}

/// Read a checkpoint, choosing the format from the file extension.
pub fn read_checkpoint<T: serde::de::DeserializeOwned>(p: &Path) -> error::Result<T> {
    let f = std::fs::File::open(p)?;
    Ok(match p.extension().and_then(|x| x.to_str()) {
        Some("yaml") => serde_yaml::from_reader(&f)?,
        Some("json") => serde_json::from_reader(&f)?,
        Some("cbor") => serde_cbor::from_reader(&f)?,
        _ => return Err(error::Error::UnknownFormat(p.to_path_buf())),
    })
}

/// Atomically write a checkpoint, choosing the format from the file
/// extension.
pub fn write_checkpoint<T: serde::Serialize>(p: &Path, value: &T) -> error::Result<()> {
    let f = match p.extension().and_then(|x| x.to_str()) {
        Some("yaml") | Some("json") | Some("cbor") => AtomicFile::create(p)?,
        _ => return Err(error::Error::UnknownFormat(p.to_path_buf())),
    };
    match p.extension().and_then(|x| x.to_str()) {
        Some("yaml") => serde_yaml::to_writer(&f, value)?,
        Some("json") => serde_json::to_writer(&f, value)?,
        _ => serde_cbor::to_writer(&f, value)?,
    }
    f.commit()
}

#[test]
fn checkpoint_formats() {
    let dir = tempfile::tempdir().unwrap();
    let samples = vec![0.5, 0.625, 0.75];
    for ext in &["yaml", "json", "cbor"] {
        let p = dir.path().join(format!("samples.{}", ext));
        write_checkpoint(&p, &samples).unwrap();
        let back: Vec<f64> = read_checkpoint(&p).unwrap();
        assert_eq!(back, samples);
    }
    let p = dir.path().join("samples.txt");
    assert!(matches!(write_checkpoint(&p, &samples), Err(error::Error::UnknownFormat(_))));
    assert!(!p.exists());
    assert!(matches!(read_checkpoint::<Vec<f64>>(&p), Err(error::Error::Io(_))));
}
