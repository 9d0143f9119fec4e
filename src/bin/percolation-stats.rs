extern crate percmc;

use percmc::mc::experiment::Experiment;
use percmc::mc::MonteCarlo;

use simplelog::{Config, LevelFilter, WriteLogger};

fn main() -> anyhow::Result<()> {
    let level = if std::env::args().any(|a| a == "--quiet") {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    // stdout is kept for the results
    WriteLogger::init(level, Config::default(), std::io::stderr())?;

    let mut mc = Experiment::from_args()?;
    if !mc.run()? {
        log::info!("Run again with --save-as={} to continue", mc.save_as.display());
        return Ok(());
    }
    let stats = mc.stats()?;
    println!("mean = {}", stats.mean());
    println!("std = {}", stats.stddev());
    println!("95% confidence interval = {}, {}",
             stats.confidence_lo(), stats.confidence_hi());
    Ok(())
}
