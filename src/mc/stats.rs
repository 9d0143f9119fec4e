//! Statistics of the percolation threshold over many trials.

use super::trial::run_trial;
use crate::error::{Error, Result};
use crate::rng::{self, MyRng};

use rand::Rng;
use rayon::prelude::*;

/// The critical value for a 95% confidence interval.
pub const Z95: f64 = 1.96;

/// The fraction of sites open at percolation, for each of several
/// independent trials.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ThresholdStats {
    samples: Vec<f64>,
}

pub(crate) fn check_params(n: usize, trials: usize) -> Result<()> {
    if n == 0 {
        return Err(Error::InvalidArgument("grid size must be positive".to_string()));
    }
    if trials == 0 {
        return Err(Error::InvalidArgument("number of trials must be positive".to_string()));
    }
    Ok(())
}

/// Run one trial per generator, in parallel.
pub fn run_batch(n: usize, streams: Vec<MyRng>) -> Result<Vec<f64>> {
    streams.into_par_iter()
        .map(|mut rng| run_trial(n, &mut rng))
        .collect()
}

impl ThresholdStats {
    /// Wrap samples that were collected elsewhere.
    pub fn from_samples(samples: Vec<f64>) -> Result<ThresholdStats> {
        if samples.is_empty() {
            return Err(Error::InvalidArgument("need at least one sample".to_string()));
        }
        Ok(ThresholdStats { samples })
    }

    /// Run `trials` trials on an `n`×`n` grid with an entropy-seeded
    /// generator.
    pub fn run(n: usize, trials: usize) -> Result<ThresholdStats> {
        Self::run_with_rng(n, trials, &mut rng::from_seed(None))
    }

    /// Run `trials` trials one after another, drawing every site from
    /// `rng`.
    pub fn run_with_rng<R: Rng + ?Sized>(n: usize, trials: usize, rng: &mut R)
                                         -> Result<ThresholdStats> {
        check_params(n, trials)?;
        let mut samples = Vec::with_capacity(trials);
        for t in 0..trials {
            let x = run_trial(n, rng)?;
            debug!("trial {} of {}: {}", t + 1, trials, x);
            samples.push(x);
        }
        Ok(ThresholdStats { samples })
    }

    /// Run `trials` trials on the rayon pool.  Each trial gets its own
    /// jump of `rng`, so the result does not depend on the number of
    /// threads.
    pub fn run_parallel(n: usize, trials: usize, rng: &mut MyRng) -> Result<ThresholdStats> {
        check_params(n, trials)?;
        let samples = run_batch(n, rng::split(rng, trials))?;
        Ok(ThresholdStats { samples })
    }

    /// The samples, in trial order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// The number of trials.
    pub fn trials(&self) -> usize {
        self.samples.len()
    }

    /// Sample mean of the percolation threshold.
    pub fn mean(&self) -> f64 {
        self.samples.iter().sum::<f64>()/self.trials() as f64
    }

    /// Standard deviation of the percolation threshold.  This divides by
    /// the number of trials, not one less.
    pub fn stddev(&self) -> f64 {
        let mean = self.mean();
        let var = self.samples.iter().map(|x| (mean - x)*(mean - x)).sum::<f64>()
            / self.trials() as f64;
        var.sqrt()
    }

    fn half_width(&self, z: f64) -> f64 {
        z*self.stddev()/(self.trials() as f64).sqrt()
    }

    /// Lower bound of the 95% confidence interval.
    pub fn confidence_lo(&self) -> f64 {
        self.mean() - self.half_width(Z95)
    }

    /// Upper bound of the 95% confidence interval.
    pub fn confidence_hi(&self) -> f64 {
        self.mean() + self.half_width(Z95)
    }

    /// A normal-approximation confidence interval at any `level` in
    /// `(0, 1)`.
    pub fn confidence_interval(&self, level: f64) -> Result<(f64, f64)> {
        if !(level > 0.0 && level < 1.0) {
            return Err(Error::InvalidArgument(
                format!("confidence level {} is not between 0 and 1", level)));
        }
        let z = std::f64::consts::SQRT_2*statrs::function::erf::erf_inv(level);
        let mean = self.mean();
        let h = self.half_width(z);
        Ok((mean - h, mean + h))
    }
}

#[cfg(test)]
use rand::SeedableRng;

#[cfg(test)]
fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn known_statistics() {
    let s = ThresholdStats::from_samples(vec![0.5, 0.6, 0.7, 0.6]).unwrap();
    assert!(close(s.mean(), 0.6));
    // population variance: (0.01 + 0 + 0.01 + 0)/4
    assert!(close(s.stddev(), 0.005_f64.sqrt()));
    let h = 1.96*0.005_f64.sqrt()/2.0;
    assert!(close(s.confidence_lo(), 0.6 - h));
    assert!(close(s.confidence_hi(), 0.6 + h));
}

#[test]
fn one_trial_collapses_interval() {
    let s = ThresholdStats::from_samples(vec![0.59]).unwrap();
    assert_eq!(s.stddev(), 0.0);
    assert_eq!(s.confidence_lo(), s.mean());
    assert_eq!(s.confidence_hi(), s.mean());
}

#[test]
fn general_interval_matches_95() {
    let s = ThresholdStats::from_samples(vec![0.55, 0.61, 0.58, 0.6, 0.62]).unwrap();
    let (lo, hi) = s.confidence_interval(0.95).unwrap();
    assert!((lo - s.confidence_lo()).abs() < 1e-4);
    assert!((hi - s.confidence_hi()).abs() < 1e-4);
    let (lo99, hi99) = s.confidence_interval(0.99).unwrap();
    assert!(lo99 < lo && hi99 > hi);
    assert!(s.confidence_interval(1.0).is_err());
    assert!(s.confidence_interval(0.0).is_err());
}

#[test]
fn bad_parameters() {
    let mut rng = crate::rng::MyRng::seed_from_u64(0);
    assert!(matches!(ThresholdStats::run_with_rng(0, 10, &mut rng),
                     Err(Error::InvalidArgument(_))));
    assert!(matches!(ThresholdStats::run_with_rng(10, 0, &mut rng),
                     Err(Error::InvalidArgument(_))));
    assert!(matches!(ThresholdStats::run_parallel(0, 10, &mut rng),
                     Err(Error::InvalidArgument(_))));
    assert!(matches!(ThresholdStats::from_samples(Vec::new()),
                     Err(Error::InvalidArgument(_))));
}

#[test]
fn parallel_matches_sequential_streams() {
    let mut a = crate::rng::MyRng::seed_from_u64(10137);
    let mut b = crate::rng::MyRng::seed_from_u64(10137);
    let par = ThresholdStats::run_parallel(15, 12, &mut a).unwrap();
    let seq: Vec<f64> = rng::split(&mut b, 12).into_iter()
        .map(|mut r| run_trial(15, &mut r).unwrap())
        .collect();
    assert_eq!(par.samples(), &seq[..]);
}

#[test]
fn threshold_is_near_theory() {
    let mut rng = crate::rng::MyRng::seed_from_u64(2018);
    let s = ThresholdStats::run_parallel(20, 200, &mut rng).unwrap();
    println!("mean {} stddev {}", s.mean(), s.stddev());
    assert_eq!(s.trials(), 200);
    assert!(s.mean() > 0.55 && s.mean() < 0.62);
    assert!(s.confidence_lo() < s.mean() && s.mean() < s.confidence_hi());
}
