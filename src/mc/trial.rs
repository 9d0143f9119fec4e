//! A single percolation trial: open random blocked sites until the
//! grid percolates.

use crate::error::{Error, Result};
use crate::percolation::PercolationGrid;

use rand::Rng;

/// One trial on a fresh grid.
#[derive(Debug, Clone)]
pub struct Trial {
    /// The grid being filled.
    pub grid: PercolationGrid,
}

impl Trial {
    /// Start a trial on an `n`×`n` blocked grid.
    pub fn new(n: usize) -> Result<Trial> {
        Ok(Trial {
            grid: PercolationGrid::new(n)?,
        })
    }

    /// The number of sites this trial has opened.
    pub fn opened(&self) -> usize {
        self.grid.number_of_open_sites()
    }

    /// Pick sites uniformly until we find a blocked one, open it, and
    /// return its `(row, col)`.
    pub fn open_random_site<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(usize, usize)> {
        let n = self.grid.size();
        if self.grid.number_of_open_sites() == n*n {
            return Err(Error::NoBlockedSites);
        }
        loop {
            let draw = rng.gen_range(0, n*n);
            let (row, col) = (draw / n + 1, draw % n + 1);
            if !self.grid.is_open(row, col)? {
                self.grid.open(row, col)?;
                return Ok((row, col));
            }
        }
    }

    /// Open sites until the grid percolates, and return the fraction of
    /// sites that were opened.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<f64> {
        while !self.grid.percolates()? {
            self.open_random_site(rng)?;
        }
        let n = self.grid.size();
        Ok(self.opened() as f64/(n*n) as f64)
    }
}

/// Run one trial on an `n`×`n` grid and return its percolation fraction.
pub fn run_trial<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<f64> {
    Trial::new(n)?.run(rng)
}

#[cfg(test)]
use rand::SeedableRng;

#[test]
fn random_sites_are_distinct() {
    let n = 5;
    let mut rng = crate::rng::MyRng::seed_from_u64(10137);
    let mut trial = Trial::new(n).unwrap();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..n*n {
        let (row, col) = trial.open_random_site(&mut rng).unwrap();
        assert!(row >= 1 && row <= n && col >= 1 && col <= n);
        assert!(seen.insert((row, col)));
    }
    assert_eq!(trial.opened(), n*n);
    assert!(matches!(trial.open_random_site(&mut rng), Err(Error::NoBlockedSites)));
}

#[test]
fn trial_stops_at_percolation() {
    let mut rng = crate::rng::MyRng::seed_from_u64(1);
    for &n in &[2, 3, 10, 30] {
        let mut trial = Trial::new(n).unwrap();
        let fraction = trial.run(&mut rng).unwrap();
        assert!(trial.grid.percolates().unwrap());
        assert_eq!(fraction, trial.opened() as f64/(n*n) as f64);
        // We need at least a full column.
        assert!(trial.opened() >= n);
        assert!(fraction > 0.0 && fraction <= 1.0);
    }
}

#[test]
fn single_site_trial_opens_nothing() {
    let mut rng = crate::rng::MyRng::seed_from_u64(1);
    assert_eq!(run_trial(1, &mut rng).unwrap(), 0.0);
}

#[test]
fn trial_rejects_empty_grid() {
    let mut rng = crate::rng::MyRng::seed_from_u64(1);
    assert!(matches!(run_trial(0, &mut rng), Err(Error::InvalidArgument(_))));
}

#[test]
fn seeded_trials_repeat() {
    let mut a = crate::rng::MyRng::seed_from_u64(99);
    let mut b = crate::rng::MyRng::seed_from_u64(99);
    for _ in 0..5 {
        assert_eq!(run_trial(12, &mut a).unwrap(), run_trial(12, &mut b).unwrap());
    }
}
