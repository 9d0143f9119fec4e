//! An N×N grid of sites, each either blocked or open.
//!
//! Connectivity is kept in a [`DisjointSet`] with two extra virtual
//! sites: the virtual top (index `0`) is joined to every site of the
//! first row and the virtual bottom (index `N*N+1`) to every site of the
//! last row, so the grid percolates exactly when those two are
//! connected.  Site `(row, col)` lives at index `(row-1)*N + col`.
//!
//! Once the grid percolates, every site joined to the bottom row is
//! also joined to the virtual top through the virtual bottom
//! ("backwash").  To keep [`PercolationGrid::is_full`] honest we keep a
//! second set without the virtual bottom and ask that one instead.

use crate::error::{Error, Result};
use crate::union_find::DisjointSet;

/// A square grid of sites that can be opened one at a time.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PercolationGrid {
    n: usize,
    open: Vec<bool>,
    num_open: usize,
    /// Sites plus both virtual sites.
    sets: DisjointSet,
    /// Sites plus the virtual top only.
    top: DisjointSet,
}

impl PercolationGrid {
    /// Create an `n`×`n` grid with every site blocked.
    pub fn new(n: usize) -> Result<PercolationGrid> {
        if n == 0 {
            return Err(Error::InvalidArgument("grid size must be positive".to_string()));
        }
        let mut sets = DisjointSet::new(n*n + 2)?;
        let mut top = DisjointSet::new(n*n + 1)?;
        let bottom = n*n + 1;
        for col in 1..=n {
            sets.union(0, col)?;
            top.union(0, col)?;
            sets.union(bottom, n*(n - 1) + col)?;
        }
        Ok(PercolationGrid {
            n,
            open: vec![false; n*n],
            num_open: 0,
            sets,
            top,
        })
    }

    /// The width of the grid.
    pub fn size(&self) -> usize {
        self.n
    }

    /// How many sites have been opened.
    pub fn number_of_open_sites(&self) -> usize {
        self.num_open
    }

    /// The disjoint-set index of a site, after checking that both
    /// coordinates lie in `1..=n`.
    fn index(&self, row: usize, col: usize) -> Result<usize> {
        Error::check_range(row, 1, self.n)?;
        Error::check_range(col, 1, self.n)?;
        Ok((row - 1)*self.n + col)
    }

    fn join(&mut self, site: usize, other: usize) -> Result<()> {
        if self.open[other - 1] {
            self.sets.union(site, other)?;
            self.top.union(site, other)?;
        }
        Ok(())
    }

    /// Open site `(row, col)` and join it to whichever of its four
    /// neighbors are open.  Opening an open site does nothing.
    pub fn open(&mut self, row: usize, col: usize) -> Result<()> {
        let site = self.index(row, col)?;
        if self.open[site - 1] {
            return Ok(());
        }
        self.open[site - 1] = true;
        self.num_open += 1;
        let n = self.n;
        if row > 1 {
            self.join(site, site - n)?;
        }
        if row < n {
            self.join(site, site + n)?;
        }
        if col > 1 {
            self.join(site, site - 1)?;
        }
        if col < n {
            self.join(site, site + 1)?;
        }
        Ok(())
    }

    /// Is site `(row, col)` open?
    pub fn is_open(&self, row: usize, col: usize) -> Result<bool> {
        let site = self.index(row, col)?;
        Ok(self.open[site - 1])
    }

    /// Is site `(row, col)` open and joined to the top row through open
    /// sites?
    pub fn is_full(&mut self, row: usize, col: usize) -> Result<bool> {
        let site = self.index(row, col)?;
        Ok(self.open[site - 1] && self.top.connected(0, site)?)
    }

    /// Does an open path join the top row to the bottom row?
    ///
    /// A 1×1 grid percolates before anything is opened, because its one
    /// site is both the top and the bottom row.
    pub fn percolates(&mut self) -> Result<bool> {
        let bottom = self.n*self.n + 1;
        self.sets.connected(0, bottom)
    }
}

#[test]
fn zero_size_is_an_error() {
    assert!(matches!(PercolationGrid::new(0), Err(Error::InvalidArgument(_))));
}

#[test]
fn fresh_grid_is_blocked() {
    for &n in &[2, 3, 10] {
        let mut g = PercolationGrid::new(n).unwrap();
        assert!(!g.percolates().unwrap());
        assert_eq!(g.number_of_open_sites(), 0);
        for row in 1..=n {
            for col in 1..=n {
                assert!(!g.is_open(row, col).unwrap());
                assert!(!g.is_full(row, col).unwrap());
            }
        }
    }
}

#[test]
fn single_site_percolates_immediately() {
    let mut g = PercolationGrid::new(1).unwrap();
    assert!(g.percolates().unwrap());
    assert!(!g.is_full(1, 1).unwrap());
    g.open(1, 1).unwrap();
    assert!(g.is_full(1, 1).unwrap());
    assert!(g.percolates().unwrap());
}

#[test]
fn out_of_range_sites() {
    for &n in &[1, 2, 5, 20] {
        let mut g = PercolationGrid::new(n).unwrap();
        for &(row, col) in &[(0, 1), (n + 1, 1), (1, 0), (1, n + 1), (0, 0), (n + 1, n + 1)] {
            assert!(matches!(g.open(row, col), Err(Error::IndexOutOfRange { .. })));
            assert!(matches!(g.is_open(row, col), Err(Error::IndexOutOfRange { .. })));
            assert!(matches!(g.is_full(row, col), Err(Error::IndexOutOfRange { .. })));
        }
        assert_eq!(g.number_of_open_sites(), 0);
    }
}

#[test]
fn open_is_idempotent() {
    let mut once = PercolationGrid::new(4).unwrap();
    let mut twice = PercolationGrid::new(4).unwrap();
    for &(r, c) in &[(1, 1), (2, 1), (2, 2), (4, 4)] {
        once.open(r, c).unwrap();
        twice.open(r, c).unwrap();
        twice.open(r, c).unwrap();
    }
    assert_eq!(once.number_of_open_sites(), 4);
    assert_eq!(twice.number_of_open_sites(), 4);
    for row in 1..=4 {
        for col in 1..=4 {
            assert_eq!(once.is_open(row, col).unwrap(), twice.is_open(row, col).unwrap());
            assert_eq!(once.is_full(row, col).unwrap(), twice.is_full(row, col).unwrap());
        }
    }
    assert_eq!(once.percolates().unwrap(), twice.percolates().unwrap());
}

#[test]
fn diagonal_does_not_connect() {
    let mut g = PercolationGrid::new(2).unwrap();
    g.open(1, 1).unwrap();
    g.open(2, 2).unwrap();
    assert!(!g.percolates().unwrap());
    assert!(!g.is_full(2, 2).unwrap());
    g.open(2, 1).unwrap();
    assert!(g.percolates().unwrap());
    assert!(g.is_full(2, 2).unwrap());
}

#[test]
fn no_backwash() {
    let mut g = PercolationGrid::new(3).unwrap();
    for row in 1..=3 {
        g.open(row, 1).unwrap();
    }
    assert!(g.percolates().unwrap());
    // An isolated bottom site is open but not full, even though it is
    // joined to the virtual bottom.
    g.open(3, 3).unwrap();
    assert!(g.is_open(3, 3).unwrap());
    assert!(!g.is_full(3, 3).unwrap());
    g.open(3, 2).unwrap();
    assert!(g.is_full(3, 3).unwrap());
}

#[test]
fn percolation_is_monotone() {
    use rand::{Rng, SeedableRng};
    let n = 8;
    let mut rng = crate::rng::MyRng::seed_from_u64(7);
    let mut g = PercolationGrid::new(n).unwrap();
    let mut seen = false;
    for _ in 0..200 {
        g.open(rng.gen_range(1, n + 1), rng.gen_range(1, n + 1)).unwrap();
        let now = g.percolates().unwrap();
        assert!(now || !seen);
        seen = now;
        // Any full site in the bottom row means we percolate.
        for col in 1..=n {
            if g.is_full(n, col).unwrap() {
                assert!(now);
            }
        }
    }
}
