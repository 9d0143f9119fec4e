extern crate percmc;

use percmc::mc::stats::ThresholdStats;
use percmc::percolation::PercolationGrid;
use percmc::rng::MyRng;
use percmc::Error;

use rand::SeedableRng;

#[test]
fn twenty_by_twenty() {
    let mut grid = PercolationGrid::new(20).unwrap();
    assert!(!grid.is_open(2, 2).unwrap());
    assert!(!grid.is_full(2, 3).unwrap());
    grid.open(2, 3).unwrap();
    grid.open(1, 3).unwrap();
    grid.open(2, 2).unwrap();
    assert!(grid.is_full(2, 3).unwrap());
    assert!(grid.is_open(2, 2).unwrap());
    assert!(!grid.percolates().unwrap());
}

#[test]
fn three_by_three_column() {
    let mut grid = PercolationGrid::new(3).unwrap();
    grid.open(1, 2).unwrap();
    grid.open(2, 2).unwrap();
    assert!(!grid.percolates().unwrap());
    grid.open(3, 2).unwrap();
    assert!(grid.percolates().unwrap());
    for row in 1..=3 {
        assert!(grid.is_full(row, 2).unwrap());
    }
}

#[test]
fn one_by_one() {
    let mut grid = PercolationGrid::new(1).unwrap();
    assert!(grid.percolates().unwrap());
    assert!(matches!(grid.open(2, 1), Err(Error::IndexOutOfRange { .. })));
}

#[test]
fn winding_path() {
    let mut grid = PercolationGrid::new(5).unwrap();
    let path = [(1, 1), (2, 1), (2, 2), (2, 3), (3, 3), (4, 3), (4, 4), (4, 5), (5, 5)];
    for (i, &(row, col)) in path.iter().enumerate() {
        assert!(!grid.percolates().unwrap(), "percolated early at step {}", i);
        grid.open(row, col).unwrap();
        assert!(grid.is_full(row, col).unwrap());
    }
    assert!(grid.percolates().unwrap());
    assert_eq!(grid.number_of_open_sites(), path.len());
    assert!(!grid.is_full(5, 1).unwrap());
}

#[test]
fn sequential_threshold() {
    let mut rng = MyRng::seed_from_u64(20);
    let stats = ThresholdStats::run_with_rng(20, 100, &mut rng).unwrap();
    println!("mean = {}, std = {}", stats.mean(), stats.stddev());
    assert!(stats.mean() > 0.55 && stats.mean() < 0.62);
    assert!(stats.stddev() > 0.0);
}
