//! Read a number of elements and then pairs `p q` from stdin.  Each pair
//! that is not yet connected gets joined, and then every element
//! connected to `p` is printed.

extern crate percmc;

use percmc::union_find::DisjointSet;

use std::io::{self, BufRead, BufWriter, Write};

fn main() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut words = Vec::new();
    for line in stdin.lock().lines() {
        for w in line?.split_whitespace() {
            words.push(w.parse::<usize>()?);
        }
    }
    let mut words = words.into_iter();
    let n = words.next().ok_or_else(|| anyhow::anyhow!("expected a number of elements"))?;
    let mut sets = DisjointSet::new(n)?;
    while let Some(p) = words.next() {
        let q = words.next().ok_or_else(|| anyhow::anyhow!("{} has no partner", p))?;
        if !sets.connected(p, q)? {
            sets.union(p, q)?;
        }
        for i in 0..n {
            if sets.connected(p, i)? {
                writeln!(out, "{}", i)?;
            }
        }
    }
    Ok(())
}
