//! A disjoint-set forest with path compression and union by size.
//!
//! The `parent` array holds the parent of each element (an element is
//! a root when it is its own parent) and `size` holds the number of
//! elements in the tree below each root.  For example, a parent array
//! of `0, 1, 9, 4, 9, 6, 6, 7, 8, 9` describes the forest
//!
//! ```text
//!  0   1     9       6   7   8
//!          /   \     |
//!         2     4    5
//!               |
//!               3
//! ```
//!
//! where `9` is the root of `3` and `size[9] == 4`.

use crate::error::{Error, Result};

/// A partition of `0..count` into disjoint sets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
    components: usize,
}

impl DisjointSet {
    /// Create `count` singleton sets.
    pub fn new(count: usize) -> Result<DisjointSet> {
        if count == 0 {
            return Err(Error::InvalidArgument(
                "a disjoint set needs at least one element".to_string()));
        }
        Ok(DisjointSet {
            parent: (0..count).collect(),
            size: vec![1; count],
            components: count,
        })
    }

    /// The number of elements.
    pub fn count(&self) -> usize {
        self.parent.len()
    }

    /// The number of disjoint sets remaining.
    pub fn components(&self) -> usize {
        self.components
    }

    fn check(&self, i: usize) -> Result<usize> {
        Error::check_range(i, 0, self.count() - 1)
    }

    /// Find the root of `i`, pointing each node we pass at its
    /// grandparent along the way.
    pub fn root(&mut self, i: usize) -> Result<usize> {
        let mut i = self.check(i)?;
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        Ok(i)
    }

    /// Are `p` and `q` in the same set?
    pub fn connected(&mut self, p: usize, q: usize) -> Result<bool> {
        Ok(self.root(p)? == self.root(q)?)
    }

    /// The number of elements in the set holding `i`.
    pub fn size_of(&mut self, i: usize) -> Result<usize> {
        let r = self.root(i)?;
        Ok(self.size[r])
    }

    /// Merge the sets holding `p` and `q`.  The smaller tree goes under
    /// the root of the larger one; on a tie the root of `q` goes under
    /// the root of `p`.
    pub fn union(&mut self, p: usize, q: usize) -> Result<()> {
        let i = self.root(p)?;
        let j = self.root(q)?;
        if i == j {
            return Ok(());
        }
        if self.size[i] < self.size[j] {
            self.parent[i] = j;
            self.size[j] += self.size[i];
        } else {
            self.parent[j] = i;
            self.size[i] += self.size[j];
        }
        self.components -= 1;
        Ok(())
    }

    #[cfg(test)]
    fn depth(&self, mut i: usize) -> usize {
        let mut d = 0;
        while self.parent[i] != i {
            i = self.parent[i];
            d += 1;
        }
        d
    }

    #[cfg(test)]
    fn check_sizes(&mut self) {
        let n = self.count();
        let mut counts = vec![0; n];
        for i in 0..n {
            counts[self.root(i).unwrap()] += 1;
        }
        let mut roots = 0;
        for r in 0..n {
            if self.parent[r] == r {
                assert_eq!(self.size[r], counts[r], "size of root {}", r);
                roots += 1;
            } else {
                assert_eq!(counts[r], 0);
            }
        }
        assert_eq!(roots, self.components);
    }
}

#[test]
fn zero_elements_is_an_error() {
    assert!(matches!(DisjointSet::new(0), Err(Error::InvalidArgument(_))));
}

#[test]
fn singletons() {
    let mut ds = DisjointSet::new(10).unwrap();
    assert_eq!(ds.count(), 10);
    assert_eq!(ds.components(), 10);
    for i in 0..10 {
        assert_eq!(ds.root(i).unwrap(), i);
        assert_eq!(ds.size_of(i).unwrap(), 1);
        assert!(ds.connected(i, i).unwrap());
    }
    assert!(!ds.connected(0, 1).unwrap());
}

#[test]
fn out_of_range() {
    let mut ds = DisjointSet::new(4).unwrap();
    assert!(matches!(ds.root(4),
                     Err(Error::IndexOutOfRange { index: 4, lo: 0, hi: 3 })));
    assert!(ds.union(0, 7).is_err());
    assert!(ds.connected(9, 0).is_err());
    assert!(ds.size_of(100).is_err());
    // A failed union leaves things alone.
    assert_eq!(ds.components(), 4);
}

#[test]
fn tie_goes_to_first_root() {
    let mut ds = DisjointSet::new(4).unwrap();
    ds.union(0, 1).unwrap();
    assert_eq!(ds.root(1).unwrap(), 0);
    ds.union(3, 2).unwrap();
    assert_eq!(ds.root(2).unwrap(), 3);
    ds.union(2, 1).unwrap();
    assert_eq!(ds.root(0).unwrap(), 3);
    assert_eq!(ds.size_of(0).unwrap(), 4);
    assert_eq!(ds.components(), 1);
}

#[test]
fn smaller_tree_goes_under_larger() {
    let mut ds = DisjointSet::new(5).unwrap();
    ds.union(1, 2).unwrap();
    ds.union(1, 3).unwrap();
    ds.union(4, 1).unwrap();
    assert_eq!(ds.root(4).unwrap(), 1);
    assert_eq!(ds.size_of(4).unwrap(), 4);
    ds.check_sizes();
}

#[test]
fn union_is_idempotent() {
    let mut ds = DisjointSet::new(3).unwrap();
    ds.union(0, 2).unwrap();
    let before = ds.clone();
    ds.union(2, 0).unwrap();
    ds.union(0, 2).unwrap();
    assert_eq!(ds, before);
}

#[test]
fn path_compression_flattens() {
    let mut ds = DisjointSet::new(16).unwrap();
    // Build a binomial tree of depth 4 rooted at 0.
    let mut width = 1;
    while width < 16 {
        for i in (0..16).step_by(2*width) {
            ds.union(i, i + width).unwrap();
        }
        width *= 2;
    }
    assert_eq!(ds.depth(15), 4);
    ds.root(15).unwrap();
    assert!(ds.depth(15) <= 2);
    ds.check_sizes();
}

#[test]
fn connected_is_an_equivalence() {
    use rand::{Rng, SeedableRng};
    let n = 60;
    let mut rng = crate::rng::MyRng::seed_from_u64(10137);
    let mut ds = DisjointSet::new(n).unwrap();
    // A naive labelling to compare against.
    let mut label: Vec<usize> = (0..n).collect();
    for _ in 0..40 {
        let p = rng.gen_range(0, n);
        let q = rng.gen_range(0, n);
        ds.union(p, q).unwrap();
        assert!(ds.connected(p, q).unwrap());
        let (old, new) = (label[q], label[p]);
        for l in label.iter_mut() {
            if *l == old {
                *l = new;
            }
        }
        for a in 0..n {
            for b in 0..n {
                assert_eq!(ds.connected(a, b).unwrap(), label[a] == label[b]);
            }
        }
        ds.check_sizes();
    }
    for i in 0..n {
        // union by size bounds the height by log2(n)
        assert!(ds.depth(i) <= 6);
    }
}
