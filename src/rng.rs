//! The random number generator used for trials.

use rand::SeedableRng;

/// Our random number generator.  It is serializable so a checkpoint
/// can carry its state, and it can `jump()` to hand out independent
/// streams to trials.
pub type MyRng = rand_xoshiro::Xoshiro256Plus;

/// Seed a generator, falling back to entropy when no seed is given.
pub fn from_seed(seed: Option<u64>) -> MyRng {
    match seed {
        Some(s) => MyRng::seed_from_u64(s),
        None => MyRng::from_entropy(),
    }
}

/// Hand out `count` independent generators, one per trial.  Trial `k`
/// gets `rng` advanced by `k` jumps, and `rng` itself is left advanced
/// by `count` jumps, so the streams do not depend on how trials are
/// later batched.
pub fn split(rng: &mut MyRng, count: usize) -> Vec<MyRng> {
    let mut streams = Vec::with_capacity(count);
    for _ in 0..count {
        streams.push(rng.clone());
        rng.jump();
    }
    streams
}

#[cfg(test)]
mod tests {
    use rand::{RngCore, SeedableRng};
    use super::*;

    #[test]
    fn split_is_batch_independent() {
        let mut a = MyRng::seed_from_u64(137);
        let mut b = MyRng::seed_from_u64(137);
        let mut all = split(&mut a, 5);
        let mut pieces = split(&mut b, 2);
        pieces.extend(split(&mut b, 3));
        for (x, y) in all.iter_mut().zip(pieces.iter_mut()) {
            assert_eq!(x.next_u64(), y.next_u64());
        }
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn streams_differ() {
        let mut rng = MyRng::seed_from_u64(0);
        let mut streams = split(&mut rng, 2);
        let first = streams[0].next_u64();
        assert!(first != streams[1].next_u64());
    }

    #[test]
    fn seeded_is_reproducible() {
        let mut rng1 = from_seed(Some(42));
        let mut rng2 = from_seed(Some(42));
        for _ in 0..16 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }
}
