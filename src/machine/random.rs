//! Sources of uniform random draws for weighted selection.
//!
//! Each machine owns its source. Nothing is shared between machines, and
//! sources are not required to be thread-safe beyond `Send`.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Produces uniform values in `[0, 1)`.
///
/// Implemented for every `rand` generator, so a seeded `StdRng` makes a
/// machine's choices reproducible.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

impl<R: RngCore + Send> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Adapter turning a closure into a [`RandomSource`].
pub struct FnSource<F>(F);

impl<F> RandomSource for FnSource<F>
where
    F: FnMut() -> f64 + Send,
{
    fn next_unit(&mut self) -> f64 {
        (self.0)()
    }
}

/// Wrap a closure as a random source, e.g. to script exact draws in tests.
///
/// # Example
///
/// ```rust
/// use flying_fsm::machine::{from_fn, RandomSource};
///
/// let mut draws = [0.1, 0.9].into_iter().cycle();
/// let mut source = from_fn(move || draws.next().unwrap_or(0.0));
/// assert_eq!(source.next_unit(), 0.1);
/// assert_eq!(source.next_unit(), 0.9);
/// ```
pub fn from_fn<F>(f: F) -> FnSource<F>
where
    F: FnMut() -> f64 + Send,
{
    FnSource(f)
}

/// Generator seeded from the operating system.
pub fn entropy() -> Box<dyn RandomSource> {
    Box::new(StdRng::from_os_rng())
}

/// Deterministic generator for a given seed.
pub fn seeded(seed: u64) -> Box<dyn RandomSource> {
    Box::new(StdRng::seed_from_u64(seed))
}
