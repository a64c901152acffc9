use crate::RandSource;
use ::rand::{Rng, rng};

/// Draws from `rand`'s thread-local CSPRNG.
///
/// Backs the random counter and content type of [`crate::Components`] when
/// those fields are left out. The generator is looked up on every call and
/// never stored, so this zero-sized handle is `Send + Sync` even though the
/// generator itself is not.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}
