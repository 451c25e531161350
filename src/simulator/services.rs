use serde::{Deserialize, Serialize};

use crate::input_modeling::dynamic_rng::{default_rng, seeded_rng, DynRng, DEFAULT_SEED};

/// The simulator provides a seeded random number generator to solvers
/// during a solve.  Stochastic solvers draw every variate from this one
/// stream, so a seed fully determines a sample path.  Only the seed is
/// serialized; deserializing restarts the stream from it.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ServicesRepr")]
pub struct Services {
    #[serde(skip_serializing)]
    pub(crate) global_rng: DynRng,
    seed: u64,
}

#[derive(Deserialize)]
struct ServicesRepr {
    #[serde(default = "default_seed")]
    seed: u64,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl From<ServicesRepr> for Services {
    fn from(repr: ServicesRepr) -> Self {
        Services::seeded(repr.seed)
    }
}

impl Default for Services {
    fn default() -> Self {
        Self {
            global_rng: default_rng(),
            seed: DEFAULT_SEED,
        }
    }
}

impl Services {
    pub fn seeded(seed: u64) -> Self {
        Self {
            global_rng: seeded_rng(seed),
            seed,
        }
    }

    pub fn global_rng(&self) -> DynRng {
        self.global_rng.clone()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the random stream from a new seed.
    pub fn reseed(&mut self, seed: u64) {
        self.global_rng = seeded_rng(seed);
        self.seed = seed;
    }
}
