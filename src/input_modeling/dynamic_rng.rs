use std::{cell::RefCell, rc::Rc};

use rand_core::SeedableRng;

pub trait SimulationRng: std::fmt::Debug + rand_core::RngCore {}
impl<T: std::fmt::Debug + rand_core::RngCore> SimulationRng for T {}
pub type DynRng = Rc<RefCell<dyn SimulationRng>>;

pub const DEFAULT_SEED: u64 = 42;

pub(crate) fn default_rng() -> DynRng {
    seeded_rng(DEFAULT_SEED)
}

/// A `Pcg64Mcg` stream seeded from a single integer, for reproducible
/// stochastic solves.
pub fn seeded_rng(seed: u64) -> DynRng {
    dyn_rng(rand_pcg::Pcg64Mcg::seed_from_u64(seed))
}

pub fn dyn_rng<Rng: SimulationRng + 'static>(rng: Rng) -> DynRng {
    Rc::new(RefCell::new(rng))
}
