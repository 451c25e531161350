//! The composition module wires theory generators together into composite
//! models.  `Term` is the algebraic (expression) form of a composite, and
//! `WiringDiagram` the combinatorial form; `oapply` decorates a diagram
//! with building blocks and glues them into a single open Petri net.

pub mod oapply;
pub mod term;
pub mod wiring;

pub use self::oapply::oapply;
pub use self::term::Term;
pub use self::wiring::{Junction, Wire, WiringBox, WiringDiagram};

use crate::nets::{Decoration, OpenPetriNet};
use crate::utils::errors::SimulationError;

/// Translate a term into a wiring diagram, and decorate it.
pub fn compose<D: Decoration + ?Sized>(
    term: &Term,
    decoration: &D,
) -> Result<OpenPetriNet, SimulationError> {
    WiringDiagram::from_term(term)?.oapply(decoration)
}
