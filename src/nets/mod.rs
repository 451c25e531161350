//! The nets module provides the Petri net representation that composed
//! models are decorated into, and that the simulator converts into ODE,
//! SDE, and jump problems.  Open Petri nets carry legs for composition, and
//! the building block templates map theory generators to open nets.

pub mod open;
pub mod petri;
pub mod templates;

pub use self::open::OpenPetriNet;
pub use self::petri::{Arc, PetriNet, Transition};
pub use self::templates::{
    exposure_petri, spontaneous_petri, transmission_petri, Decoration, EpidemiologyBlocks,
};
