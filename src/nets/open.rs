use serde::{Deserialize, Serialize};

use super::PetriNet;
use crate::theory::{render_objects, Compartment};
use crate::utils::errors::SimulationError;

/// An open Petri net is a Petri net (the apex) with legs, mapping each
/// boundary object to a place.  The first `dom().len()` legs are the domain
/// feet and the rest are the codomain feet.  Open nets compose by gluing
/// the codomain feet of one net onto the domain feet of the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPetriNet {
    apex: PetriNet,
    dom: Vec<Compartment>,
    cod: Vec<Compartment>,
    legs: Vec<usize>,
}

impl OpenPetriNet {
    /// Construct an open net, checking that there is one leg per boundary
    /// object and every leg lands on a place of the apex.
    pub fn new(
        apex: PetriNet,
        dom: Vec<Compartment>,
        cod: Vec<Compartment>,
        legs: Vec<usize>,
    ) -> Result<Self, SimulationError> {
        if legs.len() != dom.len() + cod.len() {
            return Err(SimulationError::ArityMismatch {
                codomain: format!("{} legs", legs.len()),
                domain: format!("{} → {}", render_objects(&dom), render_objects(&cod)),
            });
        }
        if let Some(leg) = legs.iter().find(|leg| **leg >= apex.species_count()) {
            return Err(SimulationError::SpeciesNotFound(format!("place {}", leg)));
        }
        Ok(Self {
            apex,
            dom,
            cod,
            legs,
        })
    }

    pub fn apex(&self) -> &PetriNet {
        &self.apex
    }

    pub fn into_apex(self) -> PetriNet {
        self.apex
    }

    pub fn dom(&self) -> &[Compartment] {
        &self.dom
    }

    pub fn cod(&self) -> &[Compartment] {
        &self.cod
    }

    pub fn legs(&self) -> &[usize] {
        &self.legs
    }

    pub fn dom_legs(&self) -> &[usize] {
        &self.legs[..self.dom.len()]
    }

    pub fn cod_legs(&self) -> &[usize] {
        &self.legs[self.dom.len()..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legs_must_cover_the_boundary() {
        let mut apex = PetriNet::new();
        apex.add_species("I");
        apex.add_species("R");
        assert!(OpenPetriNet::new(
            apex.clone(),
            vec![Compartment::I],
            vec![Compartment::R],
            vec![0]
        )
        .is_err());
        assert!(OpenPetriNet::new(
            apex.clone(),
            vec![Compartment::I],
            vec![Compartment::R],
            vec![0, 2]
        )
        .is_err());
        let open = OpenPetriNet::new(apex, vec![Compartment::I], vec![Compartment::R], vec![0, 1])
            .unwrap();
        assert_eq!(open.dom_legs(), &[0]);
        assert_eq!(open.cod_legs(), &[1]);
    }
}
