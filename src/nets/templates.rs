//! The literal building blocks that theory generators are decorated with.
//! Each block is a tiny open Petri net with a single transition.

use super::{OpenPetriNet, PetriNet};
use crate::theory::{Compartment, Generator};
use crate::utils::errors::SimulationError;

/// Two places and one transition `[0] → [1]`, with legs `[0] | [1]`.  One
/// individual moves spontaneously from `from` to `to`.
pub fn spontaneous_petri(
    from: Compartment,
    to: Compartment,
    name: &str,
) -> Result<OpenPetriNet, SimulationError> {
    let mut apex = PetriNet::new();
    let source = apex.add_species(from.symbol());
    let target = apex.add_species(to.symbol());
    apex.add_transition_from_places(name, &[source], &[target])?;
    OpenPetriNet::new(apex, vec![from], vec![to], vec![source, target])
}

/// Two places and one transition `[0, 1] → [1, 1]`, with legs
/// `[0], [1] | [1]`.  A contact between a susceptible and an infected
/// individual leaves two infected individuals.
pub fn transmission_petri(
    susceptible: Compartment,
    infected: Compartment,
    name: &str,
) -> Result<OpenPetriNet, SimulationError> {
    let mut apex = PetriNet::new();
    let s = apex.add_species(susceptible.symbol());
    let i = apex.add_species(infected.symbol());
    apex.add_transition_from_places(name, &[s, i], &[i, i])?;
    OpenPetriNet::new(apex, vec![susceptible, infected], vec![infected], vec![s, i, i])
}

/// Three places and one transition `[0, 1] → [2, 1]`, with legs
/// `[0], [1] | [2]`.  A contact between a susceptible and an infected
/// individual leaves the susceptible one exposed.
pub fn exposure_petri(
    susceptible: Compartment,
    infected: Compartment,
    exposed: Compartment,
    name: &str,
) -> Result<OpenPetriNet, SimulationError> {
    let mut apex = PetriNet::new();
    let s = apex.add_species(susceptible.symbol());
    let i = apex.add_species(infected.symbol());
    let e = apex.add_species(exposed.symbol());
    apex.add_transition_from_places(name, &[s, i], &[e, i])?;
    OpenPetriNet::new(apex, vec![susceptible, infected], vec![exposed], vec![s, i, e])
}

/// A `Decoration` is the lookup table from the theory to building blocks:
/// every generator is mapped to an open Petri net whose legs match the
/// generator's declared domain and codomain, and every object is mapped to
/// a single named place.
pub trait Decoration {
    fn decorate(&self, generator: Generator) -> Result<OpenPetriNet, SimulationError>;

    fn species_name(&self, compartment: Compartment) -> String {
        compartment.symbol().to_string()
    }
}

/// The standard decoration of the epidemiology theory.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpidemiologyBlocks;

impl Decoration for EpidemiologyBlocks {
    fn decorate(&self, generator: Generator) -> Result<OpenPetriNet, SimulationError> {
        let name = generator.name();
        match generator {
            Generator::Transmission => transmission_petri(Compartment::S, Compartment::I, name),
            Generator::Exposure => {
                exposure_petri(Compartment::S, Compartment::I, Compartment::E, name)
            }
            Generator::Illness => spontaneous_petri(Compartment::E, Compartment::I, name),
            Generator::Recovery => spontaneous_petri(Compartment::I, Compartment::R, name),
            Generator::Death => spontaneous_petri(Compartment::I, Compartment::D, name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_block_matches_its_signature() {
        let blocks = EpidemiologyBlocks;
        for generator in Generator::ALL.iter() {
            let open = blocks.decorate(*generator).unwrap();
            assert_eq!(open.dom(), generator.dom().as_slice());
            assert_eq!(open.cod(), generator.cod().as_slice());
            assert_eq!(open.apex().transition_count(), 1);
            assert_eq!(open.apex().transitions()[0].name, generator.name());
        }
    }

    #[test]
    fn transmission_block_literal() {
        let open = transmission_petri(Compartment::S, Compartment::I, "transmission").unwrap();
        assert_eq!(open.apex().species(), &["S".to_string(), "I".to_string()]);
        assert_eq!(open.legs(), &[0, 1, 1]);
        assert_eq!(open.apex().stoichiometry(), vec![vec![-1, 1]]);
    }

    #[test]
    fn exposure_block_literal() {
        let open = exposure_petri(Compartment::S, Compartment::I, Compartment::E, "exposure")
            .unwrap();
        assert_eq!(open.apex().species_count(), 3);
        assert_eq!(open.legs(), &[0, 1, 2]);
        assert_eq!(open.apex().stoichiometry(), vec![vec![-1, 0, 1]]);
    }
}
