//! The theory module declares the epidemiology theory that compartmental
//! models are composed in.  The theory is small and fixed: five object
//! types (the compartments) and five generating morphisms (the processes
//! moving individuals between compartments), each with a declared domain
//! and codomain.  Composition of generators is checked against these
//! declarations in the composition module.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;

/// A compartment of the population, and an object type of the theory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Compartment {
    S,
    E,
    I,
    R,
    D,
}

impl Compartment {
    pub const ALL: [Compartment; 5] = [
        Compartment::S,
        Compartment::E,
        Compartment::I,
        Compartment::R,
        Compartment::D,
    ];

    /// The one-letter symbol, also used as the default species name.
    pub fn symbol(&self) -> &'static str {
        match self {
            Compartment::S => "S",
            Compartment::E => "E",
            Compartment::I => "I",
            Compartment::R => "R",
            Compartment::D => "D",
        }
    }

    pub fn long_name(&self) -> &'static str {
        match self {
            Compartment::S => "susceptible",
            Compartment::E => "exposed",
            Compartment::I => "infected",
            Compartment::R => "recovered",
            Compartment::D => "dead",
        }
    }
}

impl fmt::Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Compartment {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Compartment::ALL
            .iter()
            .find(|compartment| {
                compartment.symbol().eq_ignore_ascii_case(s)
                    || compartment.long_name().eq_ignore_ascii_case(s)
            })
            .copied()
            .ok_or_else(|| SimulationError::UnknownCompartment(s.to_string()))
    }
}

/// A generating morphism of the theory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Generator {
    Transmission,
    Exposure,
    Illness,
    Recovery,
    Death,
}

impl Generator {
    pub const ALL: [Generator; 5] = [
        Generator::Transmission,
        Generator::Exposure,
        Generator::Illness,
        Generator::Recovery,
        Generator::Death,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Generator::Transmission => "transmission",
            Generator::Exposure => "exposure",
            Generator::Illness => "illness",
            Generator::Recovery => "recovery",
            Generator::Death => "death",
        }
    }

    /// The declared domain (input arity) of the generator.
    pub fn dom(&self) -> Vec<Compartment> {
        match self {
            Generator::Transmission | Generator::Exposure => {
                vec![Compartment::S, Compartment::I]
            }
            Generator::Illness => vec![Compartment::E],
            Generator::Recovery | Generator::Death => vec![Compartment::I],
        }
    }

    /// The declared codomain (output arity) of the generator.
    pub fn cod(&self) -> Vec<Compartment> {
        match self {
            Generator::Transmission | Generator::Illness => vec![Compartment::I],
            Generator::Exposure => vec![Compartment::E],
            Generator::Recovery => vec![Compartment::R],
            Generator::Death => vec![Compartment::D],
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Generator {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Generator::ALL
            .iter()
            .find(|generator| generator.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| SimulationError::UnknownGenerator(s.to_string()))
    }
}

/// A generator signature: name, domain, and codomain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub generator: Generator,
    pub dom: Vec<Compartment>,
    pub cod: Vec<Compartment>,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} → {}",
            self.generator,
            render_objects(&self.dom),
            render_objects(&self.cod)
        )
    }
}

/// The signature table of a theory: its object types and generators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theory {
    name: String,
    objects: Vec<Compartment>,
    signatures: Vec<Signature>,
}

impl Theory {
    /// The infectious disease theory, with every compartment and generator.
    pub fn epidemiology() -> Self {
        Self {
            name: String::from("InfectiousDiseases"),
            objects: Compartment::ALL.to_vec(),
            signatures: Generator::ALL
                .iter()
                .map(|generator| Signature {
                    generator: *generator,
                    dom: generator.dom(),
                    cod: generator.cod(),
                })
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn objects(&self) -> &[Compartment] {
        &self.objects
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn signature(&self, generator: Generator) -> Result<&Signature, SimulationError> {
        self.signatures
            .iter()
            .find(|signature| signature.generator == generator)
            .ok_or_else(|| SimulationError::UnknownGenerator(generator.name().to_string()))
    }

    /// Resolve a generator by name, restricted to the generators of this
    /// theory.
    pub fn find_generator(&self, name: &str) -> Result<Generator, SimulationError> {
        let generator = Generator::from_str(name)?;
        self.signature(generator).map(|signature| signature.generator)
    }
}

/// Render an object list as a monoidal product, with `I₀` for the empty
/// product (the monoidal unit).
pub fn render_objects(objects: &[Compartment]) -> String {
    if objects.is_empty() {
        return String::from("I₀");
    }
    objects
        .iter()
        .map(Compartment::symbol)
        .collect::<Vec<_>>()
        .join("⊗")
}
