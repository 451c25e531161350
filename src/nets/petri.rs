use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;
use crate::utils::{binomial, factorial};

/// An arc between a place and a transition, with its multiplicity (the
/// number of tokens consumed or produced by one firing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arc {
    pub place: usize,
    pub multiplicity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub name: String,
    pub inputs: Vec<Arc>,
    pub outputs: Vec<Arc>,
}

impl Transition {
    /// Multiplicity of the input arc from `place`, or zero.
    pub fn input_multiplicity(&self, place: usize) -> u32 {
        multiplicity(&self.inputs, place)
    }

    /// Multiplicity of the output arc to `place`, or zero.
    pub fn output_multiplicity(&self, place: usize) -> u32 {
        multiplicity(&self.outputs, place)
    }
}

fn multiplicity(arcs: &[Arc], place: usize) -> u32 {
    arcs.iter()
        .filter(|arc| arc.place == place)
        .map(|arc| arc.multiplicity)
        .sum()
}

/// Collapse a list of (possibly repeated) places into arcs, where each
/// repetition adds one to the multiplicity.  The order of first appearance
/// is kept.
pub fn arcs_from_places(places: &[usize]) -> Vec<Arc> {
    let mut arcs: Vec<Arc> = Vec::new();
    for place in places {
        match arcs.iter_mut().find(|arc| arc.place == *place) {
            Some(arc) => arc.multiplicity += 1,
            None => arcs.push(Arc {
                place: *place,
                multiplicity: 1,
            }),
        }
    }
    arcs
}

/// A labelled Petri net, with named species (places) and named transitions.
/// Transition rates follow the law of mass action, with one rate constant
/// per transition, in transition order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PetriNet {
    species: Vec<String>,
    transitions: Vec<Transition>,
}

impl PetriNet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a species (place), returning its index.
    pub fn add_species(&mut self, name: &str) -> usize {
        self.species.push(name.to_string());
        self.species.len() - 1
    }

    /// Add a transition with explicit arcs, returning its index.  Arcs must
    /// refer to existing places and have a positive multiplicity.
    pub fn add_transition(
        &mut self,
        name: &str,
        inputs: Vec<Arc>,
        outputs: Vec<Arc>,
    ) -> Result<usize, SimulationError> {
        if let Some(arc) = inputs
            .iter()
            .chain(outputs.iter())
            .find(|arc| arc.place >= self.species.len() || arc.multiplicity == 0)
        {
            return Err(SimulationError::InvalidArc {
                transition: name.to_string(),
                place: arc.place,
            });
        }
        self.transitions.push(Transition {
            name: name.to_string(),
            inputs,
            outputs,
        });
        Ok(self.transitions.len() - 1)
    }

    /// Add a transition from lists of input and output places, where a
    /// repeated place is a higher multiplicity: `[0, 1] => [1, 1]` consumes
    /// one token from each of places 0 and 1, and produces two in place 1.
    pub fn add_transition_from_places(
        &mut self,
        name: &str,
        inputs: &[usize],
        outputs: &[usize],
    ) -> Result<usize, SimulationError> {
        self.add_transition(name, arcs_from_places(inputs), arcs_from_places(outputs))
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn species_index(&self, name: &str) -> Result<usize, SimulationError> {
        self.species
            .iter()
            .position(|species| species == name)
            .ok_or_else(|| SimulationError::SpeciesNotFound(name.to_string()))
    }

    pub fn transition_index(&self, name: &str) -> Result<usize, SimulationError> {
        self.transitions
            .iter()
            .position(|transition| transition.name == name)
            .ok_or_else(|| SimulationError::TransitionNotFound(name.to_string()))
    }

    pub(crate) fn rename_transition(&mut self, index: usize, name: String) {
        self.transitions[index].name = name;
    }

    /// The net change of every species, per transition firing (output
    /// multiplicity minus input multiplicity), indexed `[transition][species]`.
    pub fn stoichiometry(&self) -> Vec<Vec<i64>> {
        self.transitions
            .iter()
            .map(|transition| {
                (0..self.species.len())
                    .map(|place| {
                        transition.output_multiplicity(place) as i64
                            - transition.input_multiplicity(place) as i64
                    })
                    .collect()
            })
            .collect()
    }

    /// Continuous mass action rates, `k_j * prod_i u_i^m_ij`.  Negative
    /// concentrations contribute as zero.
    pub fn mass_action_rates(&self, state: &[f64], rates: &[f64]) -> Vec<f64> {
        self.transitions
            .iter()
            .zip(rates.iter())
            .map(|(transition, rate)| {
                transition.inputs.iter().fold(*rate, |acc, arc| {
                    acc * state[arc.place].max(0.0).powi(arc.multiplicity as i32)
                })
            })
            .collect()
    }

    /// Discrete mass action propensities, `k_j * prod_i C(u_i, m_ij) m_ij!`.
    /// The count of ordered ways to draw the inputs from the marking.  Equal
    /// to `mass_action_rates` when every multiplicity is one.
    pub fn propensities(&self, marking: &[f64], rates: &[f64]) -> Vec<f64> {
        self.transitions
            .iter()
            .zip(rates.iter())
            .map(|(transition, rate)| {
                transition.inputs.iter().fold(*rate, |acc, arc| {
                    acc * binomial(marking[arc.place], arc.multiplicity)
                        * factorial(arc.multiplicity)
                })
            })
            .collect()
    }

    /// The mass action vector field, `du/dt = sum_j rate_j (out_j - in_j)`,
    /// written into `derivative`.
    pub fn vector_field(&self, state: &[f64], rates: &[f64], derivative: &mut [f64]) {
        derivative.iter_mut().for_each(|value| *value = 0.0);
        self.transitions
            .iter()
            .zip(self.mass_action_rates(state, rates))
            .for_each(|(transition, flux)| {
                transition.inputs.iter().for_each(|arc| {
                    derivative[arc.place] -= flux * arc.multiplicity as f64;
                });
                transition.outputs.iter().for_each(|arc| {
                    derivative[arc.place] += flux * arc.multiplicity as f64;
                });
            });
    }

    /// Export this net to a Graphviz `.dot` string.
    pub fn to_dot(&self) -> String {
        let mut buffer: Vec<u8> = Vec::new();
        // Writes into a Vec<u8> cannot fail, and the labels are UTF-8.
        let _ = self.write_as_dot(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Species are drawn as circles and transitions as boxes.  Arc labels
    /// show multiplicities above one.
    pub fn write_as_dot(&self, output: &mut dyn Write) -> Result<(), std::io::Error> {
        writeln!(output, "digraph PetriNet {{")?;
        writeln!(output, "rankdir=LR;")?;
        for (index, name) in self.species.iter().enumerate() {
            writeln!(
                output,
                "s{} [shape=circle, label=\"{}\", style=filled, fillcolor=\"#6c9ac3\"];",
                index, name
            )?;
        }
        for (index, transition) in self.transitions.iter().enumerate() {
            writeln!(
                output,
                "t{} [shape=box, label=\"{}\", style=filled, fillcolor=\"#e28f41\"];",
                index, transition.name
            )?;
            for arc in &transition.inputs {
                writeln!(output, "s{} -> t{}{};", arc.place, index, arc_label(arc))?;
            }
            for arc in &transition.outputs {
                writeln!(output, "t{} -> s{}{};", index, arc.place, arc_label(arc))?;
            }
        }
        writeln!(output, "}}")?;
        Ok(())
    }
}

fn arc_label(arc: &Arc) -> String {
    if arc.multiplicity > 1 {
        format!(" [label=\"{}\"]", arc.multiplicity)
    } else {
        String::new()
    }
}

impl fmt::Display for PetriNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PetriNet(species: [{}])", self.species.join(", "))?;
        for transition in &self.transitions {
            let side = |arcs: &[Arc]| {
                arcs.iter()
                    .map(|arc| {
                        if arc.multiplicity > 1 {
                            format!("{}{}", arc.multiplicity, self.species[arc.place])
                        } else {
                            self.species[arc.place].clone()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" + ")
            };
            writeln!(
                f,
                "  {}: {} → {}",
                transition.name,
                side(&transition.inputs),
                side(&transition.outputs)
            )?;
        }
        Ok(())
    }
}
