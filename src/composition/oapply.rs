use std::collections::{HashMap, HashSet};

use super::WiringDiagram;
use crate::nets::{Arc, Decoration, OpenPetriNet, PetriNet};
use crate::utils::errors::SimulationError;

/// Disjoint sets over the junctions of a diagram and the places of every
/// building block copy.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, element: usize) -> usize {
        let mut root = element;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = element;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a != root_b {
            // Keep the smaller index as the representative, so junctions
            // win over block places when naming species.
            let (low, high) = (root_a.min(root_b), root_a.max(root_b));
            self.parent[high] = low;
        }
    }
}

/// Append `_2`, `_3`, ... to repeated names, leaving first occurrences as-is.
/// A suffix is skipped when it would collide with a name already emitted.
fn disambiguate(names: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut emitted: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(names.len());
    for name in names {
        let count = counts.entry(name.clone()).or_insert(1);
        let mut candidate = name.clone();
        while emitted.contains(&candidate) {
            *count += 1;
            candidate = format!("{}_{}", name, count);
        }
        emitted.insert(candidate.clone());
        unique.push(candidate);
    }
    unique
}

/// Decorate every box of the diagram with its building block, and glue
/// the blocks along the junctions into one open Petri net.
///
/// Species are the classes of junctions and block places identified by
/// the box ports and merges, in order of their lowest member.  A species
/// takes the name of its lowest junction, falling back to the decoration's
/// name for its compartment when that junction is unnamed.  Repeated names
/// are suffixed `_2`, `_3`, and so on.  Transitions keep box order, so
/// the rate parameters of the composed net follow the order in which
/// processes were applied.
pub fn oapply<D: Decoration + ?Sized>(
    diagram: &WiringDiagram,
    decoration: &D,
) -> Result<OpenPetriNet, SimulationError> {
    let junction_count = diagram.junctions().len();
    let blocks: Vec<OpenPetriNet> = diagram
        .boxes()
        .iter()
        .map(|wiring_box| -> Result<OpenPetriNet, SimulationError> {
            let generator = wiring_box.generator;
            let block = decoration.decorate(generator)?;
            if block.dom() != generator.dom().as_slice()
                || block.cod() != generator.cod().as_slice()
            {
                return Err(SimulationError::DecorationMismatch {
                    generator: generator.name().to_string(),
                    legs: block.legs().len(),
                    expected: wiring_box.ports.len(),
                });
            }
            Ok(block)
        })
        .collect::<Result<_, _>>()?;

    let mut offsets = Vec::with_capacity(blocks.len());
    let mut element_count = junction_count;
    for block in &blocks {
        offsets.push(element_count);
        element_count += block.apex().species_count();
    }

    let mut classes = UnionFind::new(element_count);
    for (a, b) in diagram.links() {
        classes.union(*a, *b);
    }
    for ((wiring_box, block), offset) in diagram.boxes().iter().zip(&blocks).zip(&offsets) {
        for (junction, leg) in wiring_box.ports.iter().zip(block.legs()) {
            classes.union(*junction, offset + leg);
        }
    }

    // Number the classes in order of their representative (lowest member).
    let mut species_of_root: HashMap<usize, usize> = HashMap::new();
    let mut species_of_element = Vec::with_capacity(element_count);
    let mut names: Vec<Option<String>> = Vec::new();
    for element in 0..element_count {
        let root = classes.find(element);
        let next = species_of_root.len();
        let species = *species_of_root.entry(root).or_insert(next);
        if species == names.len() {
            names.push(None);
        }
        species_of_element.push(species);
        if names[species].is_none() {
            names[species] = element_name(diagram, &blocks, &offsets, decoration, element);
        }
    }

    let mut apex = PetriNet::new();
    for name in disambiguate(
        names
            .into_iter()
            .map(|name| name.unwrap_or_else(|| String::from("X")))
            .collect(),
    ) {
        apex.add_species(&name);
    }

    let mut transition_names = Vec::new();
    for (block, offset) in blocks.iter().zip(&offsets) {
        for transition in block.apex().transitions() {
            let relabel = |arcs: &[Arc]| -> Vec<usize> {
                arcs.iter()
                    .flat_map(|arc| {
                        std::iter::repeat(species_of_element[offset + arc.place])
                            .take(arc.multiplicity as usize)
                    })
                    .collect()
            };
            apex.add_transition_from_places(
                &transition.name,
                &relabel(&transition.inputs),
                &relabel(&transition.outputs),
            )?;
            transition_names.push(transition.name.clone());
        }
    }
    for (index, name) in disambiguate(transition_names).into_iter().enumerate() {
        apex.rename_transition(index, name);
    }

    let legs = diagram
        .inputs()
        .iter()
        .chain(diagram.outputs())
        .map(|junction| species_of_element[*junction])
        .collect();
    tracing::debug!(
        boxes = diagram.boxes().len(),
        species = apex.species_count(),
        transitions = apex.transition_count(),
        "decorated wiring diagram into an open Petri net"
    );
    OpenPetriNet::new(apex, diagram.dom(), diagram.cod(), legs)
}

/// The name an element contributes to its species: junction names first,
/// then the decoration's compartment names, then the block's own species
/// names.
fn element_name<D: Decoration + ?Sized>(
    diagram: &WiringDiagram,
    blocks: &[OpenPetriNet],
    offsets: &[usize],
    decoration: &D,
    element: usize,
) -> Option<String> {
    if let Some(junction) = diagram.junctions().get(element) {
        return Some(
            junction
                .name
                .clone()
                .unwrap_or_else(|| decoration.species_name(junction.object)),
        );
    }
    let block = offsets.iter().rposition(|offset| *offset <= element)?;
    blocks[block]
        .apex()
        .species()
        .get(element - offsets[block])
        .cloned()
}

impl WiringDiagram {
    /// Method form of [`oapply`].
    pub fn oapply<D: Decoration + ?Sized>(
        &self,
        decoration: &D,
    ) -> Result<OpenPetriNet, SimulationError> {
        oapply(self, decoration)
    }
}
