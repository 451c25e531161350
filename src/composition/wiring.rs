use std::fmt;
use std::io::Write;

use serde::{Deserialize, Serialize};

use super::Term;
use crate::theory::{render_objects, Compartment, Generator};
use crate::utils::errors::SimulationError;

/// A handle to a junction (typed wire) of a wiring diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wire(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Junction {
    pub object: Compartment,
    #[serde(default)]
    pub name: Option<String>,
}

/// A box of the wiring diagram: one generator application, with its ports
/// attached to junctions (domain ports first, then codomain ports).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WiringBox {
    pub generator: Generator,
    pub ports: Vec<usize>,
}

/// An undirected wiring diagram over the epidemiology theory.  Junctions
/// are the compartments of the composed model, boxes are the processes
/// acting on them, and the outer ports give the composed model its domain
/// and codomain.  Built imperatively, in the style of a program:
///
/// ```
/// use epinet::composition::WiringDiagram;
/// use epinet::theory::{Compartment, Generator};
///
/// let mut diagram = WiringDiagram::new();
/// let s = diagram.input("S", Compartment::S);
/// let i = diagram.input("I", Compartment::I);
/// let infected = diagram.apply(Generator::Transmission, &[s, i]).unwrap();
/// let recovered = diagram.apply(Generator::Recovery, &infected).unwrap();
/// diagram.output(&recovered).unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiringDiagram {
    junctions: Vec<Junction>,
    boxes: Vec<WiringBox>,
    inputs: Vec<usize>,
    outputs: Vec<usize>,
    links: Vec<(usize, usize)>,
}

impl WiringDiagram {
    pub fn new() -> Self {
        Self::default()
    }

    fn junction(&mut self, object: Compartment, name: Option<String>) -> Wire {
        self.junctions.push(Junction { object, name });
        Wire(self.junctions.len() - 1)
    }

    /// Add a named outer input port, with a fresh junction behind it.
    pub fn input(&mut self, name: &str, object: Compartment) -> Wire {
        let wire = self.junction(object, Some(name.to_string()));
        self.inputs.push(wire.0);
        wire
    }

    /// Add a fresh junction not attached to any outer port.
    pub fn create(&mut self, object: Compartment) -> Wire {
        self.junction(object, None)
    }

    pub fn wire_type(&self, wire: Wire) -> Result<Compartment, SimulationError> {
        self.junctions
            .get(wire.0)
            .map(|junction| junction.object)
            .ok_or(SimulationError::WireNotFound(wire.0))
    }

    fn wire_types(&self, wires: &[Wire]) -> Result<Vec<Compartment>, SimulationError> {
        wires.iter().map(|wire| self.wire_type(*wire)).collect()
    }

    /// Apply a generator to wires matching its domain, returning fresh
    /// wires for its codomain.
    pub fn apply(
        &mut self,
        generator: Generator,
        wires: &[Wire],
    ) -> Result<Vec<Wire>, SimulationError> {
        let dom = generator.dom();
        let types = self.wire_types(wires)?;
        if types.len() != dom.len() {
            return Err(SimulationError::ArityMismatch {
                codomain: render_objects(&types),
                domain: render_objects(&dom),
            });
        }
        if let Some((expected, got)) = dom.iter().zip(types.iter()).find(|(e, g)| e != g) {
            return Err(SimulationError::WireTypeMismatch {
                expected: expected.to_string(),
                got: got.to_string(),
            });
        }
        let outputs: Vec<Wire> = generator
            .cod()
            .into_iter()
            .map(|object| self.junction(object, None))
            .collect();
        let ports = wires
            .iter()
            .chain(outputs.iter())
            .map(|wire| wire.0)
            .collect();
        self.boxes.push(WiringBox { generator, ports });
        Ok(outputs)
    }

    /// Identify wires of one type, so they become a single compartment.
    pub fn merge(&mut self, wires: &[Wire]) -> Result<Wire, SimulationError> {
        let types = self.wire_types(wires)?;
        let (first, object) = match (wires.first(), types.first()) {
            (Some(wire), Some(object)) => (*wire, *object),
            _ => {
                return Err(SimulationError::ArityMismatch {
                    codomain: render_objects(&[]),
                    domain: String::from("at least one wire"),
                })
            }
        };
        if let Some(got) = types.iter().find(|got| **got != object) {
            return Err(SimulationError::WireTypeMismatch {
                expected: object.to_string(),
                got: got.to_string(),
            });
        }
        wires
            .iter()
            .skip(1)
            .filter(|wire| wire.0 != first.0)
            .for_each(|wire| self.links.push((first.0, wire.0)));
        Ok(first)
    }

    /// Expose wires as outer output ports, in order.
    pub fn output(&mut self, wires: &[Wire]) -> Result<(), SimulationError> {
        self.wire_types(wires)?;
        self.outputs.extend(wires.iter().map(|wire| wire.0));
        Ok(())
    }

    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    pub fn boxes(&self) -> &[WiringBox] {
        &self.boxes
    }

    pub fn inputs(&self) -> &[usize] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[usize] {
        &self.outputs
    }

    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    pub fn dom(&self) -> Vec<Compartment> {
        self.inputs
            .iter()
            .map(|junction| self.junctions[*junction].object)
            .collect()
    }

    pub fn cod(&self) -> Vec<Compartment> {
        self.outputs
            .iter()
            .map(|junction| self.junctions[*junction].object)
            .collect()
    }

    /// Translate a term into a wiring diagram.  The term is type checked
    /// first; outer inputs are named after their compartment symbols.
    pub fn from_term(term: &Term) -> Result<Self, SimulationError> {
        let dom = term.dom()?;
        let mut diagram = WiringDiagram::new();
        let inputs: Vec<Wire> = dom
            .iter()
            .map(|object| diagram.input(object.symbol(), *object))
            .collect();
        let outputs = diagram.attach(term, inputs)?;
        diagram.output(&outputs)?;
        Ok(diagram)
    }

    fn attach(&mut self, term: &Term, inputs: Vec<Wire>) -> Result<Vec<Wire>, SimulationError> {
        match term {
            Term::Generator(generator) => self.apply(*generator, &inputs),
            Term::Id(_) => Ok(inputs),
            Term::Compose(terms) => terms
                .iter()
                .try_fold(inputs, |wires, term| self.attach(term, wires)),
            Term::Otimes(terms) => {
                let mut remaining = inputs.into_iter();
                let mut outputs = Vec::new();
                for term in terms {
                    let arity = term.dom()?.len();
                    let wires: Vec<Wire> = remaining.by_ref().take(arity).collect();
                    outputs.extend(self.attach(term, wires)?);
                }
                Ok(outputs)
            }
            Term::Braid(_, _) => Ok(inputs.into_iter().rev().collect()),
            Term::Mcopy(_) => Ok(vec![inputs[0], inputs[0]]),
            Term::Mmerge(_) => Ok(vec![self.merge(&inputs)?]),
            Term::Create(object) => Ok(vec![self.create(*object)]),
            Term::Delete(_) => Ok(Vec::new()),
        }
    }

    /// Export this diagram to a Graphviz `.dot` string.
    pub fn to_dot(&self) -> String {
        let mut buffer: Vec<u8> = Vec::new();
        // Writes into a Vec<u8> cannot fail.
        let _ = self.write_as_dot(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Boxes are drawn as rectangles and junctions as points.  Outer ports
    /// are drawn as double circles, and merged junctions share a dashed edge.
    pub fn write_as_dot(&self, output: &mut dyn Write) -> Result<(), std::io::Error> {
        writeln!(output, "graph WiringDiagram {{")?;
        writeln!(output, "rankdir=LR;")?;
        for (index, junction) in self.junctions.iter().enumerate() {
            let label = match &junction.name {
                Some(name) => format!("{}:{}", name, junction.object),
                None => junction.object.to_string(),
            };
            writeln!(
                output,
                "j{} [shape=point, xlabel=\"{}\"];",
                index, label
            )?;
        }
        for (index, wiring_box) in self.boxes.iter().enumerate() {
            writeln!(
                output,
                "b{} [shape=box, label=\"{}\"];",
                index, wiring_box.generator
            )?;
            for junction in &wiring_box.ports {
                writeln!(output, "b{} -- j{};", index, junction)?;
            }
        }
        for (index, junction) in self.inputs.iter().enumerate() {
            writeln!(output, "in{} [shape=doublecircle, label=\"in{}\"];", index, index)?;
            writeln!(output, "in{} -- j{};", index, junction)?;
        }
        for (index, junction) in self.outputs.iter().enumerate() {
            writeln!(
                output,
                "out{} [shape=doublecircle, label=\"out{}\"];",
                index, index
            )?;
            writeln!(output, "j{} -- out{};", junction, index)?;
        }
        for (a, b) in &self.links {
            writeln!(output, "j{} -- j{} [style=dashed];", a, b)?;
        }
        writeln!(output, "}}")?;
        Ok(())
    }
}

impl fmt::Display for WiringDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "WiringDiagram({} boxes, {} junctions): {} → {}",
            self.boxes.len(),
            self.junctions.len(),
            render_objects(&self.dom()),
            render_objects(&self.cod())
        )?;
        for wiring_box in &self.boxes {
            writeln!(f, "  {} {:?}", wiring_box.generator, wiring_box.ports)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Compartment::*;

    #[test]
    fn apply_checks_wire_types() {
        let mut diagram = WiringDiagram::new();
        let s = diagram.input("S", S);
        let i = diagram.input("I", I);
        assert!(matches!(
            diagram.apply(Generator::Transmission, &[i, s]),
            Err(SimulationError::WireTypeMismatch { .. })
        ));
        assert!(matches!(
            diagram.apply(Generator::Transmission, &[s]),
            Err(SimulationError::ArityMismatch { .. })
        ));
        assert!(matches!(
            diagram.apply(Generator::Recovery, &[Wire(42)]),
            Err(SimulationError::WireNotFound(42))
        ));
    }

    #[test]
    fn sir_term_becomes_two_boxes() {
        let diagram = WiringDiagram::from_term(&Term::sir()).unwrap();
        assert_eq!(diagram.boxes().len(), 2);
        assert_eq!(diagram.dom(), vec![S, I]);
        assert_eq!(diagram.cod(), vec![R]);
        // S, I, transmission output I, recovery output R
        assert_eq!(diagram.junctions().len(), 4);
        assert_eq!(diagram.boxes()[1].ports, vec![2, 3]);
    }

    #[test]
    fn merge_requires_one_type() {
        let mut diagram = WiringDiagram::new();
        let s = diagram.input("S", S);
        let i = diagram.input("I", I);
        assert!(diagram.merge(&[s, i]).is_err());
        assert!(diagram.merge(&[]).is_err());
        let other = diagram.create(I);
        assert_eq!(diagram.merge(&[i, other]).unwrap(), i);
        assert_eq!(diagram.links(), &[(1, 2)]);
    }

    #[test]
    fn braid_swaps_wires() {
        let term = Term::Compose(vec![
            Term::Braid(I, S),
            Term::Generator(Generator::Transmission),
        ]);
        let diagram = WiringDiagram::from_term(&term).unwrap();
        assert_eq!(diagram.dom(), vec![I, S]);
        assert_eq!(diagram.boxes()[0].ports[..2], [1, 0]);
    }

    #[test]
    fn dot_output_is_an_undirected_graph() {
        let dot = WiringDiagram::from_term(&Term::seir()).unwrap().to_dot();
        assert!(dot.starts_with("graph WiringDiagram {"));
        assert!(dot.contains("label=\"exposure\""));
        assert!(dot.contains("[style=dashed]"));
    }
}
