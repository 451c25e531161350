use epinet::composition::{compose, Term, WiringDiagram};
use epinet::nets::{Decoration, EpidemiologyBlocks, OpenPetriNet};
use epinet::theory::{Compartment, Generator, Theory};
use epinet::utils::errors::SimulationError;

#[test]
fn sir_composes_into_the_textbook_net() -> Result<(), SimulationError> {
    let open = compose(&Term::sir(), &EpidemiologyBlocks)?;
    let net = open.apex();
    assert_eq!(net.species(), &["S", "I", "R"]);
    let names: Vec<&str> = net.transitions().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["transmission", "recovery"]);
    // transmission: S + I → 2I
    let transmission = &net.transitions()[0];
    assert_eq!(transmission.input_multiplicity(0), 1);
    assert_eq!(transmission.input_multiplicity(1), 1);
    assert_eq!(transmission.output_multiplicity(1), 2);
    // recovery: I → R
    let recovery = &net.transitions()[1];
    assert_eq!(recovery.input_multiplicity(1), 1);
    assert_eq!(recovery.output_multiplicity(2), 1);
    assert_eq!(open.dom(), &[Compartment::S, Compartment::I]);
    assert_eq!(open.cod(), &[Compartment::R]);
    Ok(())
}

#[test]
fn seir_and_seird_have_the_expected_shape() -> Result<(), SimulationError> {
    let seir = compose(&Term::seir(), &EpidemiologyBlocks)?.into_apex();
    assert_eq!(seir.species(), &["S", "I", "E", "R"]);
    assert_eq!(seir.transition_count(), 3);

    let seird = compose(&Term::seird(), &EpidemiologyBlocks)?.into_apex();
    assert_eq!(seird.species(), &["S", "I", "E", "R", "D"]);
    let names: Vec<&str> = seird.transitions().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["exposure", "illness", "recovery", "death"]);
    Ok(())
}

#[test]
fn recovery_then_transmission_is_ill_typed() {
    let term = Term::Compose(vec![
        Term::generator(Generator::Recovery),
        Term::generator(Generator::Transmission),
    ]);
    assert!(matches!(
        compose(&term, &EpidemiologyBlocks),
        Err(SimulationError::ArityMismatch { .. })
    ));
}

#[test]
fn hand_wired_diagram_matches_the_term() -> Result<(), SimulationError> {
    let mut diagram = WiringDiagram::new();
    let s = diagram.input("S", Compartment::S);
    let i = diagram.input("I", Compartment::I);
    let infected = diagram.apply(Generator::Transmission, &[s, i])?;
    let recovered = diagram.apply(Generator::Recovery, &infected)?;
    diagram.output(&recovered)?;
    let by_hand = diagram.oapply(&EpidemiologyBlocks)?;
    let by_term = compose(&Term::sir(), &EpidemiologyBlocks)?;
    assert_eq!(by_hand.apex(), by_term.apex());
    assert_eq!(by_hand.legs(), by_term.legs());
    Ok(())
}

#[test]
fn wiring_rejects_mismatched_wires() {
    let mut diagram = WiringDiagram::new();
    let r = diagram.input("R", Compartment::R);
    assert!(matches!(
        diagram.apply(Generator::Recovery, &[r]),
        Err(SimulationError::WireTypeMismatch { .. })
    ));
}

/// Long compartment names, decorating with the standard blocks
struct Verbose;

impl Decoration for Verbose {
    fn decorate(&self, generator: Generator) -> Result<OpenPetriNet, SimulationError> {
        EpidemiologyBlocks.decorate(generator)
    }

    fn species_name(&self, compartment: Compartment) -> String {
        compartment.long_name().to_string()
    }
}

#[test]
fn decorations_name_unnamed_junctions() -> Result<(), SimulationError> {
    let mut diagram = WiringDiagram::new();
    let s = diagram.input("S", Compartment::S);
    let i = diagram.input("I", Compartment::I);
    let infected = diagram.apply(Generator::Transmission, &[s, i])?;
    let recovered = diagram.apply(Generator::Recovery, &infected)?;
    diagram.output(&recovered)?;
    let net = diagram.oapply(&Verbose)?.into_apex();
    assert_eq!(net.species()[0], "S");
    assert_eq!(net.species()[2], Compartment::R.long_name());
    Ok(())
}

#[test]
fn theory_lists_every_generator() -> Result<(), SimulationError> {
    let theory = Theory::epidemiology();
    assert_eq!(theory.objects().len(), 5);
    assert_eq!(theory.signatures().len(), 5);
    assert_eq!(theory.find_generator("recovery")?, Generator::Recovery);
    assert_eq!(
        theory.signature(Generator::Transmission)?.to_string(),
        "transmission: S⊗I → I"
    );
    Ok(())
}

#[test]
fn dot_exports_name_every_species_and_box() -> Result<(), SimulationError> {
    let diagram = WiringDiagram::from_term(&Term::sir())?;
    let diagram_dot = diagram.to_dot();
    assert!(diagram_dot.starts_with("graph WiringDiagram {"));
    assert!(diagram_dot.contains("label=\"transmission\""));
    let net_dot = diagram.oapply(&EpidemiologyBlocks)?.apex().to_dot();
    assert!(net_dot.starts_with("digraph PetriNet {"));
    assert!(net_dot.contains("label=\"S\""));
    assert!(net_dot.contains("t0 -> s1 [label=\"2\"];"));
    Ok(())
}
