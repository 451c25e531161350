use std::fs::File;

use epinet::composition::Term;
use epinet::scenario::Scenario;
use epinet::simulator::SerializableSolver;
use epinet::utils::errors::SimulationError;

const SEIR_YAML: &str = r#"
name: seir
model:
  compose:
    - otimes:
        - id: [S]
        - mcopy: I
    - otimes:
        - generator: exposure
        - id: [I]
    - otimes:
        - generator: illness
        - id: [I]
    - mmerge: I
    - generator: recovery
initial: {S: 990, E: 0, I: 10, R: 0}
parameters: {exposure: 0.005, illness: 0.5, recovery: 0.25}
tspan: [0, 60]
seed: 7
solvers:
  - id: adaptive
    type: OdeSolver
    method:
      dormandPrince: {rtol: 0.000001, atol: 0.00000001, initialDt: 0.01}
  - id: gillespie
    type: JumpSolver
    maxEvents: 100000
"#;

#[test]
fn yaml_scenarios_load_and_run() -> Result<(), SimulationError> {
    let mut scenario = Scenario::from_yaml_str(SEIR_YAML)?;
    assert_eq!(scenario.model(), &Term::seir());
    assert_eq!(scenario.seed(), 7);
    let types: Vec<&str> = scenario.solvers().iter().map(|s| s.get_type()).collect();
    assert_eq!(types, vec!["OdeSolver", "JumpSolver"]);

    let problem = scenario.problem()?;
    assert_eq!(problem.u0(), &[990.0, 10.0, 0.0, 0.0]);
    let runs = scenario.run()?;
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].id, "adaptive");
    for run in &runs {
        let last = run.trajectory.final_state().unwrap();
        assert!((last.iter().sum::<f64>() - 1000.0).abs() < 1.0e-6);
    }
    Ok(())
}

#[test]
fn yaml_round_trip_preserves_model_and_solvers() -> Result<(), SimulationError> {
    let scenario = Scenario::sir_tutorial();
    let yaml = scenario.to_yaml()?;
    let restored = Scenario::from_yaml_str(&yaml)?;
    assert_eq!(restored.model(), scenario.model());
    assert_eq!(restored.tspan(), (0.0, 40.0));
    assert_eq!(restored.seed(), 1234);
    let ids: Vec<&str> = restored.solvers().iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec!["ode", "sde", "jump"]);
    assert_eq!(restored.to_yaml()?, yaml);
    Ok(())
}

#[test]
fn json_round_trip_runs_identically() -> Result<(), SimulationError> {
    let mut scenario = Scenario::sir_tutorial();
    let mut restored = Scenario::from_json_str(&scenario.to_json()?)?;
    let (original, copy) = (scenario.run()?, restored.run()?);
    for (a, b) in original.iter().zip(copy.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.trajectory, b.trajectory);
    }
    Ok(())
}

#[test]
fn unknown_solver_types_are_rejected() {
    let yaml = SEIR_YAML.replace("type: OdeSolver", "type: EulerSolver");
    match Scenario::from_yaml_str(&yaml) {
        Err(SimulationError::YAMLError(error)) => {
            assert!(error.to_string().contains("unknown variant `EulerSolver`"));
        }
        other => panic!("expected a YAML error, got {:?}", other),
    }
}

#[test]
fn invalid_solver_fields_report_the_cause() {
    let yaml = SEIR_YAML.replace("maxEvents: 100000", "maxEvents: lots");
    match Scenario::from_yaml_str(&yaml) {
        Err(SimulationError::YAMLError(error)) => {
            let message = error.to_string();
            assert!(message.contains("invalid configuration for solver type `JumpSolver`"));
            assert!(message.contains("invalid type"));
        }
        other => panic!("expected a YAML error, got {:?}", other),
    }
}

#[test]
fn unknown_species_are_rejected() {
    let yaml = SEIR_YAML.replace("E: 0", "Q: 0");
    let scenario = Scenario::from_yaml_str(&yaml).unwrap();
    assert!(matches!(
        scenario.problem(),
        Err(SimulationError::SpeciesNotFound(name)) if name == "Q"
    ));
}

#[test]
fn scenarios_load_from_files() -> Result<(), SimulationError> {
    let directory = tempfile::tempdir()?;
    let yaml_path = directory.path().join("seir.yaml");
    std::fs::write(&yaml_path, SEIR_YAML)?;
    let from_yaml = Scenario::from_path(&yaml_path)?;
    assert_eq!(from_yaml.name(), "seir");

    let json_path = directory.path().join("seir.json");
    std::fs::write(&json_path, from_yaml.to_json()?)?;
    let from_json = Scenario::from_path(&json_path)?;
    assert_eq!(from_json.model(), from_yaml.model());
    Ok(())
}

#[test]
fn trajectories_write_csv_files() -> Result<(), SimulationError> {
    let mut scenario = Scenario::sir_tutorial();
    scenario.set_samples(Some(1.0));
    let run = scenario.run_solver("ode")?;
    let directory = tempfile::tempdir()?;
    let path = directory.path().join("ode.csv");
    run.trajectory.write_csv(File::create(&path)?)?;

    let mut reader = csv::Reader::from_path(&path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    assert_eq!(headers, vec!["t", "S", "I", "R"]);
    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
    assert_eq!(rows.len(), 41);
    assert_eq!(&rows[0][1], "990");
    Ok(())
}
