use epinet::scenario::Scenario;
use epinet::simulator::{
    Aggregator, Callback, Ensemble, JumpSolver, OdeMethod, OdeSolver, Problem, SdeSolver,
    Services, Solve, Trajectory,
};
use epinet::utils::errors::SimulationError;

fn sir_problem() -> Problem {
    Scenario::sir_tutorial().problem().unwrap()
}

fn totals(trajectory: &Trajectory) -> Vec<f64> {
    trajectory
        .states()
        .iter()
        .map(|state| state.iter().sum())
        .collect()
}

fn non_decreasing(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}

#[test]
fn ode_conserves_the_population() -> Result<(), SimulationError> {
    let trajectory = OdeSolver::default().solve(&sir_problem(), &mut Services::default())?;
    assert!(totals(&trajectory)
        .iter()
        .all(|total| (total - 1000.0).abs() < 1.0e-6));
    let susceptible = trajectory.series("S")?;
    assert!(susceptible.windows(2).all(|pair| pair[1] <= pair[0]));
    assert_eq!(trajectory.times()[0], 0.0);
    assert_eq!(trajectory.final_time(), Some(40.0));
    Ok(())
}

#[test]
fn ode_epidemic_peaks_early() -> Result<(), SimulationError> {
    let trajectory = OdeSolver::default().solve(&sir_problem(), &mut Services::default())?;
    let (time, value) = trajectory.peak("I")?;
    // R0 = 0.005 * 990 / 0.25 = 19.8, so most of the population is infected
    // within the first two time units.
    assert!(time > 1.0 && time < 2.5);
    assert!(value > 750.0 && value < 850.0);
    let last = trajectory.final_state().unwrap();
    assert!(last[2] > 999.0);
    Ok(())
}

#[test]
fn rk4_agrees_with_dormand_prince() -> Result<(), SimulationError> {
    let problem = sir_problem().with_tspan((0.0, 5.0))?;
    let rk4 = OdeSolver::default().solve(&problem, &mut Services::default())?;
    let adaptive = OdeSolver::new(OdeMethod::dormand_prince(), None)
        .solve(&problem, &mut Services::default())?;
    let (a, b) = (rk4.final_state().unwrap(), adaptive.final_state().unwrap());
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < 0.05, "{} and {} differ", x, y);
    }
    Ok(())
}

#[test]
fn sde_stays_in_the_positive_domain() -> Result<(), SimulationError> {
    let mut solver = SdeSolver::default();
    for seed in 1..6 {
        let trajectory = solver.solve(&sir_problem(), &mut Services::seeded(seed))?;
        assert!(trajectory
            .states()
            .iter()
            .all(|state| state.iter().all(|value| *value >= 0.0)));
        assert!(non_decreasing(trajectory.times()));
        assert_eq!(trajectory.final_time(), Some(40.0));
    }
    Ok(())
}

#[test]
fn sde_is_reproducible() -> Result<(), SimulationError> {
    let mut solver = SdeSolver::new(0.01, vec![Callback::PositiveDomain], Some(1.0));
    let first = solver.solve(&sir_problem(), &mut Services::seeded(1234))?;
    let second = solver.solve(&sir_problem(), &mut Services::seeded(1234))?;
    assert_eq!(first, second);
    assert_eq!(first.len(), 41);
    Ok(())
}

#[test]
fn jump_trajectories_are_integral_and_conserving() -> Result<(), SimulationError> {
    let mut solver = JumpSolver::default();
    let trajectory = solver.solve(&sir_problem(), &mut Services::seeded(1234))?;
    assert!(trajectory.states().iter().all(|state| state
        .iter()
        .all(|value| *value >= 0.0 && value.fract() == 0.0)));
    assert!(totals(&trajectory).iter().all(|total| *total == 1000.0));
    assert!(non_decreasing(trajectory.times()));
    assert_eq!(trajectory.times()[0], 0.0);
    assert_eq!(trajectory.final_time(), Some(40.0));
    // Every event moves one individual, and the epidemic takes off.
    assert!(solver.events() > 100);
    assert_eq!(trajectory.len(), solver.events() + 2);
    Ok(())
}

#[test]
fn jump_seeds_select_the_sample_path() -> Result<(), SimulationError> {
    let mut solver = JumpSolver::default();
    let first = solver.solve(&sir_problem(), &mut Services::seeded(1234))?;
    let again = solver.solve(&sir_problem(), &mut Services::seeded(1234))?;
    let other = solver.solve(&sir_problem(), &mut Services::seeded(4321))?;
    assert_eq!(first, again);
    assert_ne!(first, other);
    Ok(())
}

#[test]
fn first_reaction_samples_the_same_process() -> Result<(), SimulationError> {
    let mut services = Services::seeded(99);
    let problem = sir_problem().with_tspan((0.0, 2.0))?;
    let direct = Ensemble::run(&mut JumpSolver::default(), &problem, &mut services, 40)?;
    let first_reaction = Ensemble::run(
        &mut JumpSolver::new(Aggregator::FirstReaction, 100_000, None),
        &problem,
        &mut services,
        40,
    )?;
    let direct_mean = direct.summary(&[2.0], 0.05)?.means()[0][2];
    let first_reaction_mean = first_reaction.summary(&[2.0], 0.05)?.means()[0][2];
    // Mean recovered at t = 2 is around 220 under either method.
    assert!((direct_mean - first_reaction_mean).abs() < 40.0);
    Ok(())
}

#[test]
fn jump_event_limit_is_an_error() {
    let mut solver = JumpSolver::new(Aggregator::Direct, 50, None);
    assert!(matches!(
        solver.solve(&sir_problem(), &mut Services::seeded(1234)),
        Err(SimulationError::EventLimitExceeded(50))
    ));
}

#[test]
fn ensembles_summarise_replications() -> Result<(), SimulationError> {
    let mut services = Services::seeded(1234);
    let ensemble = Ensemble::run(&mut SdeSolver::default(), &sir_problem(), &mut services, 20)?;
    assert_eq!(ensemble.len(), 20);
    let summary = ensemble.summary(&[0.0, 10.0, 40.0], 0.05)?;
    assert_eq!(summary.means()[0], vec![990.0, 10.0, 0.0]);
    let interval = summary.intervals()[0][0];
    assert_eq!((interval.lower(), interval.upper()), (990.0, 990.0));
    let peaks = ensemble.peaks("I")?;
    assert!(peaks.point_estimate_mean() > 700.0);
    Ok(())
}

#[test]
fn problems_validate_their_inputs() {
    let net = sir_problem().net().clone();
    assert!(matches!(
        Problem::new(net.clone(), vec![990.0, 10.0], (0.0, 40.0), vec![0.005, 0.25]),
        Err(SimulationError::InitialStateLength { .. })
    ));
    assert!(matches!(
        Problem::new(net.clone(), vec![990.0, 10.0, 0.0], (0.0, 40.0), vec![0.005]),
        Err(SimulationError::ParameterLength { .. })
    ));
    assert!(matches!(
        Problem::new(net, vec![990.0, 10.0, 0.0], (40.0, 0.0), vec![0.005, 0.25]),
        Err(SimulationError::InvalidTimeSpan(_, _))
    ));
}
