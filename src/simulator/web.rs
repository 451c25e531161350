use js_sys::Array;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::scenario::Scenario;
use crate::utils::set_panic_hook;

/// The `WebScenario` provides JS/WASM-compatible interfaces to the core
/// `Scenario` struct.  For additional insight on these methods, refer to
/// the associated `Scenario` methods.  Errors are unwrapped, instead of
/// returned, in the `WebScenario` methods.
#[wasm_bindgen]
#[derive(Serialize, Deserialize)]
pub struct WebScenario {
    scenario: Scenario,
}

impl Default for WebScenario {
    fn default() -> Self {
        Self {
            scenario: Scenario::sir_tutorial(),
        }
    }
}

#[wasm_bindgen]
impl WebScenario {
    /// The SIR tutorial scenario.
    pub fn sir_tutorial() -> Self {
        set_panic_hook();
        Self::default()
    }

    /// A JS/WASM interface for `Scenario.from_json_str`.
    pub fn post_json(scenario: &str) -> Self {
        set_panic_hook();
        Self {
            scenario: Scenario::from_json_str(scenario).unwrap(),
        }
    }

    /// A JS/WASM interface for `Scenario.from_yaml_str`.
    pub fn post_yaml(scenario: &str) -> Self {
        set_panic_hook();
        Self {
            scenario: Scenario::from_yaml_str(scenario).unwrap(),
        }
    }

    /// Get a JSON representation of the full `Scenario` configuration.
    pub fn get_json(&self) -> String {
        self.scenario.to_json().unwrap()
    }

    /// Get a YAML representation of the full `Scenario` configuration.
    pub fn get_yaml(&self) -> String {
        self.scenario.to_yaml().unwrap()
    }

    /// An interface to `Scenario.set_seed`.
    pub fn set_seed(&mut self, seed: u64) {
        self.scenario.set_seed(seed);
    }

    /// A JS/WASM interface for `Scenario.run`, which converts the runs
    /// (solver IDs, statuses, and trajectories) to a JSON string.
    pub fn run_json(&mut self) -> String {
        serde_json::to_string(&self.scenario.run().unwrap()).unwrap()
    }

    /// A JS/WASM interface for `Scenario.run_solver`, which converts the
    /// trajectory to CSV.
    pub fn run_csv(&mut self, solver_id: &str) -> String {
        self.scenario
            .run_solver(solver_id)
            .unwrap()
            .trajectory
            .to_csv_string()
            .unwrap()
    }

    /// An interface to `Scenario.status`.
    pub fn status(&self, solver_id: &str) -> String {
        self.scenario.status(solver_id).unwrap()
    }

    /// The species of the composed Petri net, in state vector order, as a
    /// JavaScript Array.
    pub fn species_js(&self) -> Array {
        self.scenario
            .compose()
            .unwrap()
            .apex()
            .species()
            .iter()
            .map(|name| JsValue::from(name.as_str()))
            .collect()
    }

    /// The composed Petri net, in Graphviz `.dot` format.
    pub fn net_dot(&self) -> String {
        self.scenario.compose().unwrap().apex().to_dot()
    }

    /// The wiring diagram of the model, in Graphviz `.dot` format.
    pub fn diagram_dot(&self) -> String {
        self.scenario.diagram().unwrap().to_dot()
    }
}
