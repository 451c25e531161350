use thiserror::Error;

/// `SimulationError` enumerates all possible errors returned by epinet
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Represents a generator name that is not part of the theory
    #[error("The generator `{0}` is not part of the theory")]
    UnknownGenerator(String),

    /// Represents a compartment name that is not part of the theory
    #[error("The compartment `{0}` is not part of the theory")]
    UnknownCompartment(String),

    /// Represents a species (place) lookup that failed against a Petri net
    #[error("The species `{0}` cannot be found in the Petri net")]
    SpeciesNotFound(String),

    /// Represents a transition lookup that failed against a Petri net
    #[error("The transition `{0}` cannot be found in the Petri net")]
    TransitionNotFound(String),

    /// Represents an attempted composition where the codomain of the first
    /// morphism does not match the domain of the second
    #[error("Cannot compose: codomain {codomain} does not match domain {domain}")]
    ArityMismatch { codomain: String, domain: String },

    /// Represents a wire attached to a port of a different object type
    #[error("Wire of type {got} cannot attach to a port of type {expected}")]
    WireTypeMismatch { expected: String, got: String },

    /// Represents a wire handle that does not belong to the wiring diagram
    #[error("Wire {0} does not exist in the wiring diagram")]
    WireNotFound(usize),

    /// Represents a building block whose legs disagree with the declared
    /// arity of its generator
    #[error("The building block for `{generator}` has {legs} legs, but its signature requires {expected}")]
    DecorationMismatch {
        generator: String,
        legs: usize,
        expected: usize,
    },

    /// Represents an arc to a place that does not exist, or with a zero
    /// multiplicity
    #[error("Transition `{transition}` has an invalid arc to place {place}")]
    InvalidArc { transition: String, place: usize },

    /// Represents an initial state vector of the wrong length
    #[error("The initial state has {got} entries, but the net has {expected} species")]
    InitialStateLength { expected: usize, got: usize },

    /// Represents a parameter vector of the wrong length
    #[error("There are {got} parameters, but the net has {expected} transitions")]
    ParameterLength { expected: usize, got: usize },

    /// Represents a time span that is empty, reversed, or not finite
    #[error("The time span ({0}, {1}) is invalid")]
    InvalidTimeSpan(f64, f64),

    /// Represents a negative or non-finite initial value or parameter
    #[error("The value {value} for `{name}` must be finite and non-negative")]
    InvalidValue { name: String, value: f64 },

    /// Represents a named value that was required but not supplied
    #[error("No value was supplied for `{0}`")]
    MissingValue(String),

    /// Represents a solver configuration that cannot be used
    #[error("An invalid solver configuration was encountered: {0}")]
    InvalidSolverConfiguration(String),

    /// Represents a jump process started from a non-integral marking
    #[error("Jump processes require an integral marking, but `{species}` is {value}")]
    NonIntegerMarking { species: String, value: f64 },

    /// Represents a jump process that fired more events than allowed
    #[error("The jump process exceeded the limit of {0} events")]
    EventLimitExceeded(usize),

    /// Represents an adaptive step size that shrank below the usable minimum
    #[error("The step size underflowed at t = {0}")]
    StepSizeUnderflow(f64),

    /// Represents a state that became NaN or infinite during integration
    #[error("The state became non-finite at t = {0}")]
    NonFiniteState(f64),

    /// Represents a solver lookup by id that failed
    #[error("A specified solver cannot be found in the scenario")]
    SolverNotFound,

    /// Represents an empty sample used in output analysis
    #[error("Output analysis requires at least one sample point")]
    EmptySample,

    /// Represents a failed conversion to num-traits Float
    #[error("Failed to convert to a Float value")]
    FloatConvError,

    /// Represents a scenario file whose format cannot be determined
    #[error("Unsupported scenario format for `{0}`, expected .yaml, .yml, or .json")]
    UnsupportedFormat(String),

    /// Transparent serde_json errors
    #[error(transparent)]
    JSONError(#[from] serde_json::error::Error),

    /// Transparent serde_yaml errors
    #[error(transparent)]
    YAMLError(#[from] serde_yaml::Error),

    /// Transparent csv errors
    #[error(transparent)]
    CSVError(#[from] csv::Error),

    /// Transparent I/O errors
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent Exponential distribution errors
    #[error(transparent)]
    ExpError(#[from] rand_distr::ExpError),

    /// Transparent Normal distribution errors
    #[error(transparent)]
    NormalError(#[from] rand_distr::NormalError),
}
