//! Reactor transient engine.
//!
//! Provides:
//! - Six-group delayed-neutron data and per-variant reactor parameters
//! - Lumped fuel/coolant thermal feedback model
//! - Reactivity insertion profiles (step, load-following ramp, constant, closures)
//! - Point-kinetics model integrated with a stiff BDF solver
//! - Step-insertion and load-following transient scenarios

pub mod error;
pub mod feedback;
pub mod kinetics;
pub mod params;
pub mod reactivity;
pub mod scenarios;
pub mod transient;

pub use error::{ReactorError, ReactorResult};
pub use feedback::ThermalFeedback;
pub use kinetics::{
    InitialPrecursors, PointKinetics, STATE_DIM, TransientOptions, simulate, simulate_named,
};
pub use params::{
    DelayedNeutronGroups, KEEPIN_U235, NUM_GROUPS, ReactorCatalog, ReactorKind, ReactorTypeConfig,
    ThermalParams,
};
pub use reactivity::{ConstantReactivity, LoadFollowingRamp, ReactivityProfile, StepInsertion};
pub use scenarios::{
    LOAD_FOLLOWING_SPAN, STEP_INSERTION_SPAN, load_following, step_reactivity_insertion,
};
pub use transient::{TransientMetrics, TransientResult, TransientSample};
