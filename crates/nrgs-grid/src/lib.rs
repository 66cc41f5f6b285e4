//! Merit-order grid dispatch engine.
//!
//! Provides:
//! - Generation source catalog (capacity + variable cost, declaration order kept)
//! - Hour-by-hour merit-order dispatch with unserved demand
//! - Drought (hydro de-rating) and nuclear outage scenario modifiers
//! - Variable cost and lifecycle emission aggregation

pub mod aggregate;
pub mod dispatch;
pub mod drought;
pub mod error;
pub mod outage;
pub mod source;

pub use aggregate::{EmissionFactors, SourceBreakdown, breakdown, total_cost_usd, total_emissions_t};
pub use dispatch::{
    DispatchHour, DispatchOptions, DispatchResult, merit_order, merit_order_dispatch,
};
pub use drought::{DroughtResult, DroughtSeverity, apply_drought};
pub use error::{GridError, GridResult};
pub use outage::{OutagePlan, OutageResult, simulate_outage};
pub use source::{GenerationSource, SourceCatalog, SourceKind};
