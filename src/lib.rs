pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{PostalCodeLookup, RestPlanStore};
pub use config::AppConfig;
pub use crate::core::calculator::{plan_for_duration, plan_from_surplus, PlanInput, PlanOutcome};
pub use crate::core::planner::{PlanRequest, Planner};
pub use crate::core::session::PlanSession;
pub use utils::error::{PlannerError, Result};
