pub mod calculator;
pub mod planner;
pub mod progress;
pub mod schedule;
pub mod session;

pub use crate::domain::model::{NewLogEntry, NewPlan, Plan, RegionAddress, SavingsLogEntry};
pub use crate::domain::ports::{ConfigProvider, PlanStore, RegionLookup};
pub use crate::utils::error::Result;
