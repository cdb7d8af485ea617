pub mod catalog;
pub mod census;
pub mod cover;
pub mod error;
pub mod evaluate;
pub mod grid;
pub mod jobs;
pub mod occupancy;
pub mod planner;
pub mod rank;
pub mod rules;
pub mod sampler;
pub mod site;
pub mod suggest;

pub use error::PlanError;
pub use evaluate::WeightedCandidate;
pub use planner::{Planner, PlannerBuilder, PlannerSettings};
pub use suggest::SuggestedLocation;
