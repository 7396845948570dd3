//! Model building and constraint logic for the course scheduling solver.

mod builder;
mod objective;

pub use builder::{BuilderOutcome, PhaseModelBuilder, SessionVars};
pub use objective::add_phase_objectives;
