//! Budget math: income allocation, savings-goal projection and the
//! dashboard recommendations derived from a budget.
//!
//! Everything here is pure and synchronous; the finance service and the
//! CLI call into it directly.

pub mod projector;
pub mod recommendations;

pub use projector::{
    allocate, allocation_report, percent_total, progress_pct, project_goal, validate_allocation,
    validate_goal, weekly_target,
};
pub use recommendations::recommendations;
