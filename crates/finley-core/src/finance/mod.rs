//! Per-user finance records: budgets, savings goals, expenses,
//! achievements and profile, with derived values computed locally.

pub mod service;

pub use service::FinanceService;
