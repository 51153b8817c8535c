//! IAM token exchange adapter.

pub mod iam;

pub use iam::IamTokenExchange;
