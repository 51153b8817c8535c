//! HTTP request handlers.

pub mod achievement;
pub mod budget;
pub mod expense;
pub mod goal;
pub mod profile;
pub mod proxy;
