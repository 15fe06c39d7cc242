//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: programmer-error conditions (bad catalogue, bad transitions)
//! - [`string`]: display-name and text helpers

pub mod error;
pub mod string;
