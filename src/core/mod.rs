//! Core infrastructure shared by every init stage
//!
//! Terminal output and the error taxonomy.

pub mod error;
pub mod output;
