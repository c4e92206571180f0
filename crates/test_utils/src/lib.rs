//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! repository test suite.
//!
//! # Modules
//!
//! - `fixtures`: Sample entity types and pre-built instances
//! - `builders`: Builder patterns for test entity construction
//! - `in_memory`: A `RepositoryPort` implementation backed by a vector
//! - `database`: MongoDB test container management
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod in_memory;
pub mod database;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use in_memory::*;
pub use database::*;
pub use generators::*;
