//! Far Trek Engine library.
//!
//! Server-side rules engine for the Far Trek tabletop RPG.
//!
//! ## Structure
//!
//! - `entities/` - Entity modules wrapping repository operations
//! - `use_cases/` - Rules orchestration: roll, write, announce
//! - `infrastructure/` - Port traits and their in-memory adapters
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures shared by unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
