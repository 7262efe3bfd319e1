//! Commission Common Types
//!
//! Shared types used across the commission calculator, including user
//! identifiers, monetary types, operations and calendar-week helpers.

pub mod identifiers;
pub mod monetary;
pub mod operation;
pub mod error;
pub mod time;

pub use identifiers::*;
pub use monetary::*;
pub use operation::*;
pub use error::*;
pub use time::*;
