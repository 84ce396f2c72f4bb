//! Tool configuration loading and schema definitions
//!
//! Settings that shape how declarations are resolved and reported, as
//! opposed to the declarations themselves.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
