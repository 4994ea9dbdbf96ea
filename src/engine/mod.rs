//! Native document engine
//!
//! The plan-processing logic reached through the C-ABI entry points in
//! [`crate::ffi`]. Editor-side code must not call into this module directly;
//! it goes through [`crate::gateway`] like any foreign caller would.

pub mod error;
pub mod operations;
pub mod paths;
pub mod validator;

pub use error::{EngineError, EngineResult};
pub use validator::PlanValidator;
