//! C-ABI boundary of the plan engine
//!
//! This is the surface a foreign editor links against (see
//! `include/plan_engine.h`). The in-crate gateway reaches the engine through
//! exactly the same functions.

pub mod envelope;
pub mod exports;

pub use envelope::{live_buffers, plan_engine_free_result, plan_engine_free_string, PlanEngineResult};
pub use exports::*;
