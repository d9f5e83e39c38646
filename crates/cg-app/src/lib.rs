//! ClipGuard application layer
//!
//! This crate contains the use cases driven by the command-line surface, the
//! temporary exposure scheduler and the [`AppContext`] that owns the session
//! and policy for the lifetime of the engine.

pub mod context;
pub mod deps;
pub mod exposure;
pub mod usecases;

pub use context::{AppContext, UseCases};
pub use deps::AppDeps;
pub use exposure::{ExposureError, PendingExposureJob, TemporaryExposureScheduler};
