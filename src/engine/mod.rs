//! Engine module housing the lifecycle guard and the call protocol.
//!
//! `lifecycle` owns the single engine handle, `call` moves blocking native
//! work onto tokio's blocking pool, and `core` ties both to the callback
//! bridge and telemetry for the service façades.

mod call;
pub mod core;
pub mod lifecycle;

pub use self::core::SdkCore;
pub use lifecycle::{EngineLease, LifecycleGuard, LifecycleState};
