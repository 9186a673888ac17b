//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters and gauges via the `metrics` facade)
//!
//! Consumers:
//!     → whatever subscriber / recorder the host application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a metrics exporter; hosts pick one
//! - Secrets (private keys, gateway password) never reach a log field

pub mod logging;
pub mod metrics;
