//! # `AnnBm` Core
//!
//! In-memory approximate nearest neighbor index built on an HNSW graph.
//!
//! Vectors are addressed by caller-assigned `u32` identifiers. Setting an
//! identifier twice overwrites its vector and relinks its node; top-k
//! queries return identifiers with distances, ascending.
//!
//! ## Features
//!
//! - **4 Distance Metrics**: Euclidean, Angular, Inner product, Hamming
//! - **Diversity heuristic** for neighbor selection with mutual pruning
//! - **Concurrent reads**, and optionally concurrent writes on distinct ids
//! - **SIMD kernels** via `wide`
//! - **Layered configuration** (`annbm.toml`, `ANNBM_*` env vars)
//!
//! ## Quick Start
//!
//! ```rust
//! use annbm_core::{AnnBm, DistanceMetric, HnswIndexParams};
//!
//! let params = HnswIndexParams::new(16, 200, DistanceMetric::Angular, true);
//! let index = AnnBm::new(3, params)?;
//!
//! index.set_value(1, &[1.0, 0.0, 0.0])?;
//! index.set_value(2, &[0.0, 1.0, 0.0])?;
//!
//! let hits = index.find_top_k(1, &[0.9, 0.1, 0.0], 50, f64::MAX)?;
//! assert_eq!(hits[0].lid, 1);
//! # Ok::<(), annbm_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
// Lossy casts are confined to distance kernels and statistics
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
// =============================================================================
// STYLISTIC LINTS - Safe to allow globally (no bug risk)
// =============================================================================
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::derive_partial_eq_without_eq)]
#![allow(clippy::redundant_pub_crate)]
#![allow(clippy::significant_drop_in_scrutinee)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod distance;
#[cfg(test)]
mod distance_tests;
pub mod engine;
#[cfg(test)]
mod engine_tests;
pub mod error;
pub mod index;
pub mod logging;
pub mod metrics;
pub mod simd;

pub use config::{AnnBmConfig, ConfigError, HnswConfig, LoggingConfig, SearchConfig};
pub use distance::DistanceMetric;
pub use engine::{AnnBm, SearchHit};
pub use error::{Error, Result};
pub use index::hnsw::{GraphStats, HnswIndexParams, MAX_LEVELS};
