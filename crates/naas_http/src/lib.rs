//! naas_http - axum/tower adapter for the chaos decision engine
//!
//! Thin transport shell around `naas_core`: a middleware layer that
//! applies decisions to live requests, an optional admin router for the
//! runtime controls, and ambient environment discovery.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use naas_core::{ChaosEngine, EngineConfig};
//! use naas_http::{ChaosLayer, admin_router, current_environment};
//!
//! let engine = Arc::new(ChaosEngine::new(
//!     EngineConfig::default(),
//!     current_environment(),
//! )?);
//!
//! let app = axum::Router::new()
//!     .route("/", axum::routing::get(|| async { "hello" }))
//!     .layer(ChaosLayer::new(Arc::clone(&engine)))
//!     .merge(admin_router(engine));
//! # Ok::<(), naas_core::ConfigError>(())
//! ```

pub mod admin;
pub mod env;
pub mod layer;

pub use admin::{AdminError, admin_router};
pub use env::{DEFAULT_ENVIRONMENT, ENV_VAR, current_environment};
pub use layer::{ChaosLayer, ChaosMiddleware};
