//! Server infrastructure module.
//!
//! This module provides:
//! - Router setup with request tracing and a plain-text 404 fallback
//! - The liveness endpoint
//! - Graceful shutdown on SIGINT/SIGTERM
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_app, create_router, health_router};
//! use core_config::{server::ServerConfig, app_info};
//!
//! let router = create_router(routes.merge(health_router(app_info!())));
//!
//! // Start server with graceful shutdown
//! create_app(router, &ServerConfig::default()).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

// Re-export commonly used types and functions
pub use app::{create_app, create_router, not_found};
pub use health::{HealthResponse, health_router};
pub use shutdown::shutdown_signal;
