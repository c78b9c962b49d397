//! # Axum Helpers
//!
//! Shared server plumbing for the Axum applications in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: Server setup, request tracing, health checks, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_app, create_router, health_router};
//! use core_config::{app_info, server::ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let routes = Router::new().merge(health_router(app_info!())); // Add your routes
//!     let router = create_router(routes);
//!
//!     let config = ServerConfig::default();
//!     create_app(router, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod server;

// Re-export server types
pub use server::{HealthResponse, create_app, create_router, health_router, not_found, shutdown_signal};
