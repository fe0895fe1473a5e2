//! stockq: stock image search queries from a creative brief
//!
//! This library provides:
//! - HTTP client for the query generation service
//! - Query-generation session state machine
//! - Per-platform grouping of generated queries
//! - Per-result interaction state (copy feedback, favorites, open in browser)
//! - Terminal rendering and CLI transports

pub mod api;
pub mod config;
pub mod interaction;
pub mod models;
pub mod platform;
pub mod render;
pub mod results;
pub mod session;
pub mod theme;
pub mod transport;

pub use api::{ApiClient, ApiError, GenerationService};
pub use config::Config;
pub use results::{group_queries, GroupedResults};
pub use session::{Session, SessionStatus, SubmitError};
