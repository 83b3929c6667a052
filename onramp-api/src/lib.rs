//! Onramp API Library
//!
//! This module exposes the core functionality of the onramp onboarding
//! service for use by tests and external integrations.

// Allow dead code for library modules that may be used by API consumers
#![allow(dead_code)]

// Core modules
pub mod config;
pub mod error;
pub mod extract;

// Application state
pub mod state;
pub use state::AppState;

// Authentication
pub mod middleware;

// Cluster integration
pub mod openshift;

// Quota generation
pub mod quota;

// Graceful shutdown handling
pub mod shutdown;
