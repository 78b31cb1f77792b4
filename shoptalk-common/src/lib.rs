//! Shared building blocks for Shoptalk services.
//!
//! - [`config`] — environment-sourced service configuration
//! - [`error`] — unified error type with HTTP status mapping
//! - [`logging`] — tracing initialization with noise suppression

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{Error, Result};
