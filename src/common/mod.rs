//! # Common Components
//!
//! Shared utilities and data structures used by both client and server components.
//!
//! ## Modules
//!
//! - [`messages`]: Wire encoding of values and text, and the per-value server decision
//! - [`connection`]: TCP connection abstraction with value and line framing
//! - [`config`]: Configuration parsing utilities
//! - [`error`]: Error type naming the failing step
//! - [`logging`]: Logger setup shared by the binaries

pub mod config;
pub mod connection;
pub mod error;
pub mod logging;
pub mod messages;
