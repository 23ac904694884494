//! # Client Components
//!
//! ## Core Client ([`client`])
//! Owns the connection and performs one exchange per call: a value and its
//! successor, or a line and its answer.
//!
//! ## Console ([`console`])
//! Prompts the user, feeds the core client and prints what comes back.

pub mod client;
pub mod console;

pub use client::Client;
