pub mod client;
pub mod common;
pub mod server;

pub use client::Client;
pub use common::config::ExchangeMode;
pub use common::error::ExchangeError;
pub use server::Server;
