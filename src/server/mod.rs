pub mod config;
pub mod server;
pub mod session;

pub use config::{ServerConfig, ServerSettings, TextReply};
pub use server::Server;
pub use session::SessionSummary;
