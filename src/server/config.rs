use serde::{Deserialize, Serialize};

use crate::common::config::ExchangeMode;
use crate::common::error::{ExchangeError, Result};
use crate::common::messages;

/// Host the server binds to when none is configured.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Pending-connection queue length when none is configured.
pub const DEFAULT_BACKLOG: u32 = 1;

/// Server configuration loaded from a TOML file.
///
/// Every field is optional; command-line arguments take precedence.
///
/// # Example TOML
///
/// ```toml
/// [server]
/// host = "0.0.0.0"
/// port = 5000
/// backlog = 1
/// mode = "increment"
/// concurrent = false
///
/// [text]
/// reply = "Hola que tal"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub text: TextSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub backlog: Option<u32>,
    pub mode: Option<ExchangeMode>,
    pub concurrent: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextSection {
    /// Fixed answer to every text message; absent means echo
    pub reply: Option<String>,
}

/// How the text server answers a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextReply {
    /// Send the received bytes back unchanged
    Echo,
    /// Send this greeting followed by a newline
    Fixed(String),
}

impl TextReply {
    pub fn from_option(reply: Option<String>) -> Self {
        match reply {
            Some(text) => TextReply::Fixed(text),
            None => TextReply::Echo,
        }
    }

    /// Check that a fixed reply reaches the client as one intact line.
    ///
    /// # Errors
    /// - `MultilineReply` if the text contains `\n`
    /// - `TextTooLong` if the text plus its newline exceeds the buffer
    pub fn validate(&self) -> Result<()> {
        match self {
            TextReply::Echo => Ok(()),
            TextReply::Fixed(text) => {
                if text.contains('\n') {
                    return Err(ExchangeError::MultilineReply);
                }
                messages::text_frame(text).map(|_| ())
            }
        }
    }
}

/// Fully resolved settings the server runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub backlog: u32,
    pub mode: ExchangeMode,
    pub text_reply: TextReply,
    pub concurrent: bool,
}

impl ServerSettings {
    /// Settings for `port` with every other field at its default.
    pub fn new(port: u16) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port,
            backlog: DEFAULT_BACKLOG,
            mode: ExchangeMode::default(),
            text_reply: TextReply::Echo,
            concurrent: false,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_mode(mut self, mode: ExchangeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_text_reply(mut self, reply: TextReply) -> Self {
        self.text_reply = reply;
        self
    }

    pub fn with_backlog(mut self, backlog: u32) -> Self {
        self.backlog = backlog;
        self
    }

    pub fn with_concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }
}

/// Values given on the command line; `None` falls back to the file.
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub backlog: Option<u32>,
    pub mode: Option<ExchangeMode>,
    pub reply: Option<String>,
    pub concurrent: bool,
}

impl ServerConfig {
    /// Merge command-line overrides over the file values.
    ///
    /// Returns `None` for the port when neither source provides one; the caller
    /// then asks for it interactively.
    pub fn resolve(self, overrides: ServerOverrides) -> (Option<u16>, ServerSettings) {
        let port = overrides.port.or(self.server.port);

        let settings = ServerSettings {
            host: overrides
                .host
                .or(self.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: port.unwrap_or(0),
            backlog: overrides
                .backlog
                .or(self.server.backlog)
                .unwrap_or(DEFAULT_BACKLOG),
            mode: overrides.mode.or(self.server.mode).unwrap_or_default(),
            text_reply: TextReply::from_option(overrides.reply.or(self.text.reply)),
            concurrent: overrides.concurrent || self.server.concurrent.unwrap_or(false),
        };

        (port, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::load_config;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        let (port, settings) = config.resolve(ServerOverrides::default());

        assert_eq!(port, None);
        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.backlog, 1);
        assert_eq!(settings.mode, ExchangeMode::Increment);
        assert_eq!(settings.text_reply, TextReply::Echo);
        assert!(!settings.concurrent);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 5000
mode = "text"

[text]
reply = "Hola que tal"
"#
        )
        .unwrap();

        let config: ServerConfig = load_config(file.path()).unwrap();
        let (port, settings) = config.resolve(ServerOverrides::default());

        assert_eq!(port, Some(5000));
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.mode, ExchangeMode::Text);
        assert_eq!(
            settings.text_reply,
            TextReply::Fixed("Hola que tal".to_string())
        );
    }

    #[test]
    fn test_command_line_overrides_file() {
        let config: ServerConfig = toml::from_str(
            r#"
[server]
port = 5000
mode = "text"
backlog = 8
"#,
        )
        .unwrap();

        let overrides = ServerOverrides {
            port: Some(6000),
            mode: Some(ExchangeMode::Increment),
            concurrent: true,
            ..Default::default()
        };
        let (port, settings) = config.resolve(overrides);

        assert_eq!(port, Some(6000));
        assert_eq!(settings.port, 6000);
        assert_eq!(settings.mode, ExchangeMode::Increment);
        assert_eq!(settings.backlog, 8);
        assert!(settings.concurrent);
    }

    #[test]
    fn test_fixed_reply_validation() {
        assert!(TextReply::Echo.validate().is_ok());
        assert!(TextReply::Fixed("Hola que tal".to_string()).validate().is_ok());
        assert!(TextReply::Fixed("a".repeat(1023)).validate().is_ok());

        assert!(matches!(
            TextReply::Fixed("Hola\nque tal".to_string()).validate(),
            Err(ExchangeError::MultilineReply)
        ));
        assert!(matches!(
            TextReply::Fixed("a".repeat(1500)).validate(),
            Err(ExchangeError::TextTooLong { len: 1501, .. })
        ));
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let parsed: std::result::Result<ServerConfig, _> = toml::from_str("[server]\nmode = \"binary\"\n");
        assert!(parsed.is_err());
    }
}
