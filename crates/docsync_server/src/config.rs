//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Template rendered on read-only requests.
pub const DEFAULT_TEMPLATE: &str = "index.html";

/// Request header carrying the caller's document database credential.
pub const DEFAULT_ADMIN_KEY_HEADER: &str = "x-appwrite-key";

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Directory holding static templates.
    pub static_dir: PathBuf,
    /// Template file name inside `static_dir`.
    pub template: String,
    /// Header carrying the admin credential for the sync path.
    pub admin_key_header: String,
}

impl ServerConfig {
    /// Creates a new server configuration.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            static_dir: PathBuf::from("static"),
            template: DEFAULT_TEMPLATE.to_string(),
            admin_key_header: DEFAULT_ADMIN_KEY_HEADER.to_string(),
        }
    }

    /// Sets the static directory.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    /// Sets the template file name.
    pub fn with_template(mut self, name: impl Into<String>) -> Self {
        self.template = name.into();
        self
    }

    /// Sets the admin credential header.
    pub fn with_admin_key_header(mut self, header: impl Into<String>) -> Self {
        self.admin_key_header = header.into().to_ascii_lowercase();
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 3000)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.template, "index.html");
        assert_eq!(config.admin_key_header, "x-appwrite-key");
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new("0.0.0.0:9000".parse().unwrap())
            .with_static_dir("/srv/www")
            .with_template("search.html")
            .with_admin_key_header("X-Source-Key");

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.static_dir, PathBuf::from("/srv/www"));
        assert_eq!(config.template, "search.html");
        assert_eq!(config.admin_key_header, "x-source-key");
    }
}
