//! HTTP server configuration.

use docqa_core::config::STATE_DIR;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum accepted upload size (16 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// Request body limit for uploads, in bytes
    pub max_upload_size: usize,

    /// Where uploaded files are kept, relative to the workspace unless absolute
    pub upload_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            upload_dir: Path::new(STATE_DIR).join("uploads"),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Absolute upload directory for `workspace`.
    pub fn upload_path(&self, workspace: &Path) -> PathBuf {
        if self.upload_dir.is_absolute() {
            self.upload_dir.clone()
        } else {
            workspace.join(&self.upload_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "127.0.0.1:5000");
        assert_eq!(config.max_upload_size, 16 * 1024 * 1024);
        assert_eq!(
            config.upload_path(Path::new("/work")),
            Path::new("/work/.docqa/uploads")
        );
    }
}
