//! Page assets with embedded fallbacks
//!
//! - If no assets directory is configured: use embedded assets only
//! - If one is configured: files found there win, missing ones fall back to embedded

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Embedded page template and stylesheet
#[derive(RustEmbed)]
#[folder = "assets/"]
struct EmbeddedAssets;

pub const PAGE_TEMPLATE: &str = "page.html";
pub const STYLESHEET: &str = "style.css";

/// Asset loader with optional filesystem override
#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    /// External assets directory (from LIGHTFRAME_ASSETS_DIR / config)
    assets_dir: Option<PathBuf>,
}

impl AssetLoader {
    pub fn new(assets_dir: Option<PathBuf>) -> Self {
        Self { assets_dir }
    }

    /// Read an asset, preferring the external directory when configured
    pub fn read(&self, name: &str) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref dir) = self.assets_dir {
            let full_path = dir.join(name);
            if full_path.exists() {
                tracing::trace!(path = %full_path.display(), "Loading asset from filesystem");
                return Ok(Cow::Owned(fs::read(&full_path)?));
            }
        }

        EmbeddedAssets::get(name)
            .map(|f| f.data)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Asset not found: {name}"),
                )
            })
    }

    pub fn read_string(&self, name: &str) -> io::Result<String> {
        let bytes = self.read(name)?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Names of all embedded assets
    pub fn list_embedded() -> Vec<String> {
        EmbeddedAssets::iter().map(|f| f.to_string()).collect()
    }
}
