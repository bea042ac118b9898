use tera::{Context, Tera};

use super::panels::PageView;
use crate::assets::{AssetLoader, PAGE_TEMPLATE};

/// Error type for page rendering
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),

    #[error("Failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the single page with Tera
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    /// Compile the page template once at startup
    pub fn new(assets: &AssetLoader) -> Result<Self, TemplateError> {
        let source = assets.read_string(PAGE_TEMPLATE)?;
        let mut tera = Tera::default();
        tera.add_raw_template(PAGE_TEMPLATE, &source)?;
        tracing::info!(template = PAGE_TEMPLATE, "Page renderer initialized");
        Ok(Self { tera })
    }

    pub fn render(&self, view: &PageView) -> Result<String, TemplateError> {
        let context = Context::from_serialize(view)?;
        Ok(self.tera.render(PAGE_TEMPLATE, &context)?)
    }
}
