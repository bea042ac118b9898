pub mod download;
pub mod page;
pub mod panels;

pub use download::{Download, DownloadError};
pub use page::{PageRenderer, TemplateError};
pub use panels::{group_thousands, PageView, PanelView};
