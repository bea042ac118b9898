pub mod blob;
pub mod download;
pub mod options;
pub mod page;
pub mod process;
pub mod select;
pub mod state;

pub use blob::handle_blob;
pub use download::handle_download;
pub use options::{handle_options, OptionsForm};
pub use page::{handle_page, handle_stylesheet};
pub use process::{handle_compress, handle_enhance};
pub use select::handle_select;
pub use state::{handle_state, StateResponse};
