pub mod config;
pub mod options;
pub mod state;

pub use config::{AppConfig, ConfigError};
pub use options::{EnhanceOptions, OptionsError, OutputFormat, ProcessingOptions};
pub use state::{
    BeginError, BlobId, Notice, NoticeKind, Operation, Phase, ProcessingResult, ResultUpdate,
    SelectedFile, StaleTicket, Ticket, UiState,
};
