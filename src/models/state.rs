//! Session UI state and its transitions.
//!
//! Every transition here is pure: it only mutates the record and reports
//! which blob handles became unreachable. Talking to the backend and storing
//! bytes is done by the dispatcher and the blob store.

use serde::Serialize;
use std::fmt;

use super::options::{EnhanceOptions, OptionsError, OutputFormat, ProcessingOptions};
use super::options::{validate_color_count, validate_jpg_quality};

/// Shown when compress/enhance is triggered without a selected image
pub const SELECT_IMAGE_MESSAGE: &str = "Select an image first";

/// Shown for network failures and unreadable responses
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error";

/// Handle to bytes held in the blob store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BlobId(pub u64);

impl BlobId {
    /// Local URL the UI server serves this blob under
    pub fn url_path(&self) -> String {
        format!("/blob/{}", self.0)
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Compress,
    Enhance,
}

impl Operation {
    /// Backend endpoint path, without leading slash
    pub fn endpoint(&self) -> &'static str {
        match self {
            Operation::Compress => "compress",
            Operation::Enhance => "enhance",
        }
    }

    /// Message used when the backend fails without saying why
    pub fn fallback_error(&self) -> &'static str {
        match self {
            Operation::Compress => "Compression failed",
            Operation::Enhance => "Enhancement failed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// The image the user picked
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub blob: BlobId,
}

/// Outcome of the last successful round trip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingResult {
    pub blob: BlobId,
    pub mime: String,
    pub size: u64,
    pub colors: Option<u64>,
    pub operation: Operation,
}

/// Everything a successful response changes
#[derive(Debug, Clone, PartialEq)]
pub struct ResultUpdate {
    pub result: ProcessingResult,
    pub original_size: Option<u64>,
    pub original_colors: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    UserInput,
    Server,
    Connection,
}

/// Message surfaced to the user, the alert of the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Identifies one dispatched request.
///
/// A ticket stays current until the request finishes or a new file is
/// selected; responses carrying a non-current ticket are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ticket {
    generation: u64,
    operation: Operation,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    FileSelected,
    Compressing,
    Enhancing,
    ResultReady,
}

/// Why a request could not be started
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BeginError {
    #[error("Select an image first")]
    NoFileSelected,

    #[error("A request is already in progress")]
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Response superseded by a newer selection")]
pub struct StaleTicket;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UiState {
    file: Option<SelectedFile>,
    options: ProcessingOptions,
    enhance: EnhanceOptions,
    original_size: Option<u64>,
    original_colors: Option<u64>,
    result: Option<ProcessingResult>,
    in_flight: Option<Ticket>,
    notice: Option<Notice>,
    generation: u64,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn options(&self) -> &ProcessingOptions {
        &self.options
    }

    pub fn enhance_options(&self) -> &EnhanceOptions {
        &self.enhance
    }

    pub fn original_size(&self) -> Option<u64> {
        self.original_size
    }

    pub fn original_colors(&self) -> Option<u64> {
        self.original_colors
    }

    pub fn result(&self) -> Option<&ProcessingResult> {
        self.result.as_ref()
    }

    pub fn in_flight(&self) -> Option<Ticket> {
        self.in_flight
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn phase(&self) -> Phase {
        match (&self.file, self.in_flight, &self.result) {
            (None, _, _) => Phase::Idle,
            (Some(_), Some(ticket), _) => match ticket.operation {
                Operation::Compress => Phase::Compressing,
                Operation::Enhance => Phase::Enhancing,
            },
            (Some(_), None, Some(_)) => Phase::ResultReady,
            (Some(_), None, None) => Phase::FileSelected,
        }
    }

    /// Compress/enhance buttons are usable
    pub fn can_process(&self) -> bool {
        self.file.is_some() && self.in_flight.is_none()
    }

    pub fn can_download(&self) -> bool {
        self.result.is_some()
    }

    pub fn set_color_count(&mut self, value: u32) -> Result<(), OptionsError> {
        validate_color_count(value)?;
        self.options.color_count = value;
        Ok(())
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.options.output_format = format;
    }

    pub fn set_reduce_resolution(&mut self, reduce: bool) {
        self.options.reduce_resolution = reduce;
    }

    pub fn set_jpg_quality(&mut self, value: u32) -> Result<(), OptionsError> {
        validate_jpg_quality(value)?;
        self.options.jpg_quality = value;
        Ok(())
    }

    /// Replace all compress options at once; nothing changes if any is invalid
    pub fn apply_options(&mut self, options: ProcessingOptions) -> Result<(), OptionsError> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    pub fn set_enhance_options(&mut self, options: EnhanceOptions) -> Result<(), OptionsError> {
        options.validate()?;
        self.enhance = options;
        Ok(())
    }

    /// Record a message for the user without touching anything else
    pub fn report(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Select a new image.
    ///
    /// Clears the result and all metrics, supersedes any in-flight request and
    /// returns the blobs no longer referenced (old preview, old result).
    pub fn select_file(&mut self, file: SelectedFile) -> Vec<BlobId> {
        let mut released = Vec::new();
        if let Some(old) = self.file.take() {
            released.push(old.blob);
        }
        if let Some(old) = self.result.take() {
            released.push(old.blob);
        }

        self.original_size = Some(file.size);
        self.original_colors = None;
        self.file = Some(file);
        self.in_flight = None;
        self.notice = None;
        self.generation += 1;

        released
    }

    /// Start a request; fails without side effects other than the notice
    pub fn begin(&mut self, operation: Operation) -> Result<Ticket, BeginError> {
        if self.file.is_none() {
            self.notice = Some(Notice::new(NoticeKind::UserInput, SELECT_IMAGE_MESSAGE));
            return Err(BeginError::NoFileSelected);
        }
        if self.in_flight.is_some() {
            return Err(BeginError::Busy);
        }

        self.generation += 1;
        let ticket = Ticket {
            generation: self.generation,
            operation,
        };
        self.in_flight = Some(ticket);
        self.notice = None;
        Ok(ticket)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.in_flight == Some(ticket)
    }

    /// Apply a successful response; returns the previous result blob, if any
    pub fn complete(
        &mut self,
        ticket: Ticket,
        update: ResultUpdate,
    ) -> Result<Option<BlobId>, StaleTicket> {
        if !self.is_current(ticket) {
            return Err(StaleTicket);
        }

        let released = self.result.replace(update.result).map(|old| old.blob);
        if update.original_size.is_some() {
            self.original_size = update.original_size;
        }
        self.original_colors = update.original_colors;
        self.in_flight = None;
        Ok(released)
    }

    /// Finish a request with an error; the result stays as it was
    pub fn fail(&mut self, ticket: Ticket, notice: Notice) -> Result<(), StaleTicket> {
        if !self.is_current(ticket) {
            return Err(StaleTicket);
        }
        self.in_flight = None;
        self.notice = Some(notice);
        Ok(())
    }

    /// Drop a request that never produced an outcome (e.g. cancelled)
    pub fn abandon(&mut self, ticket: Ticket) -> bool {
        if self.is_current(ticket) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }
}
