//! Runs compress/enhance requests against a session.

use std::sync::Arc;

use super::api_client::{ClientError, ImageProcessor};
use super::session::SessionHandle;
use crate::models::state::CONNECTION_ERROR_MESSAGE;
use crate::models::{BeginError, Notice, NoticeKind, Operation, ProcessingResult, Ticket};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Select an image first")]
    NoFileSelected,

    #[error("A request is already in progress")]
    Busy,

    /// The backend answered with an error message
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Network failure or unreadable response
    #[error("Connection error: {0}")]
    Connection(#[source] ClientError),

    /// A newer selection superseded the request; its response was dropped
    #[error("Response discarded: a newer image was selected")]
    Stale,
}

impl From<BeginError> for DispatchError {
    fn from(e: BeginError) -> Self {
        match e {
            BeginError::NoFileSelected => DispatchError::NoFileSelected,
            BeginError::Busy => DispatchError::Busy,
        }
    }
}

/// Clears the in-flight marker if the dispatching future is dropped mid-request
struct InFlightGuard {
    session: SessionHandle,
    ticket: Ticket,
    armed: bool,
}

impl InFlightGuard {
    fn new(session: SessionHandle, ticket: Ticket) -> Self {
        Self {
            session,
            ticket,
            armed: true,
        }
    }

    fn disarm(mut self) -> Ticket {
        self.armed = false;
        self.ticket
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.armed && self.session.lock().state.abandon(self.ticket) {
            tracing::warn!(
                operation = %self.ticket.operation(),
                generation = self.ticket.generation(),
                "Request abandoned before completion"
            );
        }
    }
}

/// Sends the selected image to the backend and applies the outcome.
///
/// At most one request runs per session; a second one fails with
/// [`DispatchError::Busy`] without touching the network.
pub struct Dispatcher {
    session: SessionHandle,
    processor: Arc<dyn ImageProcessor>,
}

impl Dispatcher {
    pub fn new(session: SessionHandle, processor: Arc<dyn ImageProcessor>) -> Self {
        Self { session, processor }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub async fn compress(&self) -> Result<ProcessingResult, DispatchError> {
        self.run(Operation::Compress).await
    }

    pub async fn enhance(&self) -> Result<ProcessingResult, DispatchError> {
        self.run(Operation::Enhance).await
    }

    pub async fn run(&self, operation: Operation) -> Result<ProcessingResult, DispatchError> {
        let (ticket, upload, options, enhance) = {
            let mut session = self.session.lock();
            let ticket = match session.state.begin(operation) {
                Ok(ticket) => ticket,
                Err(e) => {
                    tracing::info!(operation = %operation, reason = %e, "Request not started");
                    return Err(e.into());
                }
            };
            let Some(upload) = session.upload() else {
                session.state.abandon(ticket);
                return Err(DispatchError::NoFileSelected);
            };
            (
                ticket,
                upload,
                *session.state.options(),
                *session.state.enhance_options(),
            )
        };

        tracing::info!(
            operation = %operation,
            generation = ticket.generation(),
            file = %upload.file_name,
            bytes = upload.bytes.len(),
            "Dispatching request"
        );

        let guard = InFlightGuard::new(self.session.clone(), ticket);
        let outcome = match operation {
            Operation::Compress => self.processor.compress(upload, &options).await,
            Operation::Enhance => self.processor.enhance(upload, &enhance).await,
        };
        let ticket = guard.disarm();

        let mut session = self.session.lock();
        match outcome {
            Ok(image) => session.finish(ticket, image).map_err(|_| {
                tracing::info!(
                    operation = %operation,
                    generation = ticket.generation(),
                    "Discarding superseded response"
                );
                DispatchError::Stale
            }),
            Err(err) => {
                let (notice, error) = match err {
                    ClientError::Server { status, message } => (
                        Notice::new(NoticeKind::Server, message.clone()),
                        DispatchError::Server { status, message },
                    ),
                    other => {
                        tracing::error!(operation = %operation, error = %other, "Request failed");
                        (
                            Notice::new(NoticeKind::Connection, CONNECTION_ERROR_MESSAGE),
                            DispatchError::Connection(other),
                        )
                    }
                };
                match session.state.fail(ticket, notice) {
                    Ok(()) => Err(error),
                    Err(_) => Err(DispatchError::Stale),
                }
            }
        }
    }
}
