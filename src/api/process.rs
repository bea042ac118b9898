//! Compress and enhance actions.
//!
//! Both buttons submit the options form, so the values on screen are applied
//! before the request goes out. Outcomes land in the session and the browser
//! is sent back to the page either way.

use axum::extract::{Form, State};
use axum::response::Redirect;
use std::sync::Arc;

use super::options::OptionsForm;
use crate::models::Operation;
use crate::services::{DispatchError, Dispatcher};

pub async fn handle_compress(
    State(dispatcher): State<Arc<Dispatcher>>,
    form: Option<Form<OptionsForm>>,
) -> Redirect {
    process(&dispatcher, form, Operation::Compress).await
}

pub async fn handle_enhance(
    State(dispatcher): State<Arc<Dispatcher>>,
    form: Option<Form<OptionsForm>>,
) -> Redirect {
    process(&dispatcher, form, Operation::Enhance).await
}

async fn process(
    dispatcher: &Dispatcher,
    form: Option<Form<OptionsForm>>,
    operation: Operation,
) -> Redirect {
    if let Some(Form(form)) = form {
        let accepted = form.apply(&mut dispatcher.session().lock().state);
        if !accepted {
            return Redirect::to("/");
        }
    }

    match dispatcher.run(operation).await {
        Ok(result) => {
            tracing::info!(
                operation = %operation,
                size = result.size,
                colors = ?result.colors,
                "Result ready"
            );
        }
        Err(DispatchError::Stale) => {
            tracing::debug!(operation = %operation, "Response superseded");
        }
        Err(e) => {
            tracing::warn!(operation = %operation, error = %e, "Request did not produce a result");
        }
    }

    Redirect::to("/")
}
