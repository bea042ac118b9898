use axum::extract::{Form, State};
use axum::response::Redirect;
use serde::Deserialize;

use crate::models::options::parse_optional;
use crate::models::{
    EnhanceOptions, Notice, NoticeKind, OptionsError, OutputFormat, ProcessingOptions, UiState,
};
use crate::services::SessionHandle;

/// Option fields as the page's form posts them.
///
/// Field names match the backend's multipart fields. Everything arrives as
/// text so a bad number becomes a notice rather than a rejected request.
#[derive(Debug, Default, Deserialize)]
pub struct OptionsForm {
    pub no_colors: Option<String>,
    pub out_format: Option<String>,
    /// Checkbox: present when ticked
    pub reduce_resolution: Option<String>,
    #[serde(rename = "JPG_quality")]
    pub jpg_quality: Option<String>,
    pub d: Option<String>,
    pub sigma_color: Option<String>,
    pub sigma_space: Option<String>,
    pub upsample: Option<String>,
}

impl OptionsForm {
    /// Parse the submitted values; blank fields keep the current setting
    pub fn parse(
        &self,
        current: &ProcessingOptions,
    ) -> Result<(ProcessingOptions, EnhanceOptions), OptionsError> {
        let output_format = match self.out_format.as_deref().map(str::trim) {
            None | Some("") => current.output_format,
            Some(value) => value.parse::<OutputFormat>()?,
        };

        let options = ProcessingOptions {
            color_count: parse_optional("no_colors", self.no_colors.as_deref())?
                .unwrap_or(current.color_count),
            output_format,
            reduce_resolution: self
                .reduce_resolution
                .as_deref()
                .is_some_and(|v| !v.eq_ignore_ascii_case("false")),
            jpg_quality: parse_optional("JPG_quality", self.jpg_quality.as_deref())?
                .unwrap_or(current.jpg_quality),
        };

        let enhance = EnhanceOptions {
            diameter: parse_optional("d", self.d.as_deref())?,
            sigma_color: parse_optional("sigma_color", self.sigma_color.as_deref())?,
            sigma_space: parse_optional("sigma_space", self.sigma_space.as_deref())?,
            upsample: parse_optional("upsample", self.upsample.as_deref())?,
        };

        options.validate()?;
        enhance.validate()?;
        Ok((options, enhance))
    }

    /// Apply to `state`, or leave it unchanged and post a notice
    pub fn apply(&self, state: &mut UiState) -> bool {
        let applied = self.parse(state.options()).and_then(|(options, enhance)| {
            state.apply_options(options)?;
            state.set_enhance_options(enhance)
        });

        match applied {
            Ok(()) => {
                state.dismiss_notice();
                true
            }
            Err(e) => {
                tracing::info!(error = %e, "Rejected option values");
                state.report(Notice::new(NoticeKind::UserInput, e.to_string()));
                false
            }
        }
    }
}

pub async fn handle_options(
    State(session): State<SessionHandle>,
    Form(form): Form<OptionsForm>,
) -> Redirect {
    form.apply(&mut session.lock().state);
    Redirect::to("/")
}
