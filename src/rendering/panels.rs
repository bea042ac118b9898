//! View model for the two-panel page.
//!
//! Everything the page shows is derived here from [`UiState`], so the HTML
//! template and the CLI summary stay dumb.

use serde::Serialize;

use crate::models::{NoticeKind, OutputFormat, UiState};

pub const ORIGINAL_PLACEHOLDER: &str = "Select an image";
pub const RESULT_PLACEHOLDER: &str = "The result will appear here";
pub const PROCESSING_LABEL: &str = "Processing...";

/// Format an integer with comma thousands separators (`500000` -> `500,000`)
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn size_line(bytes: u64) -> String {
    format!("Size: {} bytes", group_thousands(bytes))
}

pub fn colors_line(colors: u64) -> String {
    format!("Detected colors: {colors}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub title: &'static str,
    pub image_url: Option<String>,
    pub alt: &'static str,
    pub placeholder: &'static str,
    pub size_text: Option<String>,
    pub colors_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatChoice {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlsView {
    pub color_count: u32,
    pub formats: Vec<FormatChoice>,
    pub reduce_resolution: bool,
    pub jpg_quality: u32,
    pub jpg_quality_enabled: bool,
    pub diameter: Option<i32>,
    pub sigma_color: Option<u32>,
    pub sigma_space: Option<u32>,
    pub upsample: Option<f32>,
    pub process_enabled: bool,
    pub compress_label: &'static str,
    pub enhance_label: &'static str,
    pub download_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoticeView {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub file_name: Option<String>,
    pub original: PanelView,
    pub result: PanelView,
    pub controls: ControlsView,
    pub notice: Option<NoticeView>,
}

impl PageView {
    pub fn from_state(state: &UiState) -> Self {
        let options = state.options();
        let enhance = state.enhance_options();
        let loading = state.is_loading();

        let original = PanelView {
            title: "Original image",
            image_url: state.file().map(|f| f.blob.url_path()),
            alt: "original",
            placeholder: ORIGINAL_PLACEHOLDER,
            size_text: state.original_size().map(size_line),
            colors_text: state.original_colors().map(colors_line),
        };

        let result = PanelView {
            title: "Result",
            image_url: state.result().map(|r| r.blob.url_path()),
            alt: "result",
            placeholder: RESULT_PLACEHOLDER,
            size_text: state.result().map(|r| size_line(r.size)),
            colors_text: state.result().and_then(|r| r.colors).map(colors_line),
        };

        let formats = OutputFormat::ALL
            .iter()
            .map(|format| FormatChoice {
                value: format.as_str(),
                label: format.label(),
                selected: *format == options.output_format,
            })
            .collect();

        let controls = ControlsView {
            color_count: options.color_count,
            formats,
            reduce_resolution: options.reduce_resolution,
            jpg_quality: options.jpg_quality,
            jpg_quality_enabled: options.jpg_quality_applies(),
            diameter: enhance.diameter,
            sigma_color: enhance.sigma_color,
            sigma_space: enhance.sigma_space,
            upsample: enhance.upsample,
            process_enabled: state.can_process(),
            compress_label: if loading { PROCESSING_LABEL } else { "Compress image" },
            enhance_label: if loading { PROCESSING_LABEL } else { "Enhance image" },
            download_enabled: state.can_download(),
        };

        Self {
            file_name: state.file().map(|f| f.name.clone()),
            original,
            result,
            controls,
            notice: state.notice().map(|n| NoticeView {
                kind: n.kind,
                message: n.message.clone(),
            }),
        }
    }

    /// Plain-text rendering of both panels, for terminals
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for panel in [&self.original, &self.result] {
            out.push_str(panel.title);
            out.push('\n');
            if panel.image_url.is_none() {
                out.push_str("  ");
                out.push_str(panel.placeholder);
                out.push('\n');
            }
            for line in [&panel.size_text, &panel.colors_text].into_iter().flatten() {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
        if let Some(notice) = &self.notice {
            out.push_str("! ");
            out.push_str(&notice.message);
            out.push('\n');
        }
        out
    }
}
