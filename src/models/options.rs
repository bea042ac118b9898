use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_COLOR_COUNT: u32 = 1;
pub const MAX_COLOR_COUNT: u32 = 256;
pub const MIN_JPG_QUALITY: u32 = 30;
pub const MAX_JPG_QUALITY: u32 = 95;

/// Error for option values the user entered
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptionsError {
    #[error("Color count must be between 1 and 256, got {0}")]
    ColorCount(u32),

    #[error("JPG quality must be between 30 and 95, got {0}")]
    JpgQuality(u32),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("Upsample factor must be a positive number, got {0}")]
    Upsample(f32),

    #[error("Invalid value for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Output format requested from the compressor.
///
/// The wire spelling is the one the LightFrame backend expects: `auto`, `JPG`, `png`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "JPG")]
    Jpg,
    #[serde(rename = "png")]
    Png,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Auto, OutputFormat::Jpg, OutputFormat::Png];

    /// Value sent in the `out_format` form field
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Auto => "auto",
            OutputFormat::Jpg => "JPG",
            OutputFormat::Png => "png",
        }
    }

    /// Human readable label for the format picker
    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Auto => "Auto",
            OutputFormat::Jpg => "JPG",
            OutputFormat::Png => "PNG",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(OutputFormat::Auto),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpg),
            "png" => Ok(OutputFormat::Png),
            _ => Err(OptionsError::UnknownFormat(s.to_string())),
        }
    }
}

/// Options sent along with a compress request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingOptions {
    /// Palette size, 1..=256
    pub color_count: u32,
    pub output_format: OutputFormat,
    /// Let the backend downscale large images
    pub reduce_resolution: bool,
    /// 30..=95, only honored when `output_format` is JPG
    pub jpg_quality: u32,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            color_count: 16,
            output_format: OutputFormat::Auto,
            reduce_resolution: true,
            jpg_quality: 85,
        }
    }
}

impl ProcessingOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        validate_color_count(self.color_count)?;
        validate_jpg_quality(self.jpg_quality)?;
        Ok(())
    }

    /// Whether the JPG quality setting has any effect
    pub fn jpg_quality_applies(&self) -> bool {
        self.output_format == OutputFormat::Jpg
    }

    /// Multipart text fields for `POST /compress`, in wire order
    pub fn form_fields(&self) -> [(&'static str, String); 4] {
        [
            ("no_colors", self.color_count.to_string()),
            ("out_format", self.output_format.as_str().to_string()),
            (
                "reduce_resolution",
                if self.reduce_resolution { "true" } else { "false" }.to_string(),
            ),
            ("JPG_quality", self.jpg_quality.to_string()),
        ]
    }
}

pub fn validate_color_count(value: u32) -> Result<(), OptionsError> {
    if (MIN_COLOR_COUNT..=MAX_COLOR_COUNT).contains(&value) {
        Ok(())
    } else {
        Err(OptionsError::ColorCount(value))
    }
}

pub fn validate_jpg_quality(value: u32) -> Result<(), OptionsError> {
    if (MIN_JPG_QUALITY..=MAX_JPG_QUALITY).contains(&value) {
        Ok(())
    } else {
        Err(OptionsError::JpgQuality(value))
    }
}

/// Bilateral filter tuning for `POST /enhance`.
///
/// Every field is optional; unset fields are left out of the request so the
/// backend applies its own defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhanceOptions {
    /// Filter neighbourhood diameter (`d`)
    pub diameter: Option<i32>,
    pub sigma_color: Option<u32>,
    pub sigma_space: Option<u32>,
    /// Scale factor applied before filtering
    pub upsample: Option<f32>,
}

impl EnhanceOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if let Some(factor) = self.upsample {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(OptionsError::Upsample(factor));
            }
        }
        Ok(())
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(d) = self.diameter {
            fields.push(("d", d.to_string()));
        }
        if let Some(sigma) = self.sigma_color {
            fields.push(("sigma_color", sigma.to_string()));
        }
        if let Some(sigma) = self.sigma_space {
            fields.push(("sigma_space", sigma.to_string()));
        }
        if let Some(factor) = self.upsample {
            fields.push(("upsample", factor.to_string()));
        }
        fields
    }
}

/// Parse an optional numeric form value; blank input counts as unset
pub fn parse_optional<T: FromStr>(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<T>, OptionsError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| OptionsError::InvalidNumber {
                field,
                value: value.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ProcessingOptions::default();
        assert_eq!(options.color_count, 16);
        assert_eq!(options.output_format, OutputFormat::Auto);
        assert!(options.reduce_resolution);
        assert_eq!(options.jpg_quality, 85);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_color_count_bounds() {
        assert!(validate_color_count(1).is_ok());
        assert!(validate_color_count(256).is_ok());
        assert_eq!(validate_color_count(0), Err(OptionsError::ColorCount(0)));
        assert_eq!(validate_color_count(257), Err(OptionsError::ColorCount(257)));
    }

    #[test]
    fn test_jpg_quality_bounds() {
        assert!(validate_jpg_quality(30).is_ok());
        assert!(validate_jpg_quality(95).is_ok());
        assert_eq!(validate_jpg_quality(29), Err(OptionsError::JpgQuality(29)));
        assert_eq!(validate_jpg_quality(96), Err(OptionsError::JpgQuality(96)));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("auto".parse::<OutputFormat>().unwrap(), OutputFormat::Auto);
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpg);
        assert_eq!("jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpg);
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert!(matches!(
            "webp".parse::<OutputFormat>(),
            Err(OptionsError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_output_format_wire_spelling() {
        let json = serde_json::to_string(&OutputFormat::Jpg).unwrap();
        assert_eq!(json, "\"JPG\"");
        assert_eq!(OutputFormat::Png.to_string(), "png");
    }

    #[test]
    fn test_form_fields_encoding() {
        let options = ProcessingOptions {
            color_count: 8,
            output_format: OutputFormat::Jpg,
            reduce_resolution: false,
            jpg_quality: 70,
        };
        assert_eq!(
            options.form_fields(),
            [
                ("no_colors", "8".to_string()),
                ("out_format", "JPG".to_string()),
                ("reduce_resolution", "false".to_string()),
                ("JPG_quality", "70".to_string()),
            ]
        );
    }

    #[test]
    fn test_jpg_quality_applies_only_to_jpg() {
        let mut options = ProcessingOptions::default();
        assert!(!options.jpg_quality_applies());
        options.output_format = OutputFormat::Jpg;
        assert!(options.jpg_quality_applies());
    }

    #[test]
    fn test_enhance_fields_skip_unset() {
        assert!(EnhanceOptions::default().form_fields().is_empty());

        let options = EnhanceOptions {
            diameter: Some(9),
            sigma_color: None,
            sigma_space: Some(50),
            upsample: Some(1.5),
        };
        assert_eq!(
            options.form_fields(),
            vec![
                ("d", "9".to_string()),
                ("sigma_space", "50".to_string()),
                ("upsample", "1.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_enhance_rejects_bad_upsample() {
        let options = EnhanceOptions {
            upsample: Some(0.0),
            ..Default::default()
        };
        assert_eq!(options.validate(), Err(OptionsError::Upsample(0.0)));
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(parse_optional::<u32>("d", None).unwrap(), None);
        assert_eq!(parse_optional::<u32>("d", Some("  ")).unwrap(), None);
        assert_eq!(parse_optional::<u32>("d", Some("12")).unwrap(), Some(12));
        assert!(matches!(
            parse_optional::<u32>("d", Some("abc")),
            Err(OptionsError::InvalidNumber { field: "d", .. })
        ));
    }
}
