//! Test fixtures and constants.

use base64::Engine;

pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Result filename used by the default config
pub const DOWNLOAD_FILENAME: &str = "LightFrame_result.jpg";

/// Bytes that sniff as PNG, padded to `len`
pub fn sample_png(len: usize) -> Vec<u8> {
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.resize(len.max(PNG_MAGIC.len()), 0);
    bytes
}

/// Stand-in for a processed image returned by the backend
pub fn result_bytes(len: usize) -> Vec<u8> {
    vec![0x5a; len]
}

pub fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Success body of `/compress`
pub fn compress_response(
    image: &[u8],
    mime: &str,
    original_size: u64,
    original_colors: u64,
    compressed_colors: u64,
) -> serde_json::Value {
    serde_json::json!({
        "image": encode(image),
        "mime": mime,
        "compressed_size": image.len(),
        "original_size": original_size,
        "original_colors": original_colors,
        "compressed_colors": compressed_colors,
    })
}

/// Success body of `/enhance`
pub fn enhance_response(image: &[u8], mime: &str, original_size: u64) -> serde_json::Value {
    serde_json::json!({
        "image": encode(image),
        "mime": mime,
        "result_size": image.len(),
        "original_size": original_size,
    })
}
