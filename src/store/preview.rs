//! PNG data URL encoding for preview images

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Wrap raw PNG bytes as `data:image/png;base64,...`
pub fn encode_png_data_url(png: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(png))
}

/// Decode a PNG data URL. A bare base64 payload without the prefix is accepted too.
pub fn decode_png_data_url(data_url: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let payload = data_url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .unwrap_or(data_url)
        .trim();
    STANDARD.decode(payload)
}
