use {
    crate::*,
    base64::{Engine as _, engine::general_purpose},
};

pub const JPEG_MIME: &str = "image/jpeg";

/// Wrap bytes as `data:<mime>;base64,<payload>`.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Split a base64 data URL into its mime type and decoded bytes.
pub fn from_data_url(url: &str) -> Result<(String, Vec<u8>), ImageError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ImageError::DataUrl("missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::DataUrl("missing ',' separator".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| ImageError::DataUrl("only base64 payloads are supported".to_string()))?;
    let bytes = general_purpose::STANDARD.decode(payload)?;
    Ok((mime.to_string(), bytes))
}
