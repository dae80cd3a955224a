//! Inbound payload decoding: `data:` URIs and MIME/extension lookup.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::foundation::error::{AssetError, AssetResult};

/// Result of decoding a `data:<mime>;base64,<data>` URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedPayload {
    /// MIME type from the URI header, without parameters.
    pub mime_type: String,
    /// File extension registered for `mime_type`, if known.
    pub extension: Option<&'static str>,
    /// Decoded payload bytes.
    pub bytes: Vec<u8>,
}

const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/avif", "avif"),
    ("image/bmp", "bmp"),
    ("image/tiff", "tiff"),
    ("image/heic", "heic"),
    ("image/x-icon", "ico"),
    ("image/svg+xml", "svg"),
    ("application/pdf", "pdf"),
    ("application/postscript", "ps"),
];

/// Decode a base64 `data:` URI.
///
/// Parameters between the MIME type and `;base64` (e.g. `;charset=utf-8`) are ignored. ASCII
/// whitespace inside the payload is skipped.
pub fn decode_data_uri(uri: &str) -> AssetResult<DecodedPayload> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| AssetError::payload("data URI must start with 'data:'"))?;
    let (meta, data) = rest
        .split_once(";base64,")
        .ok_or_else(|| AssetError::payload("data URI is not base64-encoded"))?;

    let mime_type = meta.split(';').next().unwrap_or_default().trim();
    if mime_type.is_empty() {
        return Err(AssetError::payload("data URI has no MIME type"));
    }
    let mime_type = mime_type.to_ascii_lowercase();

    let compact: Vec<u8> = data
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(&compact)
        .map_err(|e| AssetError::payload(format!("invalid base64 payload: {e}")))?;

    Ok(DecodedPayload {
        extension: extension_for_mime(&mime_type),
        mime_type,
        bytes,
    })
}

/// Encode `bytes` as a base64 `data:` URI.
pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", STANDARD.encode(bytes))
}

/// Preferred file extension for a MIME type.
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    let mime_type = mime_type.trim().to_ascii_lowercase();
    MIME_EXTENSIONS
        .iter()
        .find(|(m, _)| *m == mime_type)
        .map(|(_, ext)| *ext)
}

/// MIME type for a file name, from its extension.
pub fn mime_for_file_name(name: &str) -> Option<&'static str> {
    let (_, ext) = crate::foundation::fs::split_file_name(name);
    let ext = ext?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "tif" | "tiff" => "image/tiff",
        "eps" | "ai" | "ps" => "application/postscript",
        other => MIME_EXTENSIONS
            .iter()
            .find(|(_, e)| *e == other)
            .map(|(m, _)| *m)?,
    };
    Some(mime)
}
