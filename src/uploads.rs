use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Gate an image attachment and render it as a data URI.
///
/// The content must sniff as an image and fit under `max_bytes`. Rejection
/// happens before any state mutation; callers surface the error code as a
/// transient notice.
pub fn image_data_uri(data: &[u8], max_bytes: u64) -> Result<String> {
    let kind = infer::get(data).ok_or_else(|| anyhow!("not_an_image"))?;
    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(anyhow!("not_an_image"));
    }
    if data.len() as u64 > max_bytes {
        return Err(anyhow!("image_too_large"));
    }
    Ok(format!(
        "data:{};base64,{}",
        kind.mime_type(),
        STANDARD.encode(data)
    ))
}
