//! Image payload decoding and extraction.

use crate::cleanup::compact_base64;
use crate::error::Result;
use crate::model::MimeType;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// Decodes a base64 image payload, ignoring embedded whitespace.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(compact_base64(payload).as_bytes())?)
}

/// Decodes a payload and writes it to `dir/filename`.
pub(crate) fn save_image(dir: &Path, filename: &str, payload: &str) -> Result<()> {
    let bytes = decode_payload(payload)?;
    std::fs::write(dir.join(filename), bytes)?;
    Ok(())
}

/// Builds an inline `data:` URI for a payload.
pub(crate) fn data_uri(mime: MimeType, payload: &str) -> String {
    format!("data:{};base64,{}", mime, compact_base64(payload))
}

/// Builds the `<img>` reference emitted into the Markdown.
pub(crate) fn image_tag(src: &str) -> String {
    format!(r#"<img src="{}" alt="Output image" style="max-width: 100%;" />"#, src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wrapped_payload() {
        let encoded = STANDARD.encode(b"\x89PNG\r\n\x1a\nrest of image");
        let (head, tail) = encoded.split_at(8);
        let wrapped = format!("{}\n{}\n", head, tail);

        assert_eq!(
            decode_payload(&wrapped).unwrap(),
            b"\x89PNG\r\n\x1a\nrest of image".to_vec()
        );
    }

    #[test]
    fn test_decode_invalid_payload() {
        let err = decode_payload("not*base64").unwrap_err();
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_saved_bytes_match_direct_decode() {
        let dir = tempfile::tempdir().unwrap();
        let bytes: Vec<u8> = (0..=255u8).cycle().take(1024).collect();
        let payload = STANDARD.encode(&bytes);

        save_image(dir.path(), "roundtrip.png", &payload).unwrap();
        let written = std::fs::read(dir.path().join("roundtrip.png")).unwrap();

        assert_eq!(written, decode_payload(&payload).unwrap());
        assert_eq!(written, bytes);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let payload = STANDARD.encode(b"abc");

        let err = save_image(&missing, "x.png", &payload).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[test]
    fn test_data_uri_and_tag() {
        assert_eq!(
            data_uri(MimeType::ImageJpeg, "AA\nBB"),
            "data:image/jpeg;base64,AABB"
        );
        assert_eq!(
            image_tag("images/a.png"),
            r#"<img src="images/a.png" alt="Output image" style="max-width: 100%;" />"#
        );
    }
}
