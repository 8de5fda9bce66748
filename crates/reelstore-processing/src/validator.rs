//! Content type validation.
//!
//! Checks the client-declared `Content-Type` of the multipart part against the
//! allow-list for its asset class. The declared type is advisory; callers that
//! want more can additionally run [`sniff_magic_bytes`] on the first bytes.

use crate::error::{ProcessingError, ProcessingResult};
use reelstore_core::models::{AssetClass, MediaType};

const THUMBNAIL_SUBTYPES: &[&str] = &["png", "jpeg"];
const VIDEO_MP4: &str = "video/mp4";

/// Split a content type into its lowercased `(type, subtype)` essence,
/// dropping any `; param=value` suffix.
fn parse_essence(content_type: &str) -> Option<(String, String)> {
    let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
    let (ty, subtype) = essence.split_once('/')?;

    let is_token = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || "!#$&-^_.+".contains(c))
    };
    if !is_token(ty) || !is_token(subtype) {
        return None;
    }

    Some((ty.to_string(), subtype.to_string()))
}

/// Validate a declared content type for the given asset class.
///
/// Thumbnails accept `image/png` and `image/jpeg`; videos accept only
/// `video/mp4`. Returns the normalized essence together with the file
/// extension used for the storage key.
pub fn validate_media_type(asset: AssetClass, content_type: &str) -> ProcessingResult<MediaType> {
    let (ty, subtype) = parse_essence(content_type).ok_or_else(|| {
        ProcessingError::InvalidMediaType(format!("malformed content type: {:?}", content_type))
    })?;

    match asset {
        AssetClass::Thumbnail => {
            if ty != "image" || !THUMBNAIL_SUBTYPES.contains(&subtype.as_str()) {
                return Err(ProcessingError::InvalidMediaType(format!(
                    "unsupported content type: {}/{}",
                    ty, subtype
                )));
            }
            Ok(MediaType::new(format!("{}/{}", ty, subtype), subtype))
        }
        AssetClass::Video => {
            let essence = format!("{}/{}", ty, subtype);
            if essence != VIDEO_MP4 {
                return Err(ProcessingError::InvalidMediaType(format!(
                    "unsupported content type: {}",
                    essence
                )));
            }
            Ok(MediaType::new(essence, "mp4"))
        }
    }
}

/// Check that the leading bytes of an upload look like the declared type.
pub fn sniff_magic_bytes(media_type: &MediaType, head: &[u8]) -> ProcessingResult<()> {
    let matches = match media_type.essence.as_str() {
        "image/png" => head.starts_with(b"\x89PNG\r\n\x1a\n"),
        "image/jpeg" => head.starts_with(&[0xFF, 0xD8, 0xFF]),
        // ISO BMFF: 4-byte box size, then `ftyp`
        "video/mp4" => head.len() >= 8 && &head[4..8] == b"ftyp",
        _ => false,
    };

    if !matches {
        return Err(ProcessingError::InvalidMediaType(format!(
            "file contents do not match declared type {}",
            media_type.essence
        )));
    }
    Ok(())
}
