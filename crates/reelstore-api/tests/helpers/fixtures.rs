//! Test fixtures: small byte blobs with the right leading signatures.

/// PNG signature followed by filler.
pub fn png_bytes() -> Vec<u8> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend_from_slice(b"thumbnail-body");
    data
}

/// An ISO BMFF `ftyp` box followed by filler. The fake remuxer and prober
/// never parse it.
pub fn mp4_bytes() -> Vec<u8> {
    let mut data = vec![0x00, 0x00, 0x00, 0x20];
    data.extend_from_slice(b"ftypisom");
    data.extend_from_slice(&[0u8; 256]);
    data
}

pub fn gif_bytes() -> Vec<u8> {
    b"GIF89a\x01\x00\x01\x00".to_vec()
}
