//! Test fixtures: fake video payloads.

/// Ten bytes shaped like the start of an MP4 `ftyp` box.
pub fn fake_mp4() -> Vec<u8> {
    vec![0x00, 0x00, 0x00, 0x18, b'f', b't', b'y', b'p', b'i', b's']
}

/// Arbitrary payload of the given length.
pub fn fake_video(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
