//! Zero-block detection shared by the read and write sides.
//!
//! A block that scans as all-zero is skipped by [`MappedReader`] and
//! reconstructed as a hole by [`HoleWriter`]; both sides must agree on what
//! "all zero" means, so the test lives here.
//!
//! [`MappedReader`]: crate::MappedReader
//! [`HoleWriter`]: crate::HoleWriter

/// Returns true if every byte in `buf` is zero.
///
/// Scans in machine-word steps with a per-byte tail. An empty buffer is
/// trivially zero.
#[must_use]
pub fn is_zero_block(buf: &[u8]) -> bool {
    let mut words = buf.chunks_exact(size_of::<u64>());
    for chunk in &mut words {
        let mut word = [0u8; size_of::<u64>()];
        word.copy_from_slice(chunk);
        if u64::from_ne_bytes(word) != 0 {
            return false;
        }
    }
    words.remainder().iter().all(|&b| b == 0)
}
