//! Inflate utility for compressed sub-blocks (gump layout, gump text, house planes)

use flate2::read::ZlibDecoder;
use std::io::Read;
use tracing::warn;
use uodecode_core::{DecodeError, Result};

/// Inflate a zlib block that must expand to exactly `expected_len` bytes.
///
/// Fails with [`DecodeError::DataError`] when the stream is corrupt or when it
/// produces fewer or more bytes than declared.
pub fn inflate(compressed: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    // declared sizes come off the wire; grow past this only as data arrives
    let mut out = Vec::with_capacity(expected_len.min(0x1_0000));

    // One extra byte is enough to detect an oversized payload.
    let limit = expected_len as u64 + 1;
    let mut decoder = ZlibDecoder::new(compressed).take(limit);

    if let Err(e) = decoder.read_to_end(&mut out) {
        warn!("inflate failed after {} of {} bytes: {}", out.len(), expected_len, e);
        return Err(DecodeError::DataError(format!("inflate failed: {}", e)));
    }

    if out.len() != expected_len {
        warn!("inflate size mismatch: expected {}, got {}", expected_len, out.len());
        return Err(DecodeError::DataError(format!(
            "inflated {} bytes, expected {}",
            out.len(),
            expected_len
        )));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_inflate_exact() {
        let original = b"{ page 0 }{ resizepic 0 0 5054 200 100 }";
        let compressed = deflate(original);

        let inflated = inflate(&compressed, original.len()).unwrap();
        assert_eq!(&inflated[..], &original[..]);
    }

    #[test]
    fn test_inflate_known_fixture() {
        // zlib stream of "hello"
        let compressed = [
            0x78, 0x9C, 0xCB, 0x48, 0xCD, 0xC9, 0xC9, 0x07, 0x00, 0x06, 0x2C, 0x02, 0x15,
        ];
        assert_eq!(inflate(&compressed, 5).unwrap(), b"hello");
    }

    #[test]
    fn test_inflate_size_mismatch() {
        let compressed = deflate(b"0123456789");

        let short = inflate(&compressed, 11).unwrap_err();
        assert!(matches!(short, DecodeError::DataError(_)));

        let long = inflate(&compressed, 9).unwrap_err();
        assert!(matches!(long, DecodeError::DataError(_)));
    }

    #[test]
    fn test_inflate_corrupt() {
        let mut compressed = deflate(b"corrupted block payload");
        let mid = compressed.len() / 2;
        compressed[mid] ^= 0xFF;
        compressed[mid + 1] ^= 0xFF;

        let err = inflate(&compressed, 23).unwrap_err();
        assert!(matches!(err, DecodeError::DataError(_)));

        let err = inflate(&[0x00, 0x01, 0x02], 4).unwrap_err();
        assert!(matches!(err, DecodeError::DataError(_)));
    }

    #[test]
    fn test_inflate_empty() {
        let compressed = deflate(b"");
        assert!(inflate(&compressed, 0).unwrap().is_empty());
    }
}
