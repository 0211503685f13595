//! Byte-stream compressor used for every basket.
//!
//! The rest of the crate only talks to the [`Codec`] trait, so the concatenation
//! protocol does not care which entropy coder sits underneath.

use crate::error::{ArchiverError, Result};

/// Whole-buffer compressor with a stable level parameter.
pub trait Codec {
    /// File extension (without the dot) of compressed outputs.
    fn extension(&self) -> &'static str;

    fn compress(&self, data: &[u8], level: i32) -> Result<Vec<u8>>;

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Accepted level range, inclusive.
    fn level_range(&self) -> std::ops::RangeInclusive<i32>;
}

/// Single-frame Zstandard codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZstdCodec;

impl Codec for ZstdCodec {
    fn extension(&self) -> &'static str {
        "zst"
    }

    fn compress(&self, data: &[u8], level: i32) -> Result<Vec<u8>> {
        zstd::stream::encode_all(data, level).map_err(ArchiverError::Codec)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        zstd::stream::decode_all(data).map_err(ArchiverError::Codec)
    }

    fn level_range(&self) -> std::ops::RangeInclusive<i32> {
        zstd::compression_level_range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zstd_roundtrip() {
        let codec = ZstdCodec;
        let src = b"hello world, hello world, hello world".repeat(64);
        let packed = codec.compress(&src, 20).unwrap();
        assert!(packed.len() < src.len());
        assert_eq!(codec.decompress(&packed).unwrap(), src);
    }

    #[test]
    fn empty_input_is_a_valid_frame() {
        let codec = ZstdCodec;
        let packed = codec.compress(&[], 3).unwrap();
        assert!(!packed.is_empty());
        assert!(codec.decompress(&packed).unwrap().is_empty());
    }

    #[test]
    fn garbage_fails_to_decode() {
        let err = ZstdCodec.decompress(b"definitely not zstd").unwrap_err();
        assert!(matches!(err, ArchiverError::Codec(_)));
    }
}
