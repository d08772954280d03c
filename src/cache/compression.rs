//! Compression utilities for cache payloads.

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Algorithm applied to stored payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Store bytes as-is
    None,
    #[default]
    Gzip,
    Lz4,
}

impl Compression {
    /// Compress data with this algorithm.
    pub fn compress(self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Compression::None => Ok(data.to_vec()),
            Compression::Gzip => compress_gzip(data),
            Compression::Lz4 => Ok(lz4_flex::compress_prepend_size(data)),
        }
    }

    /// Decompress data produced by [`Compression::compress`].
    ///
    /// Failures surface as [`Error::CacheCorruption`].
    pub fn decompress(self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Compression::None => Ok(data.to_vec()),
            Compression::Gzip => decompress_gzip(data),
            Compression::Lz4 => lz4_flex::decompress_size_prepended(data)
                .map_err(|e| Error::CacheCorruption(format!("Lz4 read failed: {}", e))),
        }
    }
}

fn compress_gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| Error::Compression(format!("Gzip write failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| Error::Compression(format!("Gzip finish failed: {}", e)))
}

fn decompress_gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut output = Vec::new();
    decoder
        .read_to_end(&mut output)
        .map_err(|e| Error::CacheCorruption(format!("Gzip read failed: {}", e)))?;
    Ok(output)
}

impl FromStr for Compression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Compression::None),
            "gzip" | "gz" => Ok(Compression::Gzip),
            "lz4" => Ok(Compression::Lz4),
            other => Err(Error::Validation(format!(
                "Unknown compression algorithm: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
            Compression::Lz4 => "lz4",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Compression; 3] = [Compression::None, Compression::Gzip, Compression::Lz4];

    #[test]
    fn test_round_trip_all_algorithms() {
        let data = br#"{"status":200,"text":"hello hello hello hello"}"#.repeat(20);
        for algorithm in ALL {
            let packed = algorithm.compress(&data).unwrap();
            assert_eq!(algorithm.decompress(&packed).unwrap(), data, "{algorithm}");
        }
    }

    #[test]
    fn test_round_trip_empty() {
        for algorithm in ALL {
            let packed = algorithm.compress(&[]).unwrap();
            assert!(algorithm.decompress(&packed).unwrap().is_empty());
        }
    }

    #[test]
    fn test_gzip_shrinks_repetitive_data() {
        let data = vec![b'a'; 4096];
        let packed = Compression::Gzip.compress(&data).unwrap();
        assert!(packed.len() < data.len() / 10);
    }

    #[test]
    fn test_corrupt_input_is_cache_corruption() {
        let garbage = b"definitely not compressed";
        assert!(matches!(
            Compression::Gzip.decompress(garbage),
            Err(Error::CacheCorruption(_))
        ));
        assert!(matches!(
            Compression::Lz4.decompress(&[1, 2]),
            Err(Error::CacheCorruption(_))
        ));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("GZIP".parse::<Compression>().unwrap(), Compression::Gzip);
        assert_eq!("lz4".parse::<Compression>().unwrap(), Compression::Lz4);
        assert_eq!("none".parse::<Compression>().unwrap(), Compression::None);
        assert!("brotli".parse::<Compression>().is_err());
    }
}
