//! Flat little-endian binary arrays (Fortran-style `.bin` grids).

use std::path::Path;

use crate::error::{MapError, MapResult};

/// A fixed-width scalar stored little-endian on disk.
pub trait LeScalar: Copy {
    /// Width in bytes.
    const SIZE: usize;

    /// Decode from exactly `SIZE` bytes.
    fn from_le_slice(bytes: &[u8]) -> Self;
}

impl LeScalar for i16 {
    const SIZE: usize = 2;

    fn from_le_slice(bytes: &[u8]) -> Self {
        i16::from_le_bytes([bytes[0], bytes[1]])
    }
}

impl LeScalar for i32 {
    const SIZE: usize = 4;

    fn from_le_slice(bytes: &[u8]) -> Self {
        i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

impl LeScalar for f32 {
    const SIZE: usize = 4;

    fn from_le_slice(bytes: &[u8]) -> Self {
        f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// Decode a byte buffer into scalars. Trailing bytes that do not fill a
/// whole scalar are ignored; callers validate lengths first.
pub fn decode_le<T: LeScalar>(bytes: &[u8]) -> Vec<T> {
    bytes.chunks_exact(T::SIZE).map(T::from_le_slice).collect()
}

/// Size of a file on disk in bytes.
pub fn file_len(path: &Path) -> MapResult<u64> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| MapError::io(path, e))
}

/// Read exactly `count` scalars from `path`.
///
/// The file must hold exactly `count * T::SIZE` bytes; anything else is a
/// [`MapError::SizeMismatch`] rather than a silent truncation or pad.
pub fn read_array<T: LeScalar>(path: &Path, count: usize) -> MapResult<Vec<T>> {
    let expected = count.checked_mul(T::SIZE).ok_or_else(|| {
        MapError::invalid_shape(format!("{}: {} values overflow", path.display(), count))
    })? as u64;
    let actual = file_len(path)?;
    if actual != expected {
        return Err(MapError::SizeMismatch {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }

    let bytes = std::fs::read(path).map_err(|e| MapError::io(path, e))?;
    Ok(decode_le(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_mixed_widths() {
        let bytes: Vec<u8> = [1i32, -2, 300].iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(decode_le::<i32>(&bytes), vec![1, -2, 300]);

        let bytes: Vec<u8> = [7i16, -1].iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(decode_le::<i16>(&bytes), vec![7, -1]);

        let bytes: Vec<u8> = [1.5f32, 1e20].iter().flat_map(|v| v.to_le_bytes()).collect();
        assert_eq!(decode_le::<f32>(&bytes), vec![1.5, 1e20]);
    }

    #[test]
    fn test_read_array_rejects_short_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bin");
        std::fs::write(&path, [0u8; 10]).unwrap();

        match read_array::<i32>(&path, 3) {
            Err(MapError::SizeMismatch { expected, actual, .. }) => {
                assert_eq!(expected, 12);
                assert_eq!(actual, 10);
            }
            other => panic!("expected size mismatch, got {:?}", other),
        }
    }
}
