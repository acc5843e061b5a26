use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use log::debug;

use crate::constants::PROGRAM_CAPACITY;
use crate::error::LoadError;

/// Reads a ROM image from disk.
///
/// The file's size is checked against the available program space before anything is read,
/// and the read is checked against that size so a short read is reported as truncation.
pub fn load_rom_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io(e),
    })?;
    let size = file.metadata()?.len() as usize;
    debug!("reading {} byte rom from {}", size, path.display());
    read_rom(&mut file, size)
}

/// Reads a ROM image of `expected` bytes from `reader`.
///
/// # Arguments
/// * `reader` the source of the image
/// * `expected` how many bytes the source claims to hold
pub fn read_rom(reader: &mut dyn Read, expected: usize) -> Result<Vec<u8>, LoadError> {
    if expected > PROGRAM_CAPACITY {
        return Err(LoadError::TooLarge {
            size: expected,
            capacity: PROGRAM_CAPACITY,
        });
    }

    // one spare byte to notice a source that holds more than it claimed
    let mut rom = Vec::with_capacity(expected);
    reader
        .take(PROGRAM_CAPACITY as u64 + 1)
        .read_to_end(&mut rom)?;

    if rom.len() > PROGRAM_CAPACITY {
        return Err(LoadError::TooLarge {
            size: rom.len(),
            capacity: PROGRAM_CAPACITY,
        });
    }
    if rom.len() < expected {
        return Err(LoadError::Truncated {
            expected,
            read: rom.len(),
        });
    }
    Ok(rom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_whole_rom() {
        let mut reader = Cursor::new(vec![0x00, 0xE0, 0x12, 0x00]);
        let rom = read_rom(&mut reader, 4).unwrap();
        assert_eq!(rom, [0x00, 0xE0, 0x12, 0x00]);
    }

    #[test]
    fn test_short_read_is_truncated() {
        let mut reader = Cursor::new(vec![0x00, 0xE0]);
        match read_rom(&mut reader, 4) {
            Err(LoadError::Truncated { expected, read }) => assert_eq!((expected, read), (4, 2)),
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_claim_is_too_large() {
        let mut reader = Cursor::new(Vec::new());
        assert!(matches!(
            read_rom(&mut reader, PROGRAM_CAPACITY + 1),
            Err(LoadError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_oversized_source_is_too_large() {
        let mut reader = Cursor::new(vec![0xAA; PROGRAM_CAPACITY + 10]);
        assert!(matches!(
            read_rom(&mut reader, 2),
            Err(LoadError::TooLarge {
                size,
                capacity: PROGRAM_CAPACITY
            }) if size == PROGRAM_CAPACITY + 1
        ));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let path = std::env::temp_dir().join("chipvm-no-such-rom.ch8");
        assert!(matches!(load_rom_file(&path), Err(LoadError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_loads_file_from_disk() {
        let path = std::env::temp_dir().join(format!("chipvm-rom-{}.ch8", std::process::id()));
        std::fs::write(&path, [0x60, 0x01, 0x12, 0x00]).unwrap();
        let rom = load_rom_file(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(rom.unwrap(), [0x60, 0x01, 0x12, 0x00]);
    }
}
