use std::fs::File;
use std::io::{Cursor, ErrorKind, Read};
use std::path::Path;

use super::{ByteSource, SourceError};

/// `ByteSource` over any reader with a declared total size.
///
/// The declared size is trusted: if the reader ends early the scanner sees a
/// short read and reports it, which is how a file truncated after it was
/// opened shows up.
///
/// # Examples
/// ```
/// use vehtrack_core::{ByteSource, StreamSource};
///
/// let mut source = StreamSource::from_bytes(vec![1, 2, 3, 4]);
/// let mut buffer = [0u8; 8];
/// let read = source.read_into(&mut buffer, 2, 3)?;
/// assert_eq!(read, 3);
/// assert_eq!(&buffer[2..5], &[1, 2, 3]);
/// # Ok::<(), vehtrack_core::SourceError>(())
/// ```
pub struct StreamSource<R> {
    reader: R,
    total_size: u64,
    position: u64,
}

impl<R: Read> StreamSource<R> {
    pub fn new(reader: R, total_size: u64) -> Self {
        Self {
            reader,
            total_size,
            position: 0,
        }
    }

    /// Bytes handed out so far.
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl StreamSource<File> {
    /// Open a file and take its size from the file metadata.
    ///
    /// # Errors
    /// Returns `SourceError::Open` when the file cannot be opened or stat'ed.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let open_error = |source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(open_error)?;
        let total_size = file.metadata().map_err(open_error)?.len();
        Ok(Self::new(file, total_size))
    }
}

impl StreamSource<Cursor<Vec<u8>>> {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let total_size = bytes.len() as u64;
        Self::new(Cursor::new(bytes), total_size)
    }
}

impl<R: Read> ByteSource for StreamSource<R> {
    fn total_size(&self) -> u64 {
        self.total_size
    }

    fn read_into(
        &mut self,
        buffer: &mut [u8],
        offset: usize,
        max_len: usize,
    ) -> Result<usize, SourceError> {
        let capacity = buffer.len();
        let window = offset
            .checked_add(max_len)
            .and_then(|end| buffer.get_mut(offset..end))
            .ok_or(SourceError::OutOfBounds {
                offset,
                len: max_len,
                capacity,
            })?;

        let read = fill_window(&mut self.reader, window)?;
        self.position += read as u64;
        Ok(read)
    }
}

fn fill_window<R: Read>(reader: &mut R, window: &mut [u8]) -> Result<usize, SourceError> {
    let mut filled = 0;
    while filled < window.len() {
        match reader.read(&mut window[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(SourceError::Io(err)),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::{ByteSource, SourceError, StreamSource};
    use std::io::{self, Read};

    /// Reader that hands out at most `step` bytes per call.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let end = (self.pos + self.step).min(self.data.len());
            let n = (end - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn read_into_fills_requested_window() {
        let mut source = StreamSource::from_bytes((0u8..10).collect());
        let mut buffer = [0xffu8; 6];
        let read = source.read_into(&mut buffer, 1, 4).unwrap();
        assert_eq!(read, 4);
        assert_eq!(buffer, [0xff, 0, 1, 2, 3, 0xff]);
        assert_eq!(source.position(), 4);
        assert_eq!(source.total_size(), 10);
    }

    #[test]
    fn read_into_collects_across_short_reads() {
        let data: Vec<u8> = (0u8..20).collect();
        let mut source = StreamSource::new(
            Trickle {
                data: data.clone(),
                pos: 0,
                step: 3,
            },
            20,
        );
        let mut buffer = [0u8; 16];
        let read = source.read_into(&mut buffer, 0, 16).unwrap();
        assert_eq!(read, 16);
        assert_eq!(&buffer[..], &data[..16]);
    }

    #[test]
    fn read_into_stops_at_end_of_input() {
        let mut source = StreamSource::from_bytes(vec![7, 8]);
        let mut buffer = [0u8; 4];
        assert_eq!(source.read_into(&mut buffer, 0, 4).unwrap(), 2);
        assert_eq!(source.read_into(&mut buffer, 2, 2).unwrap(), 0);
    }

    #[test]
    fn read_into_rejects_window_outside_buffer() {
        let mut source = StreamSource::from_bytes(vec![0; 8]);
        let mut buffer = [0u8; 4];
        let err = source.read_into(&mut buffer, 2, 3).unwrap_err();
        assert!(matches!(
            err,
            SourceError::OutOfBounds {
                offset: 2,
                len: 3,
                capacity: 4
            }
        ));
    }

    #[test]
    fn read_into_surfaces_io_errors() {
        let mut source = StreamSource::new(Broken, 4);
        let mut buffer = [0u8; 4];
        let err = source.read_into(&mut buffer, 0, 4).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[test]
    fn open_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.dat");
        let err = match StreamSource::open(&path) {
            Ok(_) => panic!("expected missing file to be rejected"),
            Err(err) => err,
        };
        assert!(matches!(err, SourceError::Open { .. }));
        assert!(err.to_string().contains("missing.dat"));
    }
}
