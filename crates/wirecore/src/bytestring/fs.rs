use std::{
    fs::File,
    io::{self, Read, Seek, SeekFrom},
    path::Path,
};

use tracing::debug;

use super::ByteString;

impl ByteString {
    /// Reads an entire file into a new string.
    ///
    /// # Errors
    ///
    /// Any failure to open, size, or fully read the file. The partially
    /// filled string is dropped; nothing is returned on error.
    pub fn read_file<P: AsRef<Path>>(path: P) -> io::Result<ByteString> {
        let path = path.as_ref();
        let loaded = read_whole(path);
        match &loaded {
            Ok(s) => debug!(path = %path.display(), len = s.len(), "loaded file"),
            Err(err) => debug!(path = %path.display(), %err, "failed to load file"),
        }
        loaded
    }
}

fn read_whole(path: &Path) -> io::Result<ByteString> {
    let mut file = File::open(path)?;
    // Directories open on some platforms but report a bogus end offset.
    if !file.metadata()?.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }
    let size = file.seek(SeekFrom::End(0))?;
    file.seek(SeekFrom::Start(0))?;
    let size = usize::try_from(size).map_err(|_| io::Error::other("file does not fit in memory"))?;

    let mut s = ByteString::new();
    file.read_exact(s.write_buffer(size))?;
    Ok(s)
}
