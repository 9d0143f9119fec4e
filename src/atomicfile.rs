//! Write a save file without ever leaving a partial one behind.

use crate::error::{Error, Result};

use tempfile::NamedTempFile;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A file that is written next to its destination and only moved into
/// place by [`AtomicFile::commit`].  Dropping it without committing
/// leaves any existing file untouched.
pub struct AtomicFile {
    path: PathBuf,
    file: NamedTempFile,
}

impl AtomicFile {
    /// Start writing `p`, which will be overwritten on commit.
    pub fn create<P: AsRef<Path>>(p: P) -> Result<AtomicFile> {
        let path = p.as_ref();
        let dir = match path.parent() {
            None => {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::Other,
                    format!("Cannot create a file named {:?}", path))));
            }
            Some(d) if d.as_os_str().is_empty() => Path::new("."),
            Some(d) => d,
        };
        Ok(AtomicFile {
            path: path.to_path_buf(),
            file: NamedTempFile::new_in(dir)?,
        })
    }

    /// Flush to disk and move the file into place.
    pub fn commit(self) -> Result<()> {
        let AtomicFile { path, file } = self;
        file.as_file().sync_data()?;
        file.persist(&path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl<'a> Write for &'a AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.as_file().write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.file.as_file().flush()
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[test]
fn commit_replaces() {
    use std::io::Read;
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("out.txt");
    std::fs::write(&p, "old").unwrap();

    let mut f = AtomicFile::create(&p).unwrap();
    f.write_all(b"new contents").unwrap();
    let mut s = String::new();
    std::fs::File::open(&p).unwrap().read_to_string(&mut s).unwrap();
    assert_eq!(s, "old");
    f.commit().unwrap();
    assert_eq!(std::fs::read_to_string(&p).unwrap(), "new contents");
}

#[test]
fn drop_without_commit_keeps_old() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("out.txt");
    std::fs::write(&p, "old").unwrap();
    {
        let mut f = AtomicFile::create(&p).unwrap();
        f.write_all(b"abandoned").unwrap();
    }
    assert_eq!(std::fs::read_to_string(&p).unwrap(), "old");
    // the temporary file is cleaned up too
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
