use std::{
    fs,
    io::{ErrorKind, Read, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::result::{Error, Result};

/// Suffix of the files being downloaded
pub const PARTIAL_SUFFIX: &str = ".part";
const PARTIAL_PREFIX: &str = ".playsback-";

/// Find a file already holding the clip in the directory.
///
/// Either the file named after the clip, or a file using the older
/// `<title>_<date>_<author>_<id>_<quality>.mp4` layout.
/// Files still being downloaded never count.
pub fn find_existing(out_dir: &Path, file_name: &str, clip_id: &str) -> Result<Option<PathBuf>> {
    let exact = out_dir.join(file_name);
    if exact.is_file() {
        return Ok(Some(exact));
    }

    let entries = match out_dir.read_dir() {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(Error::write(out_dir, err)),
    };

    for entry in entries {
        let entry = entry.map_err(|err| Error::write(out_dir, err))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };

        let Some(stem) = name.strip_suffix(".mp4") else {
            continue;
        };
        if stem.split('_').any(|segment| segment == clip_id) {
            return Ok(Some(entry.path()));
        }
    }

    Ok(None)
}

/// Create a named temporary file in the directory and return its handle.
///
/// Staying in the same directory makes the final rename atomic.
/// The file is deleted when the handle is dropped without being persisted.
pub fn named_tempfile(out_dir: &Path) -> Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .suffix(PARTIAL_SUFFIX)
        .tempfile_in(out_dir)
        .map_err(|err| Error::write(out_dir, err))
}

/// Delete the partial downloads left behind by interrupted runs.
///
/// Return how many were removed.
pub fn remove_partials(out_dir: &Path) -> Result<usize> {
    let entries = out_dir.read_dir().map_err(|err| Error::write(out_dir, err))?;

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|err| Error::write(out_dir, err))?;
        let is_partial = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with(PARTIAL_PREFIX) && name.ends_with(PARTIAL_SUFFIX));

        let path = entry.path();
        if is_partial && path.is_file() {
            fs::remove_file(&path).map_err(|err| Error::write(&path, err))?;
            removed += 1;
        }
    }

    Ok(removed)
}

/// Copy everything from the reader, telling apart network and disk failures.
pub fn copy_to<R, W>(reader: &mut R, writer: &mut W, source: &str, dest: &Path) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = [0u8; 64 * 1024];
    let mut written = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::fetch(source, err)),
        };

        writer
            .write_all(&buffer[..n])
            .map_err(|err| Error::write(dest, err))?;
        written += n as u64;
    }

    writer.flush().map_err(|err| Error::write(dest, err))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io::Cursor};

    #[test]
    fn finds_exact_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("abc123.mp4"), b"clip").unwrap();

        let found = find_existing(dir.path(), "abc123.mp4", "abc123").unwrap();
        assert_eq!(found, Some(dir.path().join("abc123.mp4")));
    }

    #[test]
    fn finds_older_layout_by_id_segment() {
        let dir = tempfile::tempdir().unwrap();
        let legacy = dir.path().join("Ace clutch_Nov 2019_sampleuser_abc123_720.mp4");
        fs::write(&legacy, b"clip").unwrap();

        assert_eq!(find_existing(dir.path(), "abc123.mp4", "abc123").unwrap(), Some(legacy));
        // Sharing characters is not enough
        assert_eq!(find_existing(dir.path(), "abc12.mp4", "abc12").unwrap(), None);
    }

    #[test]
    fn partial_downloads_do_not_count() {
        let dir = tempfile::tempdir().unwrap();
        let partial = named_tempfile(dir.path()).unwrap();
        assert!(partial
            .path()
            .to_string_lossy()
            .ends_with(PARTIAL_SUFFIX));
        fs::write(dir.path().join("abc123.mp4.part"), b"half").unwrap();

        assert_eq!(find_existing(dir.path(), "abc123.mp4", "abc123").unwrap(), None);
    }

    #[test]
    fn only_partial_downloads_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        named_tempfile(dir.path()).unwrap().keep().unwrap();
        named_tempfile(dir.path()).unwrap().keep().unwrap();
        fs::write(dir.path().join("abc123.mp4"), b"clip").unwrap();
        fs::write(dir.path().join("notes.part"), b"mine").unwrap();

        assert_eq!(remove_partials(dir.path()).unwrap(), 2);

        let mut left: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left, ["abc123.mp4", "notes.part"]);
    }

    #[test]
    fn missing_directory_holds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not-yet");
        assert_eq!(find_existing(&missing, "abc123.mp4", "abc123").unwrap(), None);
    }

    #[test]
    fn copies_the_whole_stream() {
        let data = vec![7u8; 200 * 1024];
        let mut out = Vec::new();

        let n = copy_to(&mut Cursor::new(&data), &mut out, "https://cdn.example/a.mp4", Path::new("a.mp4"))
            .unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(out, data);
    }

    #[test]
    fn read_failures_are_fetch_errors() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(ErrorKind::ConnectionReset, "reset"))
            }
        }

        let err = copy_to(&mut Broken, &mut Vec::new(), "https://cdn.example/a.mp4", Path::new("a.mp4"))
            .unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }
}
