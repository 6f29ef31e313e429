//! Decides whether a destination already matches its source, and copies
//! when it does not.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufReader},
    path::Path,
};

use sha2::{Digest, Sha256};

/// State of a destination relative to its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Missing,
    SizeDiffers,
    ContentDiffers,
    Identical,
}

impl Comparison {
    pub fn needs_copy(self) -> bool {
        !matches!(self, Comparison::Identical)
    }
}

/// What [`sync_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Copied,
    Updated,
    Unchanged,
}

/// Compares sizes first and only hashes when they agree.
pub fn compare(source: &Path, destination: &Path) -> io::Result<Comparison> {
    let dest_meta = match fs::metadata(destination) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(Comparison::Missing);
        }
        Err(err) => return Err(err),
    };
    let source_meta = fs::metadata(source)?;

    if !dest_meta.is_file() || dest_meta.len() != source_meta.len() {
        return Ok(Comparison::SizeDiffers);
    }
    if file_digest(source)? == file_digest(destination)? {
        Ok(Comparison::Identical)
    } else {
        Ok(Comparison::ContentDiffers)
    }
}

/// True unless the destination is known to be identical. Errors while
/// comparing count as "copy it".
pub fn needs_copy(source: &Path, destination: &Path) -> bool {
    match compare(source, destination) {
        Ok(comparison) => comparison.needs_copy(),
        Err(err) => {
            tracing::debug!(
                "Comparing {} failed, copying anyway: {}",
                destination.display(),
                err
            );
            true
        }
    }
}

/// Brings `destination` in line with `source`, creating parent directories.
/// The copy keeps the source's modification time.
pub fn sync_file(source: &Path, destination: &Path) -> io::Result<SyncOutcome> {
    let existed = destination.exists();
    if !needs_copy(source, destination) {
        return Ok(SyncOutcome::Unchanged);
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(source, destination)?;
    preserve_mtime(source, destination);

    Ok(if existed {
        SyncOutcome::Updated
    } else {
        SyncOutcome::Copied
    })
}

fn file_digest(path: &Path) -> io::Result<Vec<u8>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(hasher.finalize().to_vec())
}

fn preserve_mtime(source: &Path, destination: &Path) {
    let result = fs::metadata(source)
        .and_then(|meta| meta.modified())
        .and_then(|mtime| {
            OpenOptions::new()
                .write(true)
                .open(destination)?
                .set_modified(mtime)
        });
    if let Err(err) = result {
        tracing::debug!(
            "Could not carry mtime over to {}: {}",
            destination.display(),
            err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_destination_needs_copy() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("poster.jpg");
        fs::write(&src, b"abc").unwrap();

        assert_eq!(
            compare(&src, &dir.path().join("out.jpg")).unwrap(),
            Comparison::Missing
        );
    }

    #[test]
    fn same_size_different_bytes_is_detected() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.jpg");
        let dst = dir.path().join("b.jpg");
        fs::write(&src, b"abcd").unwrap();
        fs::write(&dst, b"abce").unwrap();

        assert_eq!(compare(&src, &dst).unwrap(), Comparison::ContentDiffers);
        fs::write(&dst, b"abc").unwrap();
        assert_eq!(compare(&src, &dst).unwrap(), Comparison::SizeDiffers);
        fs::write(&dst, b"abcd").unwrap();
        assert_eq!(compare(&src, &dst).unwrap(), Comparison::Identical);
        assert!(!needs_copy(&src, &dst));
    }

    #[test]
    fn unreadable_source_still_reports_needs_copy() {
        let dir = TempDir::new().unwrap();
        let dst = dir.path().join("b.jpg");
        fs::write(&dst, b"abcd").unwrap();
        assert!(needs_copy(&dir.path().join("gone.jpg"), &dst));
    }

    #[test]
    fn sync_creates_updates_then_skips() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("poster.jpg");
        let dst = dir.path().join("out").join("Show").join("poster.jpg");
        fs::write(&src, b"v1").unwrap();

        assert_eq!(sync_file(&src, &dst).unwrap(), SyncOutcome::Copied);
        assert_eq!(fs::read(&dst).unwrap(), b"v1");
        assert_eq!(sync_file(&src, &dst).unwrap(), SyncOutcome::Unchanged);

        fs::write(&src, b"v2").unwrap();
        assert_eq!(sync_file(&src, &dst).unwrap(), SyncOutcome::Updated);
        assert_eq!(fs::read(&dst).unwrap(), b"v2");
    }

    #[test]
    fn copy_keeps_source_mtime() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("poster.jpg");
        let dst = dir.path().join("copy.jpg");
        fs::write(&src, b"img").unwrap();
        let past = std::time::SystemTime::UNIX_EPOCH
            + std::time::Duration::from_secs(1_600_000_000);
        OpenOptions::new()
            .write(true)
            .open(&src)
            .unwrap()
            .set_modified(past)
            .unwrap();

        sync_file(&src, &dst).unwrap();
        let copied = fs::metadata(&dst).unwrap().modified().unwrap();
        assert_eq!(copied, past);
    }
}
