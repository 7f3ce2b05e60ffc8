//! Archive emission
//!
//! Walks a completed working area and streams every file into a deflate
//! zip at maximum compression, preserving relative paths. The archive is
//! finalized before the bytes are handed back; a sink failure mid-stream
//! is fatal to the job.

use crate::Result;
use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archives a working area into an in-memory zip
pub fn archive_to_bytes(workdir: &Path) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_archive(workdir, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Streams a working area into the given sink as a zip archive
///
/// Entry names use `/` separators and are relative to the working-area
/// root. Entries are added in sorted order so the same tree always
/// produces the same archive layout.
pub fn write_archive<W: Write + Seek>(workdir: &Path, sink: W) -> Result<()> {
    let mut zip = ZipWriter::new(sink);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));

    add_directory(&mut zip, workdir, workdir, options)?;

    zip.finish()?;
    Ok(())
}

fn add_directory<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    dir: &Path,
    root: &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            add_directory(zip, &path, root, options)?;
        } else {
            zip.start_file(entry_name(&path, root), options)?;
            let mut file = File::open(&path)?;
            std::io::copy(&mut file, zip)?;
        }
    }

    Ok(())
}

/// Builds the archive-relative entry name for a file
fn entry_name(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn read_names(bytes: &[u8]) -> HashSet<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_archive_preserves_relative_paths() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        std::fs::create_dir_all(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/site.css"), "body {}").unwrap();

        let bytes = archive_to_bytes(dir.path()).unwrap();
        let names = read_names(&bytes);

        assert_eq!(
            names,
            HashSet::from(["index.html".to_string(), "css/site.css".to_string()])
        );
    }

    #[test]
    fn test_archive_round_trips_content() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("page.html"), "mirrored content").unwrap();

        let bytes = archive_to_bytes(dir.path()).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entry = archive.by_name("page.html").unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();

        assert_eq!(content, "mirrored content");
    }

    #[test]
    fn test_empty_working_area_archives_cleanly() {
        let dir = TempDir::new().unwrap();
        let bytes = archive_to_bytes(dir.path()).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn test_deeply_nested_tree() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("assets/cdn.example.com/img");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("logo.png"), [0u8; 32]).unwrap();

        let bytes = archive_to_bytes(dir.path()).unwrap();
        let names = read_names(&bytes);

        assert!(names.contains("assets/cdn.example.com/img/logo.png"));
    }
}
