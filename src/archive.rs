use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const ARCHIVE_EXTENSION: &str = "zip";
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write archive entry {entry}: {source}")]
    Zip {
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("archive root {path} is not a directory")]
    NotADirectory { path: String },
}

pub fn archive_file_name(id: &str) -> String {
    format!("{id}.{ARCHIVE_EXTENSION}")
}

/// Zips the tree under `root` in memory with every entry nested under `<id>/`.
/// Entries are emitted in file-name order so output is reproducible.
pub fn pack(id: &str, root: &Path) -> Result<Vec<u8>, ArchiveError> {
    if !root.is_dir() {
        return Err(ArchiveError::NotADirectory {
            path: root.display().to_string(),
        });
    }

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| ArchiveError::Walk {
            path: root.display().to_string(),
            source,
        })?;
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let relative = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let name = format!("{id}/{relative}");

        if entry.file_type().is_dir() {
            archive
                .add_directory(name.clone(), options)
                .map_err(|source| ArchiveError::Zip {
                    entry: name,
                    source,
                })?;
        } else if entry.file_type().is_file() {
            let body = fs::read(entry.path()).map_err(|source| ArchiveError::Read {
                path: entry.path().display().to_string(),
                source,
            })?;
            archive
                .start_file(name.clone(), options)
                .map_err(|source| ArchiveError::Zip {
                    entry: name.clone(),
                    source,
                })?;
            archive.write_all(&body).map_err(|source| ArchiveError::Zip {
                entry: name,
                source: source.into(),
            })?;
        }
    }

    let cursor = archive.finish().map_err(|source| ArchiveError::Zip {
        entry: id.to_string(),
        source,
    })?;
    Ok(cursor.into_inner())
}
