//! EPUB writer. Turns a [Document](crate::model::Document) into a [Package] and writes the OCF
//! container (mimetype, container.xml, OPF, nav, NCX, chapter, stylesheet).
//!
//! The archive is written to `<path>.part` and renamed onto `path` once complete, so a failed
//! write never leaves a file at `path`.

mod package;

pub use package::{
    identifier_for, Package, TocEntry, AUTHOR, CHAPTER_FILE, LANGUAGE, NAV_FILE, NCX_FILE,
    STYLESHEET_FILE,
};

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTAINER_XML: &[u8] = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<container version=\"1.0\" xmlns=\"urn:oasis:names:tc:opendocument:xmlns:container\">\n  <rootfiles>\n    <rootfile full-path=\"OEBPS/content.opf\" media-type=\"application/oebps-package+xml\"/>\n  </rootfiles>\n</container>";

const MIMETYPE: &[u8] = b"application/epub+zip";
const OEBPS_PREFIX: &str = "OEBPS/";

/// Errors from the EPUB writer. Maps to CLI exit code 3.
#[derive(Debug, Error)]
pub enum EpubError {
    #[error("Failed to create EPUB file: {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write EPUB: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write EPUB archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to move {from} into place at {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for EpubError {
    fn from(e: std::io::Error) -> Self {
        EpubError::Zip(zip::result::ZipError::Io(e))
    }
}

/// Path of the in-progress archive: `path` with `.part` appended.
pub fn part_path(path: &Path) -> PathBuf {
    let mut o = path.as_os_str().to_owned();
    o.push(".part");
    PathBuf::from(o)
}

/// Write `package` to `path`. On failure the partial `.part` file is removed.
pub fn write_epub(package: &Package, path: &Path) -> Result<(), EpubError> {
    let temp = part_path(path);
    let result = write_archive(package, &temp).and_then(|()| {
        std::fs::rename(&temp, path).map_err(|e| EpubError::Rename {
            from: temp.clone(),
            to: path.to_path_buf(),
            source: e,
        })
    });
    match &result {
        Ok(()) => tracing::debug!(path = %path.display(), "wrote epub"),
        Err(_) => {
            if let Err(e) = std::fs::remove_file(&temp) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %temp.display(), error = %e, "could not remove partial file");
                }
            }
        }
    }
    result
}

fn write_archive(package: &Package, path: &Path) -> Result<(), EpubError> {
    let file = File::create(path).map_err(|e| EpubError::CreateFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut zip = ZipWriter::new(file);

    let options_stored = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o644);
    let options_deflate = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    // Mimetype first, uncompressed (required by OCF)
    zip.start_file("mimetype", options_stored)?;
    zip.write_all(MIMETYPE)?;

    zip.start_file("META-INF/container.xml", options_deflate)?;
    zip.write_all(CONTAINER_XML)?;

    let entries: [(&str, String); 5] = [
        ("content.opf", package.opf()),
        (NAV_FILE, package.nav()),
        (NCX_FILE, package.ncx()),
        (CHAPTER_FILE, package.chapter.clone()),
        (STYLESHEET_FILE, package.stylesheet.clone()),
    ];
    for (name, body) in &entries {
        zip.start_file(format!("{}{}", OEBPS_PREFIX, name), options_deflate)?;
        zip.write_all(body.as_bytes())?;
    }

    let file = zip.finish()?;
    file.sync_all().map_err(|e| EpubError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
