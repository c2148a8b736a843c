//! In-memory EPUB archive
//!
//! The whole archive is read into memory, edited entry by entry and written
//! back out. Entry order is kept, except that `mimetype` is always written
//! first and stored uncompressed as the OCF container format requires.

use crate::types::{EpubError, Result};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const MIMETYPE_ENTRY: &str = "mimetype";
pub const EPUB_MIMETYPE: &str = "application/epub+zip";

/// Deflate level used when the caller has no preference
pub const DEFAULT_COMPRESSION_LEVEL: i64 = 6;

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EpubArchive {
    entries: Vec<Entry>,
}

impl EpubArchive {
    /// Read every entry of a zip archive
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            entries.push(Entry {
                name: file.name().to_string(),
                data,
                is_dir: file.is_dir(),
            });
        }

        log::debug!("Opened archive with {} entries", entries.len());
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Entry names in archive order
    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn read_entry(&self, name: &str) -> Option<&[u8]> {
        self.entry(name).map(|entry| entry.data.as_slice())
    }

    /// Entry decoded as UTF-8, `None` when absent
    pub fn read_text(&self, name: &str) -> Result<Option<String>> {
        self.read_entry(name)
            .map(|data| -> Result<String> { Ok(std::str::from_utf8(data)?.to_string()) })
            .transpose()
    }

    /// Insert an entry or overwrite it in place
    pub fn write_entry(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(Entry {
                name: name.to_string(),
                data,
                is_dir: false,
            }),
        }
    }

    /// Remove an entry, returning whether it existed
    pub fn remove_entry(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.name != name);
        self.entries.len() != before
    }

    /// Serialize the archive with deflate at `compression_level` (0-9)
    pub fn to_bytes(&self, compression_level: i64) -> Result<Vec<u8>> {
        if !(0..=9).contains(&compression_level) {
            return Err(EpubError::CompressionLevel(compression_level));
        }

        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level));

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        if let Some(mimetype) = self.entry(MIMETYPE_ENTRY) {
            writer.start_file(MIMETYPE_ENTRY, stored)?;
            writer.write_all(&mimetype.data)?;
        }

        for entry in self.entries.iter().filter(|e| e.name != MIMETYPE_ENTRY) {
            if entry.is_dir {
                writer.add_directory(entry.name.as_str(), deflated)?;
            } else {
                writer.start_file(entry.name.as_str(), deflated)?;
                writer.write_all(&entry.data)?;
            }
        }

        Ok(writer.finish()?.into_inner())
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}
