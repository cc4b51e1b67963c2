//! Reader for binary catalogs.
//!
//! Accepts files of either byte order and validates every descriptor before
//! exposing any string, so a truncated or corrupt file is rejected up front.

use serde::Serialize;

use super::{MAGIC, MAGIC_SWAPPED};
use crate::catalog::CatalogEntry;
use crate::error::MoError;

/// The seven header fields, decoded in the file's byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoHeader {
    pub magic: u32,
    pub revision: u32,
    pub count: u32,
    pub origin_table_offset: u32,
    pub translation_table_offset: u32,
    pub hash_table_size: u32,
    pub hash_table_offset: u32,
}

/// A decoded binary catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoCatalog {
    pub header: MoHeader,
    pub big_endian: bool,
    pub entries: Vec<CatalogEntry>,
    #[serde(skip)]
    sorted: bool,
}

struct Cursor<'a> {
    bytes: &'a [u8],
    big_endian: bool,
}

impl Cursor<'_> {
    fn u32_at(&self, at: usize) -> Result<u32, MoError> {
        let end = at.checked_add(4).unwrap_or(usize::MAX);
        let raw: [u8; 4] = self
            .bytes
            .get(at..end)
            .and_then(|s| s.try_into().ok())
            .ok_or(MoError::Truncated {
                needed: end,
                available: self.bytes.len(),
            })?;
        Ok(if self.big_endian {
            u32::from_be_bytes(raw)
        } else {
            u32::from_le_bytes(raw)
        })
    }

    fn string(&self, table: u32, index: usize) -> Result<String, MoError> {
        let at = table as usize + index * 8;
        let len = self.u32_at(at)?;
        let offset = self.u32_at(at + 4)?;
        let start = offset as usize;
        let slice = start
            .checked_add(len as usize)
            .and_then(|end| self.bytes.get(start..end))
            .ok_or(MoError::OutOfBounds {
                index,
                offset,
                len,
                size: self.bytes.len(),
            })?;
        String::from_utf8(slice.to_vec()).map_err(|_| MoError::InvalidUtf8 { index })
    }
}

impl MoCatalog {
    /// Decode a binary catalog from its raw bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self, MoError> {
        let mut cursor = Cursor {
            bytes,
            big_endian: false,
        };
        let magic = cursor.u32_at(0)?;
        match magic {
            MAGIC => {}
            MAGIC_SWAPPED => cursor.big_endian = true,
            other => return Err(MoError::BadMagic(other)),
        }

        let header = MoHeader {
            magic: cursor.u32_at(0)?,
            revision: cursor.u32_at(4)?,
            count: cursor.u32_at(8)?,
            origin_table_offset: cursor.u32_at(12)?,
            translation_table_offset: cursor.u32_at(16)?,
            hash_table_size: cursor.u32_at(20)?,
            hash_table_offset: cursor.u32_at(24)?,
        };

        let count = header.count as usize;
        let mut entries = Vec::with_capacity(count.min(bytes.len() / 16));
        for index in 0..count {
            let key = cursor.string(header.origin_table_offset, index)?;
            let value = cursor.string(header.translation_table_offset, index)?;
            entries.push(CatalogEntry { key, value });
        }

        let sorted = entries
            .windows(2)
            .all(|pair| pair[0].key.as_bytes() <= pair[1].key.as_bytes());

        Ok(Self {
            header,
            big_endian: cursor.big_endian,
            entries,
            sorted,
        })
    }

    /// Read and decode a binary catalog file.
    pub fn open(path: &std::path::Path) -> Result<Self, MoError> {
        let bytes = std::fs::read(path).map_err(|source| MoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&bytes)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the translation for `key`.
    ///
    /// Binary search when the origin table is sorted, linear scan otherwise.
    pub fn get(&self, key: &str) -> Option<&str> {
        let entry = if self.sorted {
            self.entries
                .binary_search_by(|e| e.key.as_bytes().cmp(key.as_bytes()))
                .ok()
                .map(|i| &self.entries[i])
        } else {
            self.entries.iter().find(|e| e.key == key)
        };
        entry.map(|e| e.value.as_str())
    }
}
