use std::path::Path;
use tracing::debug;

use super::{DESCRIPTOR_SIZE, HEADER_SIZE, MAGIC, REVISION};
use crate::catalog::TranslationCatalog;
use crate::error::MoError;

/// Location of one string inside the blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringDescriptor {
    pub length: u32,
    pub offset: u32,
}

/// Fully computed binary catalog, ready to be encoded.
///
/// Building a layout validates every length and offset against the 32-bit
/// fields of the format, so encoding it can no longer fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoLayout {
    origins: Vec<StringDescriptor>,
    translations: Vec<StringDescriptor>,
    blob: Vec<u8>,
}

fn to_u32(what: &'static str, len: usize) -> Result<u32, MoError> {
    u32::try_from(len).map_err(|_| MoError::SizeOverflow { what, len })
}

/// Lay strings of the given lengths out back to back from `start`.
///
/// Fails if a length, or the offset where any string ends, does not fit in
/// a `u32`.
fn assign_offsets(
    start: u32,
    lengths: impl IntoIterator<Item = (&'static str, usize)>,
) -> Result<Vec<StringDescriptor>, MoError> {
    let mut cursor = start;
    let mut descriptors = Vec::new();
    for (what, len) in lengths {
        let length = to_u32(what, len)?;
        descriptors.push(StringDescriptor {
            length,
            offset: cursor,
        });
        cursor = cursor.checked_add(length).ok_or(MoError::SizeOverflow {
            what: "binary catalog",
            len: (cursor as usize).saturating_add(len),
        })?;
    }
    Ok(descriptors)
}

impl MoLayout {
    /// Compute descriptors and blob for `catalog`, in catalog order.
    pub fn build(catalog: &TranslationCatalog) -> Result<Self, MoError> {
        let count = catalog.len();
        let tables_size = count
            .checked_mul(2 * DESCRIPTOR_SIZE as usize)
            .and_then(|size| size.checked_add(HEADER_SIZE as usize))
            .ok_or(MoError::SizeOverflow {
                what: "offset table",
                len: count,
            })?;
        let blob_start = to_u32("offset table", tables_size)?;

        // All keys first, then all values.
        let keys = catalog.iter().map(|(key, _)| ("key", key.as_bytes()));
        let values = catalog.iter().map(|(_, value)| ("value", value.as_bytes()));
        let strings: Vec<_> = keys.chain(values).collect();

        let lengths = strings.iter().map(|(what, bytes)| (*what, bytes.len()));
        let mut origins = assign_offsets(blob_start, lengths)?;
        let translations = origins.split_off(count);
        let blob = strings.iter().flat_map(|(_, bytes)| bytes.iter().copied()).collect();

        Ok(Self {
            origins,
            translations,
            blob,
        })
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    pub fn origins(&self) -> &[StringDescriptor] {
        &self.origins
    }

    pub fn translations(&self) -> &[StringDescriptor] {
        &self.translations
    }

    /// Offset of the translation descriptor table.
    pub fn translation_table_offset(&self) -> u32 {
        HEADER_SIZE + self.len() as u32 * DESCRIPTOR_SIZE
    }

    /// Total size of the encoded file in bytes.
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE as usize + self.len() * 2 * DESCRIPTOR_SIZE as usize + self.blob.len()
    }

    /// Render the file contents.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        let header = [
            MAGIC,
            REVISION,
            self.len() as u32,
            HEADER_SIZE,
            self.translation_table_offset(),
            0, // hash table size
            0, // hash table offset
        ];
        for field in header {
            out.extend_from_slice(&field.to_le_bytes());
        }
        for descriptor in self.origins.iter().chain(&self.translations) {
            out.extend_from_slice(&descriptor.length.to_le_bytes());
            out.extend_from_slice(&descriptor.offset.to_le_bytes());
        }
        out.extend_from_slice(&self.blob);
        out
    }
}

/// Compile `catalog` into a binary catalog at `path`.
///
/// All sizes are validated before anything touches the disk, so an oversized
/// catalog leaves no file behind. Parent directories are created as needed and
/// an existing file is overwritten. Returns the number of bytes written.
pub fn write_catalog(catalog: &TranslationCatalog, path: &Path) -> Result<usize, MoError> {
    let layout = MoLayout::build(catalog)?;
    let bytes = layout.encode();

    let io_err = |source| MoError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, &bytes).map_err(io_err)?;

    debug!(
        "Wrote {} entries ({} bytes) to {}",
        layout.len(),
        bytes.len(),
        path.display()
    );
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn read_u32(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    fn login_catalog() -> TranslationCatalog {
        vec![
            CatalogEntry::new("Sign In", "تسجيل الدخول"),
            CatalogEntry::new("Password", "كلمة المرور"),
        ]
        .into_iter()
        .collect()
    }

    // ==================== Header Tests ====================

    #[test]
    fn test_empty_catalog_is_bare_header() {
        let bytes = MoLayout::build(&TranslationCatalog::new()).unwrap().encode();
        let expected: Vec<u8> = [MAGIC, 0, 0, 28, 28, 0, 0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        assert_eq!(bytes.len(), 28);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_magic_bytes_little_endian() {
        let bytes = MoLayout::build(&TranslationCatalog::new()).unwrap().encode();
        assert_eq!(&bytes[..4], &[0xde, 0x12, 0x04, 0x95]);
    }

    #[test]
    fn test_header_fields_for_two_entries() {
        let bytes = MoLayout::build(&login_catalog()).unwrap().encode();
        assert_eq!(read_u32(&bytes, 0), MAGIC);
        assert_eq!(read_u32(&bytes, 4), 0);
        assert_eq!(read_u32(&bytes, 8), 2);
        assert_eq!(read_u32(&bytes, 12), 28);
        assert_eq!(read_u32(&bytes, 16), 28 + 2 * 8);
        assert_eq!(read_u32(&bytes, 20), 0);
        assert_eq!(read_u32(&bytes, 24), 0);
    }

    // ==================== Layout Tests ====================

    #[test]
    fn test_login_layout_sizes_and_offsets() {
        let catalog = login_catalog();
        let layout = MoLayout::build(&catalog).unwrap();
        let bytes = layout.encode();

        let strings_len: usize = catalog.iter().map(|(k, v)| k.len() + v.len()).sum();
        assert_eq!(bytes.len(), 28 + 2 * 16 + strings_len);
        assert_eq!(layout.encoded_len(), bytes.len());

        // Keys first, then values, contiguous.
        let blob_start = 28 + 2 * 16;
        assert_eq!(
            layout.origins()[0],
            StringDescriptor {
                length: "Sign In".len() as u32,
                offset: blob_start
            }
        );
        assert_eq!(layout.origins()[1].offset, blob_start + "Sign In".len() as u32);
        assert_eq!(
            layout.translations()[0].offset,
            blob_start + ("Sign In".len() + "Password".len()) as u32
        );
    }

    #[test]
    fn test_descriptors_point_at_their_bytes() {
        let catalog = login_catalog();
        let layout = MoLayout::build(&catalog).unwrap();
        let bytes = layout.encode();

        for (i, (key, value)) in catalog.iter().enumerate() {
            let o = layout.origins()[i];
            let t = layout.translations()[i];
            let key_bytes = &bytes[o.offset as usize..(o.offset + o.length) as usize];
            let value_bytes = &bytes[t.offset as usize..(t.offset + t.length) as usize];
            assert_eq!(key_bytes, key.as_bytes());
            assert_eq!(value_bytes, value.as_bytes());
        }
    }

    #[test]
    fn test_no_terminators_between_strings() {
        let bytes = MoLayout::build(&login_catalog()).unwrap().encode();
        let blob = &bytes[28 + 32..];
        assert!(!blob.contains(&0));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let catalog = login_catalog();
        let first = MoLayout::build(&catalog).unwrap().encode();
        let second = MoLayout::build(&catalog).unwrap().encode();
        assert_eq!(first, second);
    }

    // ==================== Overflow Tests ====================

    #[test]
    fn test_to_u32_accepts_max() {
        assert_eq!(to_u32("key", u32::MAX as usize).unwrap(), u32::MAX);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_to_u32_rejects_oversized_length() {
        let err = to_u32("value", u32::MAX as usize + 1).unwrap_err();
        assert!(matches!(err, MoError::SizeOverflow { what: "value", .. }));
    }

    #[test]
    fn test_assign_offsets_are_contiguous() {
        let descriptors = assign_offsets(60, [("key", 3), ("key", 0), ("value", 5)]).unwrap();
        let offsets: Vec<_> = descriptors.iter().map(|d| (d.length, d.offset)).collect();
        assert_eq!(offsets, vec![(3, 60), (0, 63), (5, 63)]);
    }

    #[test]
    fn test_assign_offsets_may_end_exactly_at_max() {
        let descriptors = assign_offsets(u32::MAX - 4, [("key", 2), ("value", 2)]).unwrap();
        assert_eq!(descriptors[1].offset, u32::MAX - 2);
    }

    #[test]
    fn test_assign_offsets_rejects_cumulative_overflow() {
        // Each string fits in a u32 on its own; their running end does not.
        let err = assign_offsets(u32::MAX - 4, [("key", 3), ("value", 3)]).unwrap_err();
        assert!(matches!(
            err,
            MoError::SizeOverflow {
                what: "binary catalog",
                ..
            }
        ));
    }

    // ==================== write_catalog Tests ====================

    #[test]
    fn test_write_catalog_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ar").join("LC_MESSAGES").join("messages.mo");

        let written = write_catalog(&login_catalog(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), written);
        assert_eq!(read_u32(&bytes, 8), 2);
    }

    #[test]
    fn test_write_catalog_overwrites_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("messages.mo");
        std::fs::write(&path, vec![0xAA; 4096]).unwrap();

        write_catalog(&TranslationCatalog::new(), &path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap().len(), 28);
    }
}
