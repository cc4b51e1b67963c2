//! Binary catalog (`.mo`) format.
//!
//! All integers are little-endian `u32`. The file is a 28-byte header, the
//! origin-string descriptor table, the translation-string descriptor table,
//! then one blob holding every key followed by every value. No hash index is
//! emitted.

mod reader;
mod writer;

pub use reader::{MoCatalog, MoHeader};
pub use writer::{write_catalog, MoLayout, StringDescriptor};

/// Magic number identifying a little-endian binary catalog.
pub const MAGIC: u32 = 0x950412de;

/// Magic number as it reads when the file was written big-endian.
pub const MAGIC_SWAPPED: u32 = 0xde120495;

/// Format revision written in the header.
pub const REVISION: u32 = 0;

/// Size of the fixed header (seven `u32` fields).
pub const HEADER_SIZE: u32 = 28;

/// Size of one `{ length, offset }` descriptor.
pub const DESCRIPTOR_SIZE: u32 = 8;

/// Conventional extension of compiled catalogs.
pub const MO_EXTENSION: &str = "mo";

/// Conventional extension of catalog sources.
pub const PO_EXTENSION: &str = "po";
