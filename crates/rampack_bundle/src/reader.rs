//! Offset-table reader for produced artifacts.
//!
//! Producer-side tooling only: backs the CLI `inspect` subcommand and the
//! encoder tests. It validates the magic number and table bounds, then
//! exposes the header words and entries; it does not execute or load
//! modules.

use crate::error::BundleError;
use crate::indexed::{entry_offset, MAGIC_NUMBER, SIZEOF_U32};

/// One offset-table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableEntry {
    /// Byte offset into the code blob.
    pub offset: u32,
    /// Byte length of the code section, including the trailing null.
    pub length: u32,
}

/// The decoded offset table of an indexed bundle.
#[derive(Debug)]
pub struct BundleTable {
    /// Smallest tabled module id.
    pub min_id: u32,
    /// Number of entries (`max_id - min_id + 1`, or 0).
    pub num_entries: u32,
    /// Byte length of the startup blob, including the trailing null.
    pub startup_code_len: u32,
    /// Entries for every id in `[min_id, min_id + num_entries)`.
    pub entries: Vec<TableEntry>,
}

impl BundleTable {
    /// Byte position where the code blob begins within the artifact.
    pub fn code_region_start(&self) -> usize {
        SIZEOF_U32 + entry_offset(self.num_entries as usize)
    }

    /// Returns the entry for a module id, or `None` if it is outside the
    /// table range.
    pub fn entry_for(&self, id: u32) -> Option<&TableEntry> {
        let index = id.checked_sub(self.min_id)? as usize;
        self.entries.get(index)
    }

    /// Slices the startup code (null terminator included) out of the
    /// artifact bytes.
    pub fn startup_code<'a>(&self, bytes: &'a [u8]) -> Option<&'a [u8]> {
        let start = self.code_region_start();
        bytes.get(start..start + self.startup_code_len as usize)
    }

    /// Slices a module's code section (null terminator included) out of
    /// the artifact bytes. `None` for ids outside the table or with a
    /// zeroed entry.
    pub fn module_code<'a>(&self, bytes: &'a [u8], id: u32) -> Option<&'a [u8]> {
        let entry = self.entry_for(id)?;
        if entry.length == 0 {
            return None;
        }
        let start = self.code_region_start() + entry.offset as usize;
        bytes.get(start..start + entry.length as usize)
    }
}

/// Reads a u32 word at a byte offset.
fn read_u32_at(bytes: &[u8], offset: usize) -> Option<u32> {
    let word = bytes.get(offset..offset + SIZEOF_U32)?;
    Some(u32::from_le_bytes(word.try_into().ok()?))
}

/// Decodes the offset table of an indexed bundle artifact.
pub fn read_table(bytes: &[u8]) -> Result<BundleTable, BundleError> {
    let magic = read_u32_at(bytes, 0).ok_or_else(|| BundleError::Malformed {
        reason: "file shorter than the magic number".to_string(),
    })?;
    if magic != MAGIC_NUMBER {
        return Err(BundleError::Malformed {
            reason: format!("bad magic number {magic:#010x}"),
        });
    }

    let header = |word: usize| {
        read_u32_at(bytes, SIZEOF_U32 * (1 + word)).ok_or_else(|| BundleError::Malformed {
            reason: "file shorter than the table header".to_string(),
        })
    };
    let min_id = header(0)?;
    let num_entries = header(1)?;
    let startup_code_len = header(2)?;

    // The header word is untrusted input: check that the claimed table
    // fits in the file before sizing any allocation by it.
    let table_end = SIZEOF_U32 + entry_offset(num_entries as usize);
    if table_end > bytes.len() {
        return Err(BundleError::Malformed {
            reason: format!(
                "table truncated: {num_entries} entries need {table_end} bytes, file has {}",
                bytes.len()
            ),
        });
    }

    let mut entries = Vec::with_capacity(num_entries as usize);
    for n in 0..num_entries as usize {
        let slot = SIZEOF_U32 + entry_offset(n);
        let offset = read_u32_at(bytes, slot);
        let length = read_u32_at(bytes, slot + SIZEOF_U32);
        match (offset, length) {
            (Some(offset), Some(length)) => entries.push(TableEntry { offset, length }),
            _ => {
                return Err(BundleError::Malformed {
                    reason: format!("table truncated at entry {n} of {num_entries}"),
                })
            }
        }
    }

    Ok(BundleTable {
        min_id,
        num_entries,
        startup_code_len,
        entries,
    })
}
