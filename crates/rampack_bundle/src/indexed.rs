//! Indexed bundle encoder.
//!
//! Artifact layout, all words little-endian u32:
//!
//! ```text
//! magic number        char[4]   0xE5 0xD1 0x0B 0xFB (0xFB0BD1E5 u32 LE)
//! min_id              u32       smallest tabled module id
//! num_entries         u32       max_id - min_id + 1 (0 when no lazy modules)
//! startup_code_len    u32       startup blob length incl. trailing null
//! entries             (u32, u32) per id in [min_id, max_id]:
//!                               offset and length into the code blob
//! code blob           char[]    null-terminated code sections, starting
//!                               with the startup code
//! ```
//!
//! Entry offsets are relative to the start of the code blob, so the
//! startup code sits at offset 0 and the first lazy blob at
//! `startup_code_len`. Ids with no module keep an all-zero entry; every
//! group member's entry aliases its head's offset and length.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::encoding::BundleEncoding;
use crate::groups::ModuleGroups;
use crate::module::ModuleRecord;

/// Magic number identifying the indexed-bundle format.
pub const MAGIC_NUMBER: u32 = 0xFB0B_D1E5;

/// Size of one table word in bytes.
pub(crate) const SIZEOF_U32: usize = 4;

/// Header words before the entries region: min_id, num_entries,
/// startup_code_len.
pub(crate) const HEADER_WORDS: usize = 3;

/// Byte offset of entry `n` within the table.
pub(crate) fn entry_offset(n: usize) -> usize {
    // Each entry is two u32s, after the three header words.
    (HEADER_WORDS + n * 2) * SIZEOF_U32
}

/// Encodes a code string and appends the null terminator.
fn null_terminated(code: &str, encoding: BundleEncoding) -> Vec<u8> {
    let mut bytes = encoding.encode(code);
    bytes.push(0);
    bytes
}

/// Writes a little-endian u32 at a byte offset in the table.
fn write_u32_at(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + SIZEOF_U32].copy_from_slice(&value.to_le_bytes());
}

/// Serializes a startup code string and a set of lazy modules into the
/// indexed bundle layout.
///
/// `groups` maps head ids to the member ids co-located with them; heads
/// are encoded once with their members' code concatenated, and member
/// table entries alias the head's. Duplicate ids across heads are a
/// caller contract violation: the later entry wins, with a warning.
pub fn build_bundle(
    startup_code: &str,
    lazy_modules: &[ModuleRecord],
    groups: &BTreeMap<u64, BTreeSet<u64>>,
    encoding: BundleEncoding,
) -> Vec<u8> {
    let resolved = ModuleGroups::new(groups, lazy_modules);
    let startup_blob = null_terminated(startup_code, encoding);

    // Heads in encounter order; members are only ever embedded.
    let mut seen = HashSet::new();
    let mut head_blobs: Vec<(u64, Vec<u8>)> = Vec::new();
    for module in lazy_modules.iter().filter(|m| !resolved.is_member(m.id)) {
        if !seen.insert(module.id) {
            log::warn!(
                "duplicate module id {} in bundle input, later entry wins",
                module.id
            );
        }
        let blob = null_terminated(&resolved.group_code(module), encoding);
        head_blobs.push((module.id, blob));
    }

    let tabled = resolved.tabled_ids();
    let (min_id, num_entries) = match (tabled.first(), tabled.last()) {
        (Some(&min), Some(&max)) => (min, (max - min + 1) as usize),
        _ => (0, 0),
    };

    let mut table = vec![0u8; entry_offset(num_entries)];
    write_u32_at(&mut table, 0, min_id as u32);
    write_u32_at(&mut table, SIZEOF_U32, num_entries as u32);
    write_u32_at(&mut table, 2 * SIZEOF_U32, startup_blob.len() as u32);

    let mut code_offset = startup_blob.len();
    for (id, blob) in &head_blobs {
        for tabled_id in resolved.ids_in_group(*id) {
            let slot = entry_offset((tabled_id - min_id) as usize);
            write_u32_at(&mut table, slot, code_offset as u32);
            write_u32_at(&mut table, slot + SIZEOF_U32, blob.len() as u32);
        }
        code_offset += blob.len();
    }

    let blob_total: usize = head_blobs.iter().map(|(_, b)| b.len()).sum();
    let mut out =
        Vec::with_capacity(SIZEOF_U32 + table.len() + startup_blob.len() + blob_total);
    out.extend_from_slice(&MAGIC_NUMBER.to_le_bytes());
    out.extend_from_slice(&table);
    out.extend_from_slice(&startup_blob);
    for (_, blob) in &head_blobs {
        out.extend_from_slice(blob);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleType;
    use crate::reader::read_table;

    fn record(id: u64, code: &str) -> ModuleRecord {
        ModuleRecord {
            id,
            code: code.to_string(),
            source_path: format!("/app/{id}.js"),
            name: format!("{id}.js"),
            module_type: ModuleType::Module,
            map: None,
        }
    }

    fn no_groups() -> BTreeMap<u64, BTreeSet<u64>> {
        BTreeMap::new()
    }

    #[test]
    fn starts_with_magic() {
        let bytes = build_bundle("S", &[], &no_groups(), BundleEncoding::Utf8);
        assert_eq!(&bytes[..4], &MAGIC_NUMBER.to_le_bytes());
        assert_eq!(&bytes[..4], &[0xE5, 0xD1, 0x0B, 0xFB]);
    }

    #[test]
    fn round_trip_basic() {
        let modules = vec![record(5, "A"), record(7, "B")];
        let bytes = build_bundle("START", &modules, &no_groups(), BundleEncoding::Utf8);

        let table = read_table(&bytes).unwrap();
        assert_eq!(table.min_id, 5);
        assert_eq!(table.num_entries, 3);
        assert_eq!(table.startup_code_len, "START\0".len() as u32);

        assert_eq!(table.startup_code(&bytes).unwrap(), b"START\0");
        assert_eq!(table.module_code(&bytes, 5).unwrap(), b"A\0");
        assert_eq!(table.module_code(&bytes, 7).unwrap(), b"B\0");

        // The gap id is zeroed.
        let gap = table.entry_for(6).unwrap();
        assert_eq!((gap.offset, gap.length), (0, 0));
    }

    #[test]
    fn zero_lazy_modules_has_empty_table() {
        let bytes = build_bundle("S", &[], &no_groups(), BundleEncoding::Utf8);
        let table = read_table(&bytes).unwrap();
        assert_eq!(table.num_entries, 0);
        assert_eq!(table.startup_code(&bytes).unwrap(), b"S\0");
        // magic + 3 header words + startup blob, nothing else
        assert_eq!(bytes.len(), 4 + 12 + 2);
    }

    #[test]
    fn grouped_members_share_head_entry() {
        let modules = vec![record(10, "Y"), record(11, "X")];
        let groups: BTreeMap<u64, BTreeSet<u64>> =
            [(10u64, BTreeSet::from([11u64]))].into_iter().collect();
        let bytes = build_bundle("S", &modules, &groups, BundleEncoding::Utf8);

        let table = read_table(&bytes).unwrap();
        assert_eq!(table.module_code(&bytes, 10).unwrap(), b"Y\nX\0");

        let head = table.entry_for(10).unwrap();
        let member = table.entry_for(11).unwrap();
        assert_eq!((head.offset, head.length), (member.offset, member.length));
    }

    #[test]
    fn member_absent_from_module_list_is_empty_contribution() {
        let modules = vec![record(10, "Y")];
        let groups: BTreeMap<u64, BTreeSet<u64>> =
            [(10u64, BTreeSet::from([11u64]))].into_iter().collect();
        let bytes = build_bundle("S", &modules, &groups, BundleEncoding::Utf8);

        let table = read_table(&bytes).unwrap();
        assert_eq!(table.module_code(&bytes, 10).unwrap(), b"Y\n\0");
        // The unbacked member is still tabled and aliases the head.
        assert_eq!(table.num_entries, 2);
        let head = table.entry_for(10).unwrap();
        let member = table.entry_for(11).unwrap();
        assert_eq!((head.offset, head.length), (member.offset, member.length));
    }

    #[test]
    fn offsets_relative_to_code_region() {
        let modules = vec![record(1, "AA"), record(2, "BBB")];
        let bytes = build_bundle("S", &modules, &no_groups(), BundleEncoding::Utf8);

        let table = read_table(&bytes).unwrap();
        let first = table.entry_for(1).unwrap();
        let second = table.entry_for(2).unwrap();
        // First blob sits right after the startup code.
        assert_eq!(first.offset, table.startup_code_len);
        assert_eq!(first.length, 3);
        assert_eq!(second.offset, first.offset + first.length);
        assert_eq!(second.length, 4);
    }

    #[test]
    fn deterministic() {
        let modules = vec![record(1, "a"), record(3, "b")];
        let a = build_bundle("S", &modules, &no_groups(), BundleEncoding::Utf8);
        let b = build_bundle("S", &modules, &no_groups(), BundleEncoding::Utf8);
        assert_eq!(a, b);
    }

    #[test]
    fn single_module_table() {
        let modules = vec![record(42, "only")];
        let bytes = build_bundle("S", &modules, &no_groups(), BundleEncoding::Utf8);
        let table = read_table(&bytes).unwrap();
        assert_eq!(table.min_id, 42);
        assert_eq!(table.num_entries, 1);
        assert_eq!(table.module_code(&bytes, 42).unwrap(), b"only\0");
    }

    #[test]
    fn utf16_startup_length_counts_bytes() {
        let bytes = build_bundle("AB", &[], &no_groups(), BundleEncoding::Utf16Le);
        let table = read_table(&bytes).unwrap();
        // Two UTF-16 code units plus the single null terminator byte.
        assert_eq!(table.startup_code_len, 5);
    }

    #[test]
    fn duplicate_head_id_last_wins() {
        let modules = vec![record(1, "first"), record(1, "second")];
        let bytes = build_bundle("S", &modules, &no_groups(), BundleEncoding::Utf8);
        let table = read_table(&bytes).unwrap();
        assert_eq!(table.module_code(&bytes, 1).unwrap(), b"second\0");
    }
}
