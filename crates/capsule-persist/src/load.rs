use std::io::Cursor;

use capsule_core::{BlockEntry, BlockProperties, Blueprint};
use glam::IVec3;
use quartz_nbt::io::{read_nbt, Flavor};
use quartz_nbt::{NbtCompound, NbtList, NbtTag};

use crate::compat;
use crate::compress;
use crate::error::PersistError;
use crate::format::*;

/// Header-level facts about a stored blueprint, readable without
/// decompressing the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueprintSummary {
    pub name: String,
    pub size: IVec3,
    pub block_count: u32,
}

/// Parse and validate the fixed header at the start of `bytes`.
pub fn read_header(bytes: &[u8]) -> Result<BlueprintHeader, PersistError> {
    if bytes.len() < HEADER_SIZE {
        return Err(PersistError::FileTooSmall(bytes.len(), HEADER_SIZE));
    }

    // File bytes carry no alignment guarantee.
    let header: BlueprintHeader = bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]);
    compat::validate_header(&header)?;
    Ok(header)
}

/// Read the name stored after `header`. Returns the name and the offset
/// at which the compressed payload starts.
pub fn read_name(header: &BlueprintHeader, bytes: &[u8]) -> Result<(String, usize), PersistError> {
    let end = HEADER_SIZE + header.name_len as usize;
    if bytes.len() < end {
        return Err(PersistError::FileTooSmall(bytes.len(), end));
    }
    let name = std::str::from_utf8(&bytes[HEADER_SIZE..end])
        .map_err(|_| PersistError::MalformedHeaderName)?;
    Ok((name.to_string(), end))
}

/// Read only the summary fields of a blueprint file. `bytes` needs to hold
/// the header and the name that follows it; the payload is not touched.
pub fn read_summary(bytes: &[u8]) -> Result<BlueprintSummary, PersistError> {
    let header = read_header(bytes)?;
    let (name, _) = read_name(&header, bytes)?;
    Ok(BlueprintSummary {
        name,
        size: IVec3::from_array(header.size),
        block_count: header.block_count,
    })
}

/// Decode a blueprint from the capsule binary format.
pub fn decode(bytes: &[u8]) -> Result<Blueprint, PersistError> {
    let header = read_header(bytes)?;
    let (_, payload_start) = read_name(&header, bytes)?;
    let payload =
        compress::decompress_payload(&bytes[payload_start..], header.payload_len as usize)?;

    let (root, _) = read_nbt(&mut Cursor::new(payload), Flavor::Uncompressed)
        .map_err(|e| PersistError::Nbt(e.to_string()))?;

    let blueprint = from_compound(&root);
    if blueprint.block_count() != header.block_count as usize {
        log::warn!(
            "blueprint '{}': header lists {} blocks, payload decoded {}",
            blueprint.name,
            header.block_count,
            blueprint.block_count()
        );
    }
    Ok(blueprint)
}

/// Rebuild a blueprint from its NBT compound.
///
/// Decoding is tolerant: a missing name reads as empty, missing or
/// non-positive sizes read as 1, list items that are not compounds are
/// skipped, missing coordinates read as 0, and non-string property values
/// are dropped.
pub fn from_compound(root: &NbtCompound) -> Blueprint {
    let name = root.get::<_, &str>("name").unwrap_or_default().to_string();
    let size = IVec3::new(
        read_extent(root, "sizeX", &name),
        read_extent(root, "sizeY", &name),
        read_extent(root, "sizeZ", &name),
    );

    let mut entries = Vec::new();
    if let Ok(blocks) = root.get::<_, &NbtList>("blocks") {
        entries.reserve(blocks.len());
        for tag in blocks.iter() {
            let NbtTag::Compound(block) = tag else {
                log::debug!("blueprint '{name}': skipping non-compound block entry");
                continue;
            };
            entries.push(read_entry(block));
        }
    }

    Blueprint::new(name, size, entries)
}

fn read_extent(root: &NbtCompound, key: &str, name: &str) -> i32 {
    match root.get::<_, i32>(key) {
        Ok(v) if v >= 1 => v,
        Ok(v) => {
            log::warn!("blueprint '{name}': {key} = {v} is not positive, using 1");
            1
        }
        Err(_) => {
            log::warn!("blueprint '{name}': missing {key}, using 1");
            1
        }
    }
}

fn read_entry(block: &NbtCompound) -> BlockEntry {
    let pos = IVec3::new(
        block.get::<_, i32>("x").unwrap_or(0),
        block.get::<_, i32>("y").unwrap_or(0),
        block.get::<_, i32>("z").unwrap_or(0),
    );
    let id = block.get::<_, &str>("block").unwrap_or_default();

    let mut properties = BlockProperties::new();
    if let Ok(props) = block.get::<_, &NbtCompound>("properties") {
        for (key, value) in props {
            if let NbtTag::String(value) = value {
                properties.insert(key.clone(), value.clone());
            }
        }
    }

    BlockEntry::new(pos, id, properties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save;

    fn sample() -> Blueprint {
        let mut props = BlockProperties::new();
        props.insert("axis".to_string(), "x".to_string());
        Blueprint::new(
            "tower",
            IVec3::new(3, 4, 2),
            vec![
                BlockEntry::new(IVec3::new(0, 0, 0), "minecraft:stone", BlockProperties::new()),
                BlockEntry::new(IVec3::new(2, 3, 1), "minecraft:oak_log", props.clone()),
                BlockEntry::new(IVec3::new(1, 1, 0), "minecraft:oak_log", props),
            ],
        )
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let original = sample();
        let bytes = save::encode(&original).expect("encode");
        let decoded = decode(&bytes).expect("decode");
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_summary_matches_header() {
        let bytes = save::encode(&sample()).expect("encode");
        let summary = read_summary(&bytes[..HEADER_SIZE + 5]).expect("summary");
        assert_eq!(summary.name, "tower");
        assert_eq!(summary.size, IVec3::new(3, 4, 2));
        assert_eq!(summary.block_count, 3);
    }

    #[test]
    fn test_too_small_rejected() {
        let result = decode(&[0u8; 10]);
        assert!(matches!(result, Err(PersistError::FileTooSmall(10, HEADER_SIZE))));
    }

    #[test]
    fn test_summary_needs_name_bytes() {
        let bytes = save::encode(&sample()).expect("encode");
        let result = read_summary(&bytes[..HEADER_SIZE + 2]);
        assert!(matches!(result, Err(PersistError::FileTooSmall(30, 33))));
    }

    #[test]
    fn test_non_utf8_name_rejected() {
        let mut bytes = save::encode(&sample()).expect("encode");
        bytes[HEADER_SIZE] = 0xFF;
        assert!(matches!(read_summary(&bytes), Err(PersistError::MalformedHeaderName)));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut bytes = save::encode(&sample()).expect("encode");
        bytes[0] = b'X';
        assert!(matches!(decode(&bytes), Err(PersistError::InvalidMagic)));
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let bytes = save::encode(&sample()).expect("encode");
        let truncated = &bytes[..bytes.len() - 8];
        assert!(decode(truncated).is_err());
    }

    #[test]
    fn test_decode_unaligned_input() {
        let bytes = save::encode(&sample()).expect("encode");
        let mut shifted = vec![0u8];
        shifted.extend_from_slice(&bytes);
        let decoded = decode(&shifted[1..]).expect("decode");
        assert_eq!(decoded.block_count(), 3);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let mut block = NbtCompound::new();
        block.insert("y", 2);
        block.insert("block", NbtTag::String("minecraft:dirt".to_string()));

        let mut blocks = NbtList::new();
        blocks.push(NbtTag::Compound(block));

        let mut root = NbtCompound::new();
        root.insert("sizeY", 3);
        root.insert("blocks", NbtTag::List(blocks));

        let blueprint = from_compound(&root);
        assert_eq!(blueprint.name, "");
        assert_eq!(blueprint.size, IVec3::new(1, 3, 1));
        assert_eq!(blueprint.entries.len(), 1);
        assert_eq!(blueprint.entries[0].pos, IVec3::new(0, 2, 0));
        assert_eq!(blueprint.entries[0].block, "minecraft:dirt");
        assert!(blueprint.entries[0].properties.is_empty());
    }

    #[test]
    fn test_non_positive_size_clamped() {
        let mut root = NbtCompound::new();
        root.insert("name", NbtTag::String("flat".to_string()));
        root.insert("sizeX", 0);
        root.insert("sizeY", -4);
        root.insert("sizeZ", 5);

        let blueprint = from_compound(&root);
        assert_eq!(blueprint.size, IVec3::new(1, 1, 5));
        assert!(blueprint.entries.is_empty());
    }

    #[test]
    fn test_malformed_items_skipped() {
        let mut props = NbtCompound::new();
        props.insert("facing", NbtTag::String("north".to_string()));
        props.insert("power", 7);

        let mut good = NbtCompound::new();
        good.insert("x", 1);
        good.insert("y", 0);
        good.insert("z", 0);
        good.insert("block", NbtTag::String("minecraft:furnace".to_string()));
        good.insert("properties", NbtTag::Compound(props));

        let mut blocks = NbtList::new();
        blocks.push(NbtTag::String("garbage".to_string()));
        blocks.push(NbtTag::Compound(good));
        blocks.push(NbtTag::Int(42));

        let mut root = NbtCompound::new();
        root.insert("name", NbtTag::String("oven".to_string()));
        root.insert("sizeX", 2);
        root.insert("sizeY", 1);
        root.insert("sizeZ", 1);
        root.insert("blocks", NbtTag::List(blocks));

        let blueprint = from_compound(&root);
        assert_eq!(blueprint.entries.len(), 1);
        let entry = &blueprint.entries[0];
        assert_eq!(entry.block, "minecraft:furnace");
        assert_eq!(entry.properties.len(), 1);
        assert_eq!(entry.properties.get("facing").map(String::as_str), Some("north"));
    }
}
