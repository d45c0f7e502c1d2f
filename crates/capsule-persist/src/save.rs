use capsule_core::Blueprint;
use quartz_nbt::io::{write_nbt, Flavor};
use quartz_nbt::{NbtCompound, NbtList, NbtTag};

use crate::compress;
use crate::error::PersistError;
use crate::format::*;

/// Build the NBT compound for a blueprint.
///
/// Layout: `{name, sizeX, sizeY, sizeZ, blocks: [{x, y, z, block, properties: {..}}]}`.
/// Entries are written in blueprint order.
pub fn to_compound(blueprint: &Blueprint) -> NbtCompound {
    let mut root = NbtCompound::new();
    root.insert("name", NbtTag::String(blueprint.name.clone()));
    root.insert("sizeX", blueprint.size.x);
    root.insert("sizeY", blueprint.size.y);
    root.insert("sizeZ", blueprint.size.z);

    let mut blocks = NbtList::new();
    for entry in &blueprint.entries {
        let mut block = NbtCompound::new();
        block.insert("x", entry.pos.x);
        block.insert("y", entry.pos.y);
        block.insert("z", entry.pos.z);
        block.insert("block", NbtTag::String(entry.block.clone()));

        let mut properties = NbtCompound::new();
        for (key, value) in &entry.properties {
            properties.insert(key.as_str(), NbtTag::String(value.clone()));
        }
        block.insert("properties", NbtTag::Compound(properties));

        blocks.push(NbtTag::Compound(block));
    }
    root.insert("blocks", NbtTag::List(blocks));

    root
}

/// Serialize a blueprint into the capsule binary format.
///
/// Layout: header (28B) + name bytes + lz4 block (size-prepended) of the
/// uncompressed NBT.
pub fn encode(blueprint: &Blueprint) -> Result<Vec<u8>, PersistError> {
    let name = blueprint.name.as_bytes();
    let name_len =
        u16::try_from(name.len()).map_err(|_| PersistError::HeaderNameTooLong(name.len()))?;

    let mut payload = Vec::new();
    write_nbt(&mut payload, None, &to_compound(blueprint), Flavor::Uncompressed)
        .map_err(|e| PersistError::Nbt(e.to_string()))?;

    let header = BlueprintHeader {
        magic: MAGIC,
        version: FORMAT_VERSION,
        name_len,
        size: blueprint.size.to_array(),
        block_count: blueprint.block_count() as u32,
        payload_len: payload.len() as u32,
    };

    let compressed = compress::compress_payload(&payload);
    let mut output = Vec::with_capacity(HEADER_SIZE + name.len() + compressed.len());
    output.extend_from_slice(bytemuck::bytes_of(&header));
    output.extend_from_slice(name);
    output.extend_from_slice(&compressed);

    Ok(output)
}
