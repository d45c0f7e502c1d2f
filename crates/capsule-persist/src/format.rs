/// Magic bytes identifying a blueprint file.
pub const MAGIC: [u8; 4] = *b"SCAP";

/// Current blueprint file format version.
pub const FORMAT_VERSION: u16 = 1;

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 28;

/// Blueprint file header. Fixed 28 bytes, repr(C) for byte-level serialization.
///
/// The header repeats the blueprint's dimensions and block count so that
/// listings and tooltips can be served without decompressing the payload.
/// It is followed by `name_len` bytes of UTF-8 name, then an lz4 block
/// (size-prepended) holding the NBT compound.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlueprintHeader {
    pub magic: [u8; 4],
    pub version: u16,
    /// Length in bytes of the name that follows the header.
    pub name_len: u16,
    pub size: [i32; 3],
    pub block_count: u32,
    /// Length of the NBT payload before compression.
    pub payload_len: u32,
}
