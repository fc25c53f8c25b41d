//! Size constants for morph chain primitives.

/// Size of a compressed public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 33;

/// Size of a SHA-256 digest in bytes.
pub const HASH_SIZE: usize = 32;

/// Offset of the node public key inside a serialized storage node descriptor.
pub const NODE_INFO_KEY_OFFSET: usize = 2;
