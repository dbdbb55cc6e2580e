//! Constants used in the time-capsule protocol.

/// Mode byte selecting the public payload variant.
///
/// The locked blob directly covers the plaintext.
pub const MODE_PUBLIC: u8 = 0x01;

/// Mode byte selecting the private payload variant.
///
/// The locked blob covers a 32-byte ephemeral secret; the plaintext travels
/// in a symmetrically encrypted tail keyed off that secret.
pub const MODE_PRIVATE: u8 = 0x02;

/// Sub-format version byte of the symmetric tail in private payloads.
pub const TAIL_VERSION: u8 = 0x02;

/// Size of the locked-blob length field in private payloads.
pub const TLOCK_LEN_SIZE: usize = core::mem::size_of::<u32>();

/// The maximum accepted locked-blob length.
pub const MAX_TLOCK_LEN: usize = 4096;

/// Size of the ephemeral secret locked for private capsules.
pub const EPHEMERAL_SECRET_SIZE: usize = 32;

/// Size of the per-message nonce in the symmetric tail.
pub const NONCE_SIZE: usize = 32;

/// Size of the authentication tag (HMAC-SHA256) closing the symmetric tail.
pub const TAG_SIZE: usize = 32;

/// Size of the derived encryption key.
pub const CIPHER_KEY_SIZE: usize = 32;

/// Size of the derived encryption nonce (IETF ChaCha20).
pub const CIPHER_NONCE_SIZE: usize = 12;

/// Size of the derived authentication key.
pub const MAC_KEY_SIZE: usize = 32;

/// Total length of the derived key material:
/// encryption key (32) || encryption nonce (12) || authentication key (32).
pub const DERIVED_KEY_LEN: usize = CIPHER_KEY_SIZE + CIPHER_NONCE_SIZE + MAC_KEY_SIZE;

/// Block size of the padding codec.
pub const PAD_BLOCK_SIZE: usize = 32;

/// Size of the big-endian length prefix written by the padding codec.
pub const LEN_PREFIX_SIZE: usize = 2;

/// Minimum plaintext length accepted by the padding codec.
pub const MIN_PLAINTEXT_SIZE: usize = 1;

/// Maximum plaintext length accepted by the padding codec.
pub const MAX_PLAINTEXT_SIZE: usize = 65535;

/// Minimum ciphertext length in the symmetric tail (one padding block).
pub const MIN_CIPHERTEXT_SIZE: usize = PAD_BLOCK_SIZE;

/// Maximum ciphertext length in the symmetric tail.
///
/// This is the codomain of the padding codec: the largest valid plaintext
/// (65535 bytes) pads to 65568 bytes, so the bound sits on the padded size
/// rather than the raw plaintext limit.
pub const MAX_CIPHERTEXT_SIZE: usize =
    (MAX_PLAINTEXT_SIZE + LEN_PREFIX_SIZE).div_ceil(PAD_BLOCK_SIZE) * PAD_BLOCK_SIZE;

/// Minimum length of the symmetric tail:
/// version (1) || nonce (32) || ciphertext (>= 32) || tag (32).
pub const MIN_TAIL_SIZE: usize = 1 + NONCE_SIZE + MIN_CIPHERTEXT_SIZE + TAG_SIZE;

/// The event kind identifying capsule envelopes.
pub const KIND_TIME_CAPSULE: u32 = 1041;

/// Name of the locking-metadata tag.
pub const TAG_TLOCK: &str = "tlock";

/// Name of the recipient tag, required on private capsules.
pub const TAG_RECIPIENT: &str = "p";

/// Name of the human-readable description tag.
pub const TAG_ALT: &str = "alt";

/// Prefix of the chain sub-field inside the locking-metadata tag.
pub const CHAIN_FIELD_PREFIX: &str = "drand_chain ";

/// Prefix of the round sub-field inside the locking-metadata tag.
pub const ROUND_FIELD_PREFIX: &str = "drand_round ";

/// Magic bytes opening a binary age v1 file.
///
/// Locked blobs must carry this framing; anything else is rejected before
/// the blob reaches the oracle.
pub const AGE_V1_MAGIC: &[u8] = b"age-encryption.org/v1";

/// Header of an ASCII-armored age file. Always rejected.
pub const AGE_ARMOR_HEADER: &[u8] = b"-----BEGIN AGE ENCRYPTED FILE-----";

/// Chain hash of the drand quicknet production network.
pub const QUICKNET_CHAIN_ID: &str =
    "52db9ba70e0cc0f6eaf7803dd07447a1f5477735fd3f661792ba94600c84e971";

/// Genesis time (UNIX seconds) of drand quicknet.
pub const QUICKNET_GENESIS_TIME: u64 = 1692803367;

/// Round period (seconds) of drand quicknet.
pub const QUICKNET_PERIOD: u64 = 3;
