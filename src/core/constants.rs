//! Constants used throughout pocket-protector.
//!
//! Centralizes file names, environment variables and cryptographic defaults.

/// Default store file name, relative to the working directory.
pub const DEFAULT_FILE: &str = "protected.yaml";

/// Version marker written at the top of every store document.
pub const FORMAT_VERSION: u32 = 1;

/// Actor recorded for operations that carry no authenticated identity.
pub const ANONYMOUS: &str = "anonymous";

/// Environment variable overriding the store path.
pub const ENV_FILE: &str = "PPROTECT_FILE";

/// Environment variable supplying the user id.
pub const ENV_USER: &str = "PPROTECT_USER";

/// Environment variable supplying the passphrase.
pub const ENV_PASSPHRASE: &str = "PPROTECT_PASSPHRASE";

/// Environment variable supplying the replacement passphrase.
pub const ENV_NEW_PASSPHRASE: &str = "PPROTECT_NEW_PASSPHRASE";

/// Log filter environment variable.
pub const ENV_LOG: &str = "PPROTECT_LOG";

/// Argon2id memory cost override (KiB).
pub const ENV_KDF_MEMORY_KIB: &str = "PPROTECT_KDF_MEMORY_KIB";

/// Argon2id iteration count override.
pub const ENV_KDF_ITERATIONS: &str = "PPROTECT_KDF_ITERATIONS";

/// Argon2id lane count override.
pub const ENV_KDF_PARALLELISM: &str = "PPROTECT_KDF_PARALLELISM";

/// Argon2id memory cost in KiB (64 MiB).
pub const KDF_MEMORY_KIB: u32 = 65536;

/// Argon2id iteration count.
pub const KDF_ITERATIONS: u32 = 3;

/// Argon2id parallelism.
pub const KDF_PARALLELISM: u32 = 4;

/// Largest Argon2id memory cost accepted from a store or the environment (1 GiB).
pub const KDF_MAX_MEMORY_KIB: u32 = 1024 * 1024;

/// Largest Argon2id iteration count accepted.
pub const KDF_MAX_ITERATIONS: u32 = 64;

/// Largest Argon2id lane count accepted.
pub const KDF_MAX_PARALLELISM: u32 = 64;

/// Salt length for key derivation.
pub const SALT_LEN: usize = 16;

/// Derived key length (ChaCha20-Poly1305 key size).
pub const KEY_LEN: usize = 32;

/// ChaCha20-Poly1305 nonce length.
pub const NONCE_LEN: usize = 12;
