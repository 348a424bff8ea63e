/// Password hash formats accepted at login.
///
/// New hashes are always [`HashScheme::Argon2`]. [`HashScheme::Bcrypt`] hashes
/// predate the switch and keep verifying until the user's hash is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    /// Fixed-cost bcrypt (`$2a$`, `$2b$`, `$2x$`, `$2y$`). Only the first
    /// [`HashScheme::BCRYPT_MAX_INPUT`] bytes of a password take part.
    Bcrypt,
    /// Memory-hard Argon2 in PHC string format (`$argon2id$...`).
    Argon2,
}

impl HashScheme {
    /// Input cap imposed by the bcrypt algorithm.
    pub const BCRYPT_MAX_INPUT: usize = 72;

    /// The scheme used for every new hash.
    pub const CURRENT: HashScheme = HashScheme::Argon2;

    /// Identify a stored hash by its prefix.
    pub fn detect(hash: &str) -> Option<Self> {
        const BCRYPT_PREFIXES: [&str; 4] = ["$2a$", "$2b$", "$2x$", "$2y$"];

        if BCRYPT_PREFIXES.iter().any(|p| hash.starts_with(p)) {
            Some(HashScheme::Bcrypt)
        } else if hash.starts_with("$argon2") {
            Some(HashScheme::Argon2)
        } else {
            None
        }
    }

    pub fn is_current(&self) -> bool {
        *self == Self::CURRENT
    }
}
