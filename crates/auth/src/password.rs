use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// The plaintext does not match the stored hash.
    #[error("password mismatch")]
    Mismatch,

    /// The stored value is not a hash this hasher understands, or hashing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Password hashing collaborator.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    fn compare(&self, password: &str, hashed: &str) -> Result<(), PasswordError>;
}

/// bcrypt-backed [`PasswordHasher`].
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    fn compare(&self, password: &str, hashed: &str) -> Result<(), PasswordError> {
        match bcrypt::verify(password, hashed) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::Hashing(e.to_string())),
        }
    }
}
