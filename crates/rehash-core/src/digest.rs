use std::fmt;

use sha1::{Digest as _, Sha1};

/// SHA-1 of a whole buffer, the value that has to change
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 20]);

impl Digest {
    pub fn of(bytes: &[u8]) -> Self {
        let mut digest = [0; 20];
        digest.copy_from_slice(&Sha1::digest(bytes));
        Self(digest)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// lowercase hex, 40 characters
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self})")
    }
}
