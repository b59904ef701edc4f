// Common type definitions for binary fields

use serde::{Deserialize, Serialize};

/// Digit or byte order of a multi-byte field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Endianness {
    #[default]
    Big,
    Little,
}

impl Endianness {
    pub fn is_big(&self) -> bool {
        matches!(self, Endianness::Big)
    }

    pub fn is_little(&self) -> bool {
        matches!(self, Endianness::Little)
    }
}
