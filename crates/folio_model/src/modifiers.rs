//! Visibility and inheritance modifiers.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifier bitset shared by classes, methods, properties and parameters.
    ///
    /// Only `ABSTRACT` and `FINAL` are meaningful on a class.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Modifiers: u8 {
        /// Visible everywhere.
        const PUBLIC = 1;
        /// Visible to the class and its descendants.
        const PROTECTED = 1 << 1;
        /// Visible to the declaring class only.
        const PRIVATE = 1 << 2;
        /// Belongs to the class rather than an instance.
        const STATIC = 1 << 3;
        /// Must be implemented by a descendant.
        const ABSTRACT = 1 << 4;
        /// Cannot be overridden or extended.
        const FINAL = 1 << 5;
    }
}

impl Modifiers {
    /// The bits that select a visibility.
    pub const VISIBILITY: Modifiers = Modifiers::PUBLIC
        .union(Modifiers::PROTECTED)
        .union(Modifiers::PRIVATE);

    /// Members declared without a visibility keyword are public.
    pub fn with_default_visibility(self) -> Self {
        if self.intersects(Self::VISIBILITY) {
            self
        } else {
            self | Self::PUBLIC
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_visibility_defaults_to_public() {
        let m = Modifiers::STATIC.with_default_visibility();
        assert!(m.contains(Modifiers::PUBLIC | Modifiers::STATIC));
    }

    #[test]
    fn explicit_visibility_is_kept() {
        let m = Modifiers::PRIVATE.with_default_visibility();
        assert_eq!(m, Modifiers::PRIVATE);
    }

    #[test]
    fn serde_roundtrip() {
        let m = Modifiers::PROTECTED | Modifiers::FINAL;
        let json = serde_json::to_string(&m).unwrap();
        let back: Modifiers = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }
}
