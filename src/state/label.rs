//! Per-URL label definitions
//!
//! A label is the single final outcome written for every input URL.

use std::fmt;

/// Final classification outcome for a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// Page content relates to the topic (`h`)
    Hit,

    /// Page content does not relate to the topic, or the classifier could not
    /// decide after the page was read (`u`)
    Unrelated,

    /// Page could not be reached or read (`i`)
    Inaccessible,
}

impl Label {
    /// Returns the single-character form written to the labels artifact
    pub fn as_char(&self) -> char {
        match self {
            Self::Hit => 'h',
            Self::Unrelated => 'u',
            Self::Inaccessible => 'i',
        }
    }

    /// Parses a label from its single-character form
    ///
    /// Matching is case-insensitive. Returns None for any other character.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'h' => Some(Self::Hit),
            'u' => Some(Self::Unrelated),
            'i' => Some(Self::Inaccessible),
            _ => None,
        }
    }

    /// Returns true if the URL was read and judged by the classifier
    pub fn is_determined(&self) -> bool {
        matches!(self, Self::Hit | Self::Unrelated)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
