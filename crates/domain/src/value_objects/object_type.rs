//! Registry key for typed objects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TagError;

/// Category of a typed object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectType {
    Element,
    List,
    Map,
    Item,
    Material,
    Player,
}

impl ObjectType {
    pub const ALL: [ObjectType; 6] = [
        Self::Element,
        Self::List,
        Self::Map,
        Self::Item,
        Self::Material,
        Self::Player,
    ];

    /// Literal prefix for host-backed objects (`i@`, `m@`, `p@`).
    pub fn literal_prefix(&self) -> Option<&'static str> {
        match self {
            Self::Item => Some("i@"),
            Self::Material => Some("m@"),
            Self::Player => Some("p@"),
            Self::Element | Self::List | Self::Map => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Element => "Element",
            Self::List => "List",
            Self::Map => "Map",
            Self::Item => "Item",
            Self::Material => "Material",
            Self::Player => "Player",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ObjectType {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TagError::parse(format!("Unknown object type: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_agree() {
        for object_type in ObjectType::ALL {
            assert_eq!(object_type.to_string().parse::<ObjectType>(), Ok(object_type));
        }
    }

    #[test]
    fn prefixes_only_for_host_objects() {
        assert_eq!(ObjectType::Item.literal_prefix(), Some("i@"));
        assert_eq!(ObjectType::Map.literal_prefix(), None);
    }
}
