//! Material host state and block data variants

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TagError;
use crate::value_objects::MaterialKey;

/// What a material handle points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialState {
    pub key: MaterialKey,
    /// `None` for materials that are not blocks (e.g. `apple`)
    pub block_data: Option<BlockData>,
}

impl MaterialState {
    /// A material with the host's default block data for its key.
    pub fn from_key(key: MaterialKey) -> Self {
        let block_data = BlockData::default_for(&key);
        Self { key, block_data }
    }
}

/// Block data carried by a block material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockData {
    Slab(SlabType),
    /// Piston heads and moving pistons
    TechnicalPiston(PistonType),
    Campfire {
        signal_fire: bool,
    },
    PointedDripstone(DripstoneThickness),
    /// Any block without variant data
    Plain,
}

impl BlockData {
    /// Default block data for a material key.
    ///
    /// Non-block materials (items only) return `None`.
    pub fn default_for(key: &MaterialKey) -> Option<Self> {
        let name = key.as_str();
        if name.ends_with("_slab") {
            Some(Self::Slab(SlabType::Bottom))
        } else if name == "piston_head" || name == "moving_piston" {
            Some(Self::TechnicalPiston(PistonType::Normal))
        } else if name == "campfire" || name == "soul_campfire" {
            Some(Self::Campfire { signal_fire: false })
        } else if name == "pointed_dripstone" {
            Some(Self::PointedDripstone(DripstoneThickness::Tip))
        } else if ITEM_ONLY.contains(&name) {
            None
        } else {
            Some(Self::Plain)
        }
    }
}

/// Materials that exist only as items, never as placed blocks
const ITEM_ONLY: &[&str] = &[
    "apple",
    "bread",
    "bowl",
    "carrot",
    "cooked_beef",
    "golden_apple",
    "mushroom_stew",
    "stick",
];

macro_rules! block_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.name())
            }
        }

        impl FromStr for $name {
            type Err = TagError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| {
                        TagError::parse(format!(
                            "Unknown {}: '{}' (expected one of {})",
                            stringify!($name),
                            s,
                            Self::ALL.iter().map(|v| v.name()).collect::<Vec<_>>().join(", ")
                        ))
                    })
            }
        }
    };
}

block_enum!(
    /// Which half of the block a slab occupies
    SlabType { Top => "TOP", Bottom => "BOTTOM", Double => "DOUBLE" }
);

block_enum!(
    /// Regular or sticky piston head
    PistonType { Normal => "NORMAL", Sticky => "STICKY" }
);

block_enum!(
    /// Thickness of a pointed dripstone segment
    DripstoneThickness {
        Base => "BASE",
        Frustum => "FRUSTUM",
        Middle => "MIDDLE",
        Tip => "TIP",
        TipMerge => "TIP_MERGE",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> MaterialKey {
        MaterialKey::new(k).unwrap()
    }

    #[test]
    fn default_block_data_by_key() {
        assert_eq!(
            BlockData::default_for(&key("oak_slab")),
            Some(BlockData::Slab(SlabType::Bottom))
        );
        assert_eq!(
            BlockData::default_for(&key("soul_campfire")),
            Some(BlockData::Campfire { signal_fire: false })
        );
        assert_eq!(BlockData::default_for(&key("stone")), Some(BlockData::Plain));
        assert_eq!(BlockData::default_for(&key("apple")), None);
    }

    #[test]
    fn enum_names_parse_case_insensitively() {
        assert_eq!("top".parse::<SlabType>(), Ok(SlabType::Top));
        assert_eq!("Tip_Merge".parse::<DripstoneThickness>(), Ok(DripstoneThickness::TipMerge));
        assert_eq!(PistonType::Sticky.to_string(), "STICKY");
    }

    #[test]
    fn unknown_enum_name_lists_options() {
        let err = "sideways".parse::<SlabType>().unwrap_err();
        assert!(err.to_string().contains("TOP, BOTTOM, DOUBLE"));
    }
}
