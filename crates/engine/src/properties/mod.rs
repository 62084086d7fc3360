//! Built-in property modules.
//!
//! Load order is registration order, which is also the order properties
//! appear in object literals and the order overlapping tags are tried in.

pub mod item_food;
pub mod item_hide_tooltip;
pub mod material_block_type;

use tracing::warn;

use mechanist_domain::TagError;

use crate::registry::PropertyRegistryBuilder;

pub use item_food::ItemFood;
pub use item_hide_tooltip::ItemHideTooltip;
pub use material_block_type::MaterialBlockType;

type RegisterFn = fn(&mut PropertyRegistryBuilder) -> Result<(), TagError>;

const MODULES: &[(&str, RegisterFn)] = &[
    ("item_food", PropertyRegistryBuilder::register_property::<ItemFood>),
    ("item_hide_tooltip", PropertyRegistryBuilder::register_property::<ItemHideTooltip>),
    ("material_block_type", PropertyRegistryBuilder::register_property::<MaterialBlockType>),
];

/// Registers every built-in property; a module that fails is skipped.
pub fn register_all(builder: &mut PropertyRegistryBuilder) {
    for &(module, register) in MODULES {
        if let Err(err) = register(builder) {
            warn!(module, error = %err, "Property module skipped");
        }
    }
}
