//! Value objects: script values, the literal grammar, attribute paths and
//! validated keys.

pub mod attribute;
pub mod literal;
pub mod names;
pub mod object_type;
pub mod tag_value;
pub mod version;

pub use attribute::{Attribute, AttributeStep};
pub use names::{EffectKey, MaterialKey};
pub use object_type::ObjectType;
pub use tag_value::{TagMap, TagValue};
pub use version::ServerVersion;
