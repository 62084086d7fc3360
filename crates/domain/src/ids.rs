use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TagError;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parses the hyphenated UUID form used in object literals.
            pub fn parse(text: &str) -> Result<Self, TagError> {
                Uuid::parse_str(text.trim())
                    .map(Self)
                    .map_err(|e| TagError::parse(format!("Invalid {}: {}", stringify!($name), e)))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Host handles
define_id!(ItemId);
define_id!(MaterialId);
define_id!(PlayerId);
