//! Unified error type for tag resolution, mechanism dispatch and literal parsing.
//!
//! Every per-call failure is recoverable: the dispatch boundary reports it on the
//! script error channel and the target object stays unmodified. Only
//! [`TagError::AmbiguousMechanismRegistration`] disables anything, and only the
//! offending property module.

use thiserror::Error;

use crate::value_objects::ObjectType;

/// Unified error type for the dispatch core
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TagError {
    /// No property registered the mechanism name for this object type
    #[error("Unknown mechanism '{mechanism}' for {object_type}")]
    UnknownMechanism {
        object_type: ObjectType,
        mechanism: String,
    },

    /// No handler answered the attribute for this object type
    #[error("Unknown attribute '{attribute}' for {object_type}")]
    UnknownAttribute {
        object_type: ObjectType,
        attribute: String,
    },

    /// The owning property exists but does not describe this object
    #[error("Mechanism '{mechanism}' of property '{property}' does not apply to this {object_type}")]
    MechanismNotApplicable {
        object_type: ObjectType,
        mechanism: String,
        property: &'static str,
    },

    /// Value present but of the wrong shape or type
    #[error("Invalid value for mechanism '{mechanism}': {reason}")]
    InvalidMechanismValue { mechanism: String, reason: String },

    /// Two properties claimed one mechanism name for the same object type
    #[error("Mechanism '{mechanism}' on {object_type} is already owned by '{existing}'; rejected '{rejected}'")]
    AmbiguousMechanismRegistration {
        object_type: ObjectType,
        mechanism: &'static str,
        existing: &'static str,
        rejected: &'static str,
    },

    /// Chained attribute resolution hit the step or nesting cap
    #[error("Attribute resolution exceeded its limit of {limit}")]
    AttributeDepthExceeded { limit: usize },

    /// One `key=value` segment of an object literal could not be applied
    #[error("Malformed property literal '{segment}': {reason}")]
    MalformedPropertyLiteral { segment: String, reason: String },

    /// Text could not be parsed (attribute paths, literals, enum names)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Validation failed (e.g., invalid key syntax, bad registration)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// The host runtime refused or could not find something
    #[error("Host error: {0}")]
    Host(String),
}

impl TagError {
    pub fn unknown_mechanism(object_type: ObjectType, mechanism: impl Into<String>) -> Self {
        Self::UnknownMechanism {
            object_type,
            mechanism: mechanism.into(),
        }
    }

    pub fn unknown_attribute(object_type: ObjectType, attribute: impl Into<String>) -> Self {
        Self::UnknownAttribute {
            object_type,
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid-value error for a mechanism.
    ///
    /// `reason` should be human readable; it is shown to script authors as is.
    pub fn invalid_value(mechanism: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMechanismValue {
            mechanism: mechanism.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(segment: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPropertyLiteral {
            segment: segment.into(),
            reason: reason.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for SlabType {
    ///     type Err = TagError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "top" => Ok(Self::Top),
    ///             _ => Err(TagError::parse(format!("Unknown slab type: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Whether the error is a per-call failure that leaves the process usable.
    ///
    /// Registration ambiguity is the only class that disables a module.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::AmbiguousMechanismRegistration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_mechanism_display() {
        let err = TagError::unknown_mechanism(ObjectType::Item, "wings");
        assert_eq!(err.to_string(), "Unknown mechanism 'wings' for Item");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_invalid_value_display() {
        let err = TagError::invalid_value("hide_tooltip", "Must be a boolean");
        assert!(matches!(err, TagError::InvalidMechanismValue { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid value for mechanism 'hide_tooltip': Must be a boolean"
        );
    }

    #[test]
    fn test_ambiguous_registration_is_not_recoverable() {
        let err = TagError::AmbiguousMechanismRegistration {
            object_type: ObjectType::Material,
            mechanism: "type",
            existing: "type",
            rejected: "other_type",
        };
        assert!(!err.is_recoverable());
        assert!(err.to_string().contains("already owned by 'type'"));
    }

    #[test]
    fn test_depth_exceeded_display() {
        let err = TagError::AttributeDepthExceeded { limit: 1000 };
        assert_eq!(err.to_string(), "Attribute resolution exceeded its limit of 1000");
    }
}
