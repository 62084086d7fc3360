//! The `Property` contract and its type-erased registry form.

use serde::Serialize;

use mechanist_domain::{Attribute, ObjectTag, ObjectType, TagError};

use crate::host::Host;
use crate::mechanism::Mechanism;
use crate::resolution::TagContext;

/// Documentation for a readable tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagDoc {
    pub returns: &'static str,
    pub description: &'static str,
    /// Name of the tag that replaces this one
    pub deprecated_for: Option<&'static str>,
}

impl TagDoc {
    pub const fn new(returns: &'static str, description: &'static str) -> Self {
        Self {
            returns,
            description,
            deprecated_for: None,
        }
    }

    pub const fn deprecated_for(mut self, replacement: &'static str) -> Self {
        self.deprecated_for = Some(replacement);
        self
    }
}

/// Documentation for a writable mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MechanismDoc {
    pub name: &'static str,
    pub input: &'static str,
    pub description: &'static str,
}

impl MechanismDoc {
    pub const fn new(name: &'static str, input: &'static str, description: &'static str) -> Self {
        Self {
            name,
            input,
            description,
        }
    }
}

/// Tag handler bound to a property instance
pub type PropertyTagFn<P> =
    fn(&P, &mut Attribute, &mut TagContext<'_>) -> Result<ObjectTag, TagError>;

/// A readable/writable facet of one object type.
///
/// Implementations are thin views: `get_from` binds the property to an
/// object when it applies, and every other method reads or writes host state
/// through that binding. Nothing is cached between calls.
pub trait Property: Sized + 'static {
    /// Key used in object literals; must also be one of [`Self::MECHANISMS`].
    const ID: &'static str;
    const OWNER: ObjectType;
    const MECHANISMS: &'static [MechanismDoc];

    /// Binds the property to `object`, or `None` when it does not apply.
    fn get_from(object: &ObjectTag, host: &Host) -> Option<Self>;

    fn describes(object: &ObjectTag, host: &Host) -> bool {
        Self::get_from(object, host).is_some()
    }

    /// Literal text for the property, or `None` when it is at its default.
    fn property_string(&self, host: &Host) -> Result<Option<String>, TagError>;

    fn adjust(&self, mechanism: &Mechanism, host: &Host) -> Result<(), TagError>;

    fn register_tags(tags: &mut PropertyTags<Self>);
}

pub(crate) struct PropertyTagEntry<P> {
    pub name: &'static str,
    pub doc: TagDoc,
    pub handler: PropertyTagFn<P>,
}

/// Collects the tags a property contributes during registration
pub struct PropertyTags<P> {
    entries: Vec<PropertyTagEntry<P>>,
}

impl<P: Property> PropertyTags<P> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn tag(&mut self, name: &'static str, doc: TagDoc, handler: PropertyTagFn<P>) -> &mut Self {
        self.entries.push(PropertyTagEntry { name, doc, handler });
        self
    }

    pub(crate) fn into_entries(self) -> Vec<PropertyTagEntry<P>> {
        self.entries
    }
}

/// Type-erased registration record for one property
#[derive(Clone)]
pub struct PropertyDescriptor {
    pub id: &'static str,
    pub owner: ObjectType,
    pub mechanisms: &'static [MechanismDoc],
    describes: fn(&ObjectTag, &Host) -> bool,
    property_string: fn(&ObjectTag, &Host) -> Result<Option<String>, TagError>,
    adjust: fn(&ObjectTag, &Mechanism, &Host) -> Result<(), TagError>,
}

impl std::fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("mechanisms", &self.mechanisms)
            .finish_non_exhaustive()
    }
}

impl PropertyDescriptor {
    pub fn of<P: Property>() -> Self {
        Self {
            id: P::ID,
            owner: P::OWNER,
            mechanisms: P::MECHANISMS,
            describes: P::describes,
            property_string: erased_property_string::<P>,
            adjust: erased_adjust::<P>,
        }
    }

    pub fn handles(&self, mechanism: &str) -> bool {
        self.mechanisms
            .iter()
            .any(|doc| doc.name.eq_ignore_ascii_case(mechanism))
    }

    pub fn describes(&self, object: &ObjectTag, host: &Host) -> bool {
        (self.describes)(object, host)
    }

    /// `None` when the property does not describe `object` or is at default.
    pub fn property_string(
        &self,
        object: &ObjectTag,
        host: &Host,
    ) -> Result<Option<String>, TagError> {
        (self.property_string)(object, host)
    }

    pub fn adjust(
        &self,
        object: &ObjectTag,
        mechanism: &Mechanism,
        host: &Host,
    ) -> Result<(), TagError> {
        (self.adjust)(object, mechanism, host)
    }
}

fn erased_property_string<P: Property>(
    object: &ObjectTag,
    host: &Host,
) -> Result<Option<String>, TagError> {
    match P::get_from(object, host) {
        Some(property) => property.property_string(host),
        None => Ok(None),
    }
}

fn erased_adjust<P: Property>(
    object: &ObjectTag,
    mechanism: &Mechanism,
    host: &Host,
) -> Result<(), TagError> {
    let property = P::get_from(object, host).ok_or_else(|| TagError::MechanismNotApplicable {
        object_type: object.object_type(),
        mechanism: mechanism.name.clone(),
        property: P::ID,
    })?;
    property.adjust(mechanism, host)
}
