//! Property registry
//!
//! Maps `(object type, attribute name)` to tag handlers and
//! `(object type, mechanism name)` to the single property that owns it.
//! Built once through [`PropertyRegistryBuilder`] and read-only afterwards.
//!
//! # Ambiguity
//!
//! A mechanism name belongs to at most one property per object type. A
//! property that claims a taken name is rejected as a whole (its tags and
//! mechanisms), logged at `error`, and every earlier registrant stays enabled.

mod descriptor;
pub mod meta;

use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use tracing::{debug, error, warn};

use mechanist_domain::{Attribute, ObjectTag, ObjectType, TagError};

use crate::host::Host;
use crate::resolution::TagContext;

pub use descriptor::{
    MechanismDoc, Property, PropertyDescriptor, PropertyTagFn, PropertyTags, TagDoc,
};

/// Resolver for one tag step
pub type TagResolver = Box<
    dyn Fn(&ObjectTag, &mut Attribute, &mut TagContext<'_>) -> Result<ObjectTag, TagError>
        + Send
        + Sync,
>;

/// Resolver for a type's fall-through step; `Ok(None)` passes the step on.
pub type FallbackResolver = Box<
    dyn Fn(&ObjectTag, &mut Attribute, &mut TagContext<'_>) -> Result<Option<ObjectTag>, TagError>
        + Send
        + Sync,
>;

fn always(_: &ObjectTag, _: &Host) -> bool {
    true
}

fn tag_resolver<F>(resolver: F) -> TagResolver
where
    F: Fn(&ObjectTag, &mut Attribute, &mut TagContext<'_>) -> Result<ObjectTag, TagError>
        + Send
        + Sync
        + 'static,
{
    Box::new(resolver)
}

/// A registered tag: a name, an applicability predicate and a resolver
pub struct TagHandler {
    /// `None` for base tags, which answer on every type
    pub owner: Option<ObjectType>,
    pub name: &'static str,
    /// Owning property id, for property tags
    pub property: Option<&'static str>,
    pub doc: TagDoc,
    applies: fn(&ObjectTag, &Host) -> bool,
    resolver: TagResolver,
}

impl TagHandler {
    pub fn applies(&self, object: &ObjectTag, host: &Host) -> bool {
        (self.applies)(object, host)
    }

    pub fn resolve(
        &self,
        object: &ObjectTag,
        attribute: &mut Attribute,
        context: &mut TagContext<'_>,
    ) -> Result<ObjectTag, TagError> {
        (self.resolver)(object, attribute, context)
    }
}

impl std::fmt::Debug for TagHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagHandler")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("property", &self.property)
            .finish_non_exhaustive()
    }
}

/// Per-type handler consulted when no named tag matched
pub struct FallbackHandler {
    pub owner: ObjectType,
    pub doc: TagDoc,
    resolver: FallbackResolver,
}

impl FallbackHandler {
    pub fn resolve(
        &self,
        object: &ObjectTag,
        attribute: &mut Attribute,
        context: &mut TagContext<'_>,
    ) -> Result<Option<ObjectTag>, TagError> {
        (self.resolver)(object, attribute, context)
    }
}

#[derive(Default)]
struct TypeTable {
    property_tags: IndexMap<&'static str, Vec<TagHandler>>,
    core_tags: IndexMap<&'static str, TagHandler>,
    /// Mechanism name to index in `PropertyRegistry::properties`
    mechanisms: IndexMap<&'static str, usize>,
    fallback: Option<FallbackHandler>,
}

/// Sealed registry of every tag, mechanism and property
#[derive(Default)]
pub struct PropertyRegistry {
    types: IndexMap<ObjectType, TypeTable>,
    properties: Vec<PropertyDescriptor>,
    base_tags: IndexMap<&'static str, TagHandler>,
}

impl PropertyRegistry {
    /// Registry with the core tags and every built-in property.
    ///
    /// A property module that fails to register is logged and skipped.
    pub fn standard() -> Self {
        let mut builder = PropertyRegistryBuilder::new();
        crate::core_tags::register(&mut builder);
        crate::properties::register_all(&mut builder);
        builder.build()
    }

    /// Property tag handlers for `(owner, name)` in registration order.
    pub fn lookup_for_attribute(&self, owner: ObjectType, name: &str) -> &[TagHandler] {
        self.types
            .get(&owner)
            .and_then(|table| table.property_tags.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn lookup_for_mechanism(&self, owner: ObjectType, name: &str) -> Option<&PropertyDescriptor> {
        let index = *self.types.get(&owner)?.mechanisms.get(name)?;
        self.properties.get(index)
    }

    /// Properties registered on `owner`, in registration order.
    pub fn properties_for(&self, owner: ObjectType) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter().filter(move |p| p.owner == owner)
    }

    pub fn property(&self, owner: ObjectType, id: &str) -> Option<&PropertyDescriptor> {
        self.properties_for(owner).find(|p| p.id == id)
    }

    pub fn core_tag(&self, owner: ObjectType, name: &str) -> Option<&TagHandler> {
        self.types.get(&owner)?.core_tags.get(name)
    }

    pub fn base_tag(&self, name: &str) -> Option<&TagHandler> {
        self.base_tags.get(name)
    }

    pub fn fallback(&self, owner: ObjectType) -> Option<&FallbackHandler> {
        self.types.get(&owner)?.fallback.as_ref()
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

/// Mutable registry under construction
#[derive(Default)]
pub struct PropertyRegistryBuilder {
    registry: PropertyRegistry,
}

impl PropertyRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a property module: its descriptor, mechanisms and tags.
    ///
    /// # Errors
    ///
    /// - `Validation` when `P::ID` is not one of `P::MECHANISMS`
    /// - `AmbiguousMechanismRegistration` when a mechanism name is already
    ///   owned on `P::OWNER`; nothing of `P` is registered
    pub fn register_property<P: Property>(&mut self) -> Result<(), TagError> {
        if !P::MECHANISMS.iter().any(|doc| doc.name == P::ID) {
            error!(property = P::ID, owner = %P::OWNER, "Property id is not one of its mechanisms");
            return Err(TagError::validation(format!(
                "Property '{}' must handle a mechanism named after its id",
                P::ID
            )));
        }

        let table = self.registry.types.entry(P::OWNER).or_default();
        for doc in P::MECHANISMS {
            if let Some(&index) = table.mechanisms.get(doc.name) {
                let existing = self
                    .registry
                    .properties
                    .get(index)
                    .map(|p| p.id)
                    .unwrap_or("<unknown>");
                error!(
                    owner = %P::OWNER,
                    mechanism = doc.name,
                    existing,
                    rejected = P::ID,
                    "Ambiguous mechanism registration; property disabled"
                );
                return Err(TagError::AmbiguousMechanismRegistration {
                    object_type: P::OWNER,
                    mechanism: doc.name,
                    existing,
                    rejected: P::ID,
                });
            }
        }

        let index = self.registry.properties.len();
        self.registry.properties.push(PropertyDescriptor::of::<P>());
        for doc in P::MECHANISMS {
            table.mechanisms.insert(doc.name, index);
        }

        let mut tags = PropertyTags::<P>::new();
        P::register_tags(&mut tags);
        for entry in tags.into_entries() {
            let handler = entry.handler;
            let name = entry.name;
            let resolver = tag_resolver(move |object, attribute, context| {
                let property = P::get_from(object, context.host())
                    .ok_or_else(|| TagError::unknown_attribute(P::OWNER, name))?;
                handler(&property, attribute, context)
            });
            table.property_tags.entry(name).or_default().push(TagHandler {
                owner: Some(P::OWNER),
                name,
                property: Some(P::ID),
                doc: entry.doc,
                applies: P::describes,
                resolver,
            });
        }

        debug!(
            property = P::ID,
            owner = %P::OWNER,
            mechanisms = P::MECHANISMS.len(),
            "Registered property"
        );
        Ok(())
    }

    /// Registers a tag every object of `owner` answers.
    ///
    /// Re-registering a name replaces the earlier handler.
    pub fn register_core_tag<F>(&mut self, owner: ObjectType, name: &'static str, doc: TagDoc, resolver: F)
    where
        F: Fn(&ObjectTag, &mut Attribute, &mut TagContext<'_>) -> Result<ObjectTag, TagError>
            + Send
            + Sync
            + 'static,
    {
        let table = self.registry.types.entry(owner).or_default();
        let handler = TagHandler {
            owner: Some(owner),
            name,
            property: None,
            doc,
            applies: always,
            resolver: tag_resolver(resolver),
        };
        if table.core_tags.insert(name, handler).is_some() {
            warn!(owner = %owner, tag = name, "Core tag registered twice; keeping the later one");
        }
    }

    /// Registers a tag answered on every object type.
    pub fn register_base_tag<F>(&mut self, name: &'static str, doc: TagDoc, resolver: F)
    where
        F: Fn(&ObjectTag, &mut Attribute, &mut TagContext<'_>) -> Result<ObjectTag, TagError>
            + Send
            + Sync
            + 'static,
    {
        let handler = TagHandler {
            owner: None,
            name,
            property: None,
            doc,
            applies: always,
            resolver: tag_resolver(resolver),
        };
        if self.registry.base_tags.insert(name, handler).is_some() {
            warn!(tag = name, "Base tag registered twice; keeping the later one");
        }
    }

    pub fn register_fallback<F>(&mut self, owner: ObjectType, doc: TagDoc, resolver: F)
    where
        F: Fn(&ObjectTag, &mut Attribute, &mut TagContext<'_>) -> Result<Option<ObjectTag>, TagError>
            + Send
            + Sync
            + 'static,
    {
        let table = self.registry.types.entry(owner).or_default();
        table.fallback = Some(FallbackHandler {
            owner,
            doc,
            resolver: Box::new(resolver),
        });
    }

    pub fn build(self) -> PropertyRegistry {
        debug!(
            properties = self.registry.properties.len(),
            base_tags = self.registry.base_tags.len(),
            "Property registry sealed"
        );
        self.registry
    }
}

static GLOBAL_REGISTRY: OnceCell<Arc<PropertyRegistry>> = OnceCell::new();

/// Installs the process-wide registry. Write once.
///
/// # Errors
///
/// Returns `Validation` if a registry is already installed.
pub fn install(registry: PropertyRegistry) -> Result<Arc<PropertyRegistry>, TagError> {
    let registry = Arc::new(registry);
    GLOBAL_REGISTRY
        .set(registry.clone())
        .map_err(|_| TagError::validation("Property registry is already installed"))?;
    Ok(registry)
}

/// The installed process-wide registry, if any.
pub fn global() -> Option<Arc<PropertyRegistry>> {
    GLOBAL_REGISTRY.get().cloned()
}
