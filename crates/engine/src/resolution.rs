//! Property resolution engine
//!
//! Walks an attribute path step by step. For each step, against the current
//! object's type:
//!
//! 1. property tags for `(type, name)`, first whose property describes the
//!    object wins
//! 2. the core tag for `(type, name)`
//! 3. the type's fallback handler
//! 4. a base tag
//!
//! and otherwise fails with `UnknownAttribute`. Because of (1), when two
//! properties answer the same tag on the same object the earlier registrant
//! wins.

use tracing::{debug, warn};

use mechanist_domain::{Attribute, ObjectTag, TagError};

use crate::engine::Engine;
use crate::host::Host;
use crate::mechanism::ScriptContext;

/// State shared by every step of one resolution request
pub struct TagContext<'a> {
    engine: &'a Engine,
    script: &'a ScriptContext,
    steps: usize,
    nesting: usize,
}

impl<'a> TagContext<'a> {
    pub fn new(engine: &'a Engine, script: &'a ScriptContext) -> Self {
        Self {
            engine,
            script,
            steps: 0,
            nesting: 0,
        }
    }

    pub fn engine(&self) -> &'a Engine {
        self.engine
    }

    pub fn host(&self) -> &'a Host {
        self.engine.host()
    }

    pub fn script(&self) -> &'a ScriptContext {
        self.script
    }

    /// Steps dispatched so far in this request.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Resolves the rest of `attribute` starting at `object`.
    ///
    /// Handlers call this for nested lookups; those steps count against the
    /// same cap as the outer request, and each nested call counts against
    /// `max_attribute_nesting`.
    pub fn resolve(
        &mut self,
        object: ObjectTag,
        attribute: &mut Attribute,
    ) -> Result<ObjectTag, TagError> {
        let limit = self.engine.config().max_attribute_nesting;
        if self.nesting >= limit {
            return Err(TagError::AttributeDepthExceeded { limit });
        }
        self.nesting += 1;
        let result = self.walk(object, attribute);
        self.nesting -= 1;
        result
    }

    fn walk(&mut self, object: ObjectTag, attribute: &mut Attribute) -> Result<ObjectTag, TagError> {
        let mut current = object;
        while !attribute.is_complete() {
            self.count_step()?;
            current = self.resolve_step(&current, attribute)?;
            attribute.fulfill(1);
        }
        Ok(current)
    }

    /// Parses `path` and resolves it from `object`.
    pub fn resolve_path(&mut self, object: ObjectTag, path: &str) -> Result<ObjectTag, TagError> {
        let mut attribute = Attribute::parse(path)?;
        self.resolve(object, &mut attribute)
    }

    fn count_step(&mut self) -> Result<(), TagError> {
        self.steps += 1;
        let limit = self.engine.config().max_attribute_steps;
        if self.steps > limit {
            return Err(TagError::AttributeDepthExceeded { limit });
        }
        Ok(())
    }

    fn resolve_step(
        &mut self,
        object: &ObjectTag,
        attribute: &mut Attribute,
    ) -> Result<ObjectTag, TagError> {
        let engine = self.engine;
        let registry = engine.registry();
        let object_type = object.object_type();
        let name = attribute.name().to_string();

        for handler in registry.lookup_for_attribute(object_type, &name) {
            if handler.applies(object, engine.host()) {
                return handler.resolve(object, attribute, self);
            }
        }

        if let Some(handler) = registry.core_tag(object_type, &name) {
            return handler.resolve(object, attribute, self);
        }

        if let Some(fallback) = registry.fallback(object_type) {
            if let Some(value) = fallback.resolve(object, attribute, self)? {
                return Ok(value);
            }
        }

        if let Some(handler) = registry.base_tag(&name) {
            return handler.resolve(object, attribute, self);
        }

        Err(TagError::unknown_attribute(object_type, name))
    }
}

impl Engine {
    /// Reads `path` from `object`.
    ///
    /// Failures are reported on the script error channel (a `warn` log line)
    /// and returned.
    pub fn resolve_attribute(
        &self,
        object: &ObjectTag,
        path: &str,
        context: &ScriptContext,
    ) -> Result<ObjectTag, TagError> {
        let mut tag_context = TagContext::new(self, context);
        let result = tag_context.resolve_path(object.clone(), path);
        match &result {
            Ok(_) => debug!(
                script = context.label(),
                path,
                steps = tag_context.steps(),
                "Resolved attribute"
            ),
            Err(err) => warn!(
                script = context.label(),
                path,
                object_type = %object.object_type(),
                error = %err,
                "Tag failed"
            ),
        }
        result
    }
}
