//! Mechanism dispatch
//!
//! Finds the single property that owns a mechanism name on the object's type,
//! checks it describes the object, and hands it the invocation. Properties
//! validate the whole input before writing anything back to the host, so a
//! failed call leaves the object unmodified.

use tracing::{debug, warn};

use mechanist_domain::{ObjectTag, TagError, TagValue};

use crate::engine::Engine;
use crate::mechanism::{Mechanism, ScriptContext};

impl Engine {
    /// Applies mechanism `name` with `value` to `object`.
    ///
    /// # Errors
    ///
    /// - `UnknownMechanism` when no property owns `name` for the object type
    /// - `MechanismNotApplicable` when the owner does not describe the object
    /// - `InvalidMechanismValue` when the value is rejected
    ///
    /// Errors are also logged at `warn` on the script error channel.
    pub fn apply_mechanism(
        &self,
        object: &ObjectTag,
        name: &str,
        value: impl Into<TagValue>,
        context: &ScriptContext,
    ) -> Result<(), TagError> {
        let mechanism = Mechanism::new(name, value).with_context(context.clone());
        let result = self.adjust(object, &mechanism);
        if let Err(err) = &result {
            warn!(
                script = context.label(),
                mechanism = %mechanism.name,
                object_type = %object.object_type(),
                error = %err,
                "Mechanism failed"
            );
        }
        result
    }

    /// Dispatches a prepared mechanism without logging failures.
    pub(crate) fn adjust(&self, object: &ObjectTag, mechanism: &Mechanism) -> Result<(), TagError> {
        let object_type = object.object_type();
        let descriptor = self
            .registry()
            .lookup_for_mechanism(object_type, &mechanism.name)
            .ok_or_else(|| TagError::unknown_mechanism(object_type, &mechanism.name))?;

        if !descriptor.describes(object, self.host()) {
            return Err(TagError::MechanismNotApplicable {
                object_type,
                mechanism: mechanism.name.clone(),
                property: descriptor.id,
            });
        }

        debug!(
            mechanism = %mechanism.name,
            property = descriptor.id,
            object_type = %object_type,
            "Dispatching mechanism"
        );
        descriptor.adjust(object, mechanism, self.host())
    }
}
