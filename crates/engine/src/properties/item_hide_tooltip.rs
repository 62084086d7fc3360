//! `hide_tooltip` property of items.

use mechanist_domain::{Attribute, ItemTag, ObjectTag, ObjectType, TagError};

use crate::host::Host;
use crate::mechanism::Mechanism;
use crate::registry::{MechanismDoc, Property, PropertyTags, TagDoc};
use crate::resolution::TagContext;

pub struct ItemHideTooltip {
    item: ItemTag,
}

impl ItemHideTooltip {
    fn hidden(&self, host: &Host) -> Result<bool, TagError> {
        Ok(host.items.stack(self.item.id())?.meta.hide_tooltip)
    }

    fn hide_tooltip_tag(
        &self,
        _attribute: &mut Attribute,
        context: &mut TagContext<'_>,
    ) -> Result<ObjectTag, TagError> {
        self.hidden(context.host()).map(ObjectTag::from)
    }
}

impl Property for ItemHideTooltip {
    const ID: &'static str = "hide_tooltip";
    const OWNER: ObjectType = ObjectType::Item;
    const MECHANISMS: &'static [MechanismDoc] = &[MechanismDoc::new(
        "hide_tooltip",
        "ElementTag(Boolean)",
        "Sets whether the item's tooltip is hidden entirely.",
    )];

    fn get_from(object: &ObjectTag, host: &Host) -> Option<Self> {
        let item = object.as_item()?;
        let stack = host.items.stack(item.id()).ok()?;
        (!stack.is_air()).then_some(Self { item })
    }

    fn property_string(&self, host: &Host) -> Result<Option<String>, TagError> {
        Ok(self.hidden(host)?.then(|| "true".to_string()))
    }

    fn adjust(&self, mechanism: &Mechanism, host: &Host) -> Result<(), TagError> {
        if !mechanism.matches("hide_tooltip") {
            return Err(TagError::unknown_mechanism(Self::OWNER, &mechanism.name));
        }
        let hidden = mechanism.require_bool()?;
        let mut meta = host.items.stack(self.item.id())?.meta;
        meta.hide_tooltip = hidden;
        host.items.set_meta(self.item.id(), meta)?;
        Ok(())
    }

    fn register_tags(tags: &mut PropertyTags<Self>) {
        tags.tag(
            "hide_tooltip",
            TagDoc::new(
                "ElementTag(Boolean)",
                "Whether the item's tooltip is hidden entirely.",
            ),
            Self::hide_tooltip_tag,
        );
    }
}
