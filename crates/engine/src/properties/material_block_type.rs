//! `type` property of block materials
//!
//! Covers slabs (`TOP`, `BOTTOM`, `DOUBLE`), piston heads (`NORMAL`,
//! `STICKY`), campfires (`NORMAL`, `SIGNAL`) and, on 1.17+ servers, pointed
//! dripstone (`BASE`, `FRUSTUM`, `MIDDLE`, `TIP`, `TIP_MERGE`).
//! `slab_type` is kept as a deprecated alias for the tag and mechanism.

use mechanist_domain::common::eq_ignore_case;
use mechanist_domain::{
    Attribute, BlockData, DripstoneThickness, MaterialTag, ObjectTag, ObjectType, PistonType,
    ServerVersion, SlabType, TagError,
};

use crate::host::Host;
use crate::mechanism::Mechanism;
use crate::registry::{MechanismDoc, Property, PropertyTags, TagDoc};
use crate::resolution::TagContext;

pub struct MaterialBlockType {
    material: MaterialTag,
    data: BlockData,
}

const TYPE_TAG: TagDoc = TagDoc::new(
    "ElementTag",
    "Current type of the block. Slabs: TOP, BOTTOM, DOUBLE. Piston heads: NORMAL, STICKY. \
     Campfires: NORMAL, SIGNAL. Pointed dripstone: BASE, FRUSTUM, MIDDLE, TIP, TIP_MERGE.",
);

const TYPE_MECHANISM: &str = "Sets the current type of the block. Slabs: TOP, BOTTOM, DOUBLE. \
     Piston heads: NORMAL, STICKY. Campfires: NORMAL, SIGNAL. Pointed dripstone: BASE, FRUSTUM, \
     MIDDLE, TIP, TIP_MERGE.";

fn has_type(data: &BlockData, version: ServerVersion) -> bool {
    match data {
        BlockData::Slab(_) | BlockData::TechnicalPiston(_) | BlockData::Campfire { .. } => true,
        BlockData::PointedDripstone(_) => version.is_at_least(ServerVersion::V1_17),
        BlockData::Plain => false,
    }
}

impl MaterialBlockType {
    pub fn type_name(&self) -> &'static str {
        match self.data {
            BlockData::Slab(slab) => slab.name(),
            BlockData::TechnicalPiston(piston) => piston.name(),
            BlockData::Campfire { signal_fire: true } => "SIGNAL",
            BlockData::Campfire { signal_fire: false } => "NORMAL",
            BlockData::PointedDripstone(thickness) => thickness.name(),
            BlockData::Plain => "",
        }
    }

    fn type_tag(
        &self,
        _attribute: &mut Attribute,
        _context: &mut TagContext<'_>,
    ) -> Result<ObjectTag, TagError> {
        Ok(ObjectTag::from(self.type_name()))
    }

    fn updated(&self, mechanism: &Mechanism) -> Result<BlockData, TagError> {
        Ok(match self.data {
            BlockData::Slab(_) => BlockData::Slab(mechanism.require_enum::<SlabType>()?),
            BlockData::TechnicalPiston(_) => {
                BlockData::TechnicalPiston(mechanism.require_enum::<PistonType>()?)
            }
            BlockData::Campfire { .. } => {
                let text = mechanism.value.as_text();
                let signal_fire = if eq_ignore_case(text.trim(), "signal") {
                    true
                } else if eq_ignore_case(text.trim(), "normal") {
                    false
                } else {
                    return Err(mechanism.invalid(format!(
                        "Unknown campfire type: '{}' (expected one of NORMAL, SIGNAL)",
                        text
                    )));
                };
                BlockData::Campfire { signal_fire }
            }
            BlockData::PointedDripstone(_) => {
                BlockData::PointedDripstone(mechanism.require_enum::<DripstoneThickness>()?)
            }
            BlockData::Plain => {
                return Err(mechanism.invalid("Block has no type"));
            }
        })
    }
}

impl Property for MaterialBlockType {
    const ID: &'static str = "type";
    const OWNER: ObjectType = ObjectType::Material;
    const MECHANISMS: &'static [MechanismDoc] = &[
        MechanismDoc::new("type", "ElementTag", TYPE_MECHANISM),
        MechanismDoc::new("slab_type", "ElementTag", "Deprecated alias of 'type'."),
    ];

    fn get_from(object: &ObjectTag, host: &Host) -> Option<Self> {
        let material = object.as_material()?;
        let data = host.materials.state(material.id()).ok()?.block_data?;
        has_type(&data, host.version).then_some(Self { material, data })
    }

    fn property_string(&self, host: &Host) -> Result<Option<String>, TagError> {
        let state = host.materials.state(self.material.id())?;
        if BlockData::default_for(&state.key) == Some(self.data) {
            return Ok(None);
        }
        Ok(Some(self.type_name().to_string()))
    }

    fn adjust(&self, mechanism: &Mechanism, host: &Host) -> Result<(), TagError> {
        if !(mechanism.matches("type") || mechanism.matches("slab_type")) {
            return Err(TagError::unknown_mechanism(Self::OWNER, &mechanism.name));
        }
        let data = self.updated(mechanism)?;
        host.materials.set_block_data(self.material.id(), data)?;
        Ok(())
    }

    fn register_tags(tags: &mut PropertyTags<Self>) {
        tags.tag("type", TYPE_TAG, Self::type_tag).tag(
            "slab_type",
            TYPE_TAG.deprecated_for("type"),
            Self::type_tag,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::TestWorld;

    #[test]
    fn slab_type_reads_and_writes() {
        let world = TestWorld::new();
        let slab = world.material("oak_slab");
        assert_eq!(world.resolve(&slab, "type").unwrap(), ObjectTag::from("BOTTOM"));
        assert_eq!(world.engine.identify(&slab).unwrap(), "m@oak_slab");

        world.mechanism(&slab, "type", "top").unwrap();
        assert_eq!(world.resolve(&slab, "type").unwrap(), ObjectTag::from("TOP"));
        assert_eq!(world.engine.identify(&slab).unwrap(), "m@oak_slab[type=TOP]");

        world.mechanism(&slab, "slab_type", "DOUBLE").unwrap();
        assert_eq!(world.resolve(&slab, "slab_type").unwrap(), ObjectTag::from("DOUBLE"));

        world.mechanism(&slab, "type", "bottom").unwrap();
        assert_eq!(world.engine.identify(&slab).unwrap(), "m@oak_slab");
    }

    #[test]
    fn campfire_and_piston_values() {
        let world = TestWorld::new();
        let campfire = world.material("campfire");
        assert_eq!(world.resolve(&campfire, "type").unwrap(), ObjectTag::from("NORMAL"));
        world.mechanism(&campfire, "type", "Signal").unwrap();
        assert_eq!(world.engine.identify(&campfire).unwrap(), "m@campfire[type=SIGNAL]");
        assert!(world.mechanism(&campfire, "type", "smoky").is_err());

        let piston = world.material("piston_head");
        world.mechanism(&piston, "type", "sticky").unwrap();
        assert_eq!(world.resolve(&piston, "type").unwrap(), ObjectTag::from("STICKY"));
    }

    #[test]
    fn invalid_value_leaves_block_unchanged() {
        let world = TestWorld::new();
        let slab = world.material("stone_slab");
        let err = world.mechanism(&slab, "type", "sideways").unwrap_err();
        assert!(matches!(err, TagError::InvalidMechanismValue { .. }));
        assert_eq!(world.resolve(&slab, "type").unwrap(), ObjectTag::from("BOTTOM"));
    }

    #[test]
    fn plain_blocks_are_not_described() {
        let world = TestWorld::new();
        let stone = world.material("stone");
        assert!(matches!(
            world.mechanism(&stone, "type", "TOP"),
            Err(TagError::MechanismNotApplicable { property: "type", .. })
        ));
        assert_eq!(world.engine.identify(&stone).unwrap(), "m@stone");
    }

    #[test]
    fn dripstone_requires_1_17() {
        let modern = TestWorld::new();
        let dripstone = modern.material("pointed_dripstone");
        modern.mechanism(&dripstone, "type", "tip_merge").unwrap();
        assert_eq!(
            modern.engine.identify(&dripstone).unwrap(),
            "m@pointed_dripstone[type=TIP_MERGE]"
        );

        let old = TestWorld::with_version(ServerVersion::new(1, 16, 5));
        let dripstone = old.material("pointed_dripstone");
        assert!(matches!(
            old.resolve(&dripstone, "type"),
            Err(TagError::UnknownAttribute { .. })
        ));
        assert_eq!(old.engine.identify(&dripstone).unwrap(), "m@pointed_dripstone");
    }
}
