//! `food` property of items
//!
//! Exposes the item's food component as a map:
//!
//! ```text
//! [nutrition=5;saturation=1;can_always_eat=true;eat_seconds=0.8;using_converts_to=i@bowl;effects=[type=speed;duration=30;amplifier=0;probability=1]|]
//! ```
//!
//! `nutrition`, `saturation` and `can_always_eat` are always present; the
//! other keys only when set.
//!
//! # Mechanisms
//!
//! `food` merges: keys present in the input overwrite, absent keys keep their
//! value, and `effects` (when present) replaces the whole effect list, so
//! applying the same input twice is a no-op. The legacy list form
//! `nutrition=5|effect=speed;duration=60` is accepted; its `effect=` entries
//! together form the new effect list. An empty value removes the component.
//!
//! `add_food_effect` appends one effect. It is additive: applying it twice
//! adds two effects.

use mechanist_domain::common::{format_decimal, format_f32, strip_prefix_ignore_case};
use mechanist_domain::value_objects::literal::{find_top_level, split_top_level};
use mechanist_domain::{
    Attribute, EffectKey, FoodComponent, FoodEffect, ItemStack, ItemTag, MaterialKey, ObjectTag,
    ObjectType, TagError, TagMap, TagValue, TICKS_PER_SECOND,
};

use crate::host::Host;
use crate::mechanism::Mechanism;
use crate::registry::{MechanismDoc, Property, PropertyTags, TagDoc};
use crate::resolution::TagContext;

pub struct ItemFood {
    item: ItemTag,
}

const FOOD_TAG: TagDoc = TagDoc::new(
    "MapTag",
    "Food component of the item: nutrition, saturation, can_always_eat, and eat_seconds, \
     using_converts_to and effects when set. Effect durations are in seconds.",
);

impl Property for ItemFood {
    const ID: &'static str = "food";
    const OWNER: ObjectType = ObjectType::Item;
    const MECHANISMS: &'static [MechanismDoc] = &[
        MechanismDoc::new(
            "food",
            "MapTag",
            "Sets food keys (nutrition, saturation, can_always_eat, eat_seconds, \
             using_converts_to, effects). Keys not given keep their value; an empty \
             value removes the food component.",
        ),
        MechanismDoc::new(
            "add_food_effect",
            "MapTag",
            "Appends one effect (type, duration, amplifier, probability). Applying it \
             twice adds the effect twice.",
        ),
    ];

    fn get_from(object: &ObjectTag, host: &Host) -> Option<Self> {
        let item = object.as_item()?;
        let stack = host.items.stack(item.id()).ok()?;
        (!stack.is_air()).then_some(Self { item })
    }

    fn property_string(&self, host: &Host) -> Result<Option<String>, TagError> {
        Ok(match self.stack(host)?.meta.food {
            Some(food) if !food.is_default() => Some(TagValue::Map(food_map(&food)).identify()),
            _ => None,
        })
    }

    fn adjust(&self, mechanism: &Mechanism, host: &Host) -> Result<(), TagError> {
        if mechanism.matches("food") {
            if !mechanism.has_value() {
                return self.write(host, None);
            }
            let input = read_input(mechanism)?;
            let food = merge(mechanism, self.food(host)?, input)?;
            self.write(host, Some(food))
        } else if mechanism.matches("add_food_effect") {
            if !mechanism.has_value() {
                return Err(mechanism.invalid("An effect is required"));
            }
            let effect = effect_from_map(mechanism, &single_effect_input(mechanism)?)?;
            let mut food = self.food(host)?;
            food.effects.push(effect);
            self.write(host, Some(food))
        } else {
            Err(TagError::unknown_mechanism(Self::OWNER, &mechanism.name))
        }
    }

    fn register_tags(tags: &mut PropertyTags<Self>) {
        tags.tag("food", FOOD_TAG, Self::food_tag);
    }
}

impl ItemFood {
    fn stack(&self, host: &Host) -> Result<ItemStack, TagError> {
        Ok(host.items.stack(self.item.id())?)
    }

    /// Current component, or the default when the item has none.
    pub fn food(&self, host: &Host) -> Result<FoodComponent, TagError> {
        Ok(self.stack(host)?.meta.food.unwrap_or_default())
    }

    /// Writes the component back in one host call. A default component is
    /// stored as no component.
    fn write(&self, host: &Host, food: Option<FoodComponent>) -> Result<(), TagError> {
        let mut meta = self.stack(host)?.meta;
        meta.food = food.filter(|f| !f.is_default());
        host.items.set_meta(self.item.id(), meta)?;
        Ok(())
    }

    fn food_tag(
        &self,
        _attribute: &mut Attribute,
        context: &mut TagContext<'_>,
    ) -> Result<ObjectTag, TagError> {
        let food = self.food(context.host())?;
        Ok(ObjectTag::from(TagValue::Map(food_map(&food))))
    }
}

pub fn food_map(food: &FoodComponent) -> TagMap {
    let mut map = TagMap::new();
    map.insert("nutrition".into(), food.nutrition.into());
    map.insert("saturation".into(), food.saturation.into());
    map.insert("can_always_eat".into(), food.can_always_eat.into());
    if let Some(seconds) = food.eat_seconds {
        map.insert("eat_seconds".into(), seconds.into());
    }
    if let Some(material) = &food.using_converts_to {
        map.insert("using_converts_to".into(), format!("i@{}", material).into());
    }
    if !food.effects.is_empty() {
        let effects = food.effects.iter().map(|e| TagValue::Map(effect_map(e))).collect();
        map.insert("effects".into(), TagValue::List(effects));
    }
    map
}

fn effect_map(effect: &FoodEffect) -> TagMap {
    let mut map = TagMap::new();
    map.insert("type".into(), effect.effect.to_string().into());
    map.insert("duration".into(), format_decimal(effect.duration_seconds()).into());
    map.insert("amplifier".into(), u32::from(effect.amplifier).into());
    map.insert("probability".into(), format_f32(effect.probability).into());
    map
}

// =============================================================================
// Input
// =============================================================================

#[derive(Default)]
struct FoodInput {
    fields: TagMap,
    legacy_effects: Vec<TagMap>,
}

fn read_input(mechanism: &Mechanism) -> Result<FoodInput, TagError> {
    let mut input = FoodInput::default();
    for entry in mechanism.value.as_list() {
        match entry {
            TagValue::Map(map) => input.fields.extend(map),
            TagValue::List(_) => return Err(mechanism.invalid("Nested lists are not food entries")),
            TagValue::Element(text) => read_text_entry(mechanism, &text, &mut input)?,
        }
    }
    Ok(input)
}

fn read_text_entry(mechanism: &Mechanism, text: &str, input: &mut FoodInput) -> Result<(), TagError> {
    let text = text.trim();
    if let Some(rest) = strip_prefix_ignore_case(text, "effect=") {
        input.legacy_effects.push(legacy_effect_map(mechanism, rest)?);
        return Ok(());
    }
    for segment in split_top_level(text, ';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let eq = find_top_level(segment, '=')
            .ok_or_else(|| mechanism.invalid(format!("'{}' is not a key=value pair", segment)))?;
        let value = TagValue::parse(segment[eq + 1..].trim())
            .map_err(|e| mechanism.invalid(e.to_string()))?;
        input.fields.insert(segment[..eq].trim().to_string(), value);
    }
    Ok(())
}

/// `speed;duration=60;amplifier=1;probability=0.5` to an effect map.
fn legacy_effect_map(mechanism: &Mechanism, text: &str) -> Result<TagMap, TagError> {
    let mut parts = text.split(';');
    let mut map = TagMap::new();
    let effect_type = parts.next().unwrap_or_default().trim();
    map.insert("type".into(), effect_type.into());
    for part in parts {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| mechanism.invalid(format!("'{}' is not a key=value pair", part)))?;
        map.insert(key.trim().to_string(), value.trim().into());
    }
    Ok(map)
}

/// Accepts a map, `type=speed;duration=5`, or the legacy `speed;duration=5`.
fn single_effect_input(mechanism: &Mechanism) -> Result<TagMap, TagError> {
    if let TagValue::Map(map) = &mechanism.value {
        return Ok(map.clone());
    }
    let text = mechanism.value.as_text();
    let text = text.trim();
    if let Some(rest) = strip_prefix_ignore_case(text, "effect=") {
        return legacy_effect_map(mechanism, rest);
    }
    let first = split_top_level(text, ';').into_iter().next().unwrap_or_default();
    if find_top_level(first, '=').is_none() && !text.starts_with('[') {
        return legacy_effect_map(mechanism, text);
    }
    mechanism.value_as_map()
}

// =============================================================================
// Merge
// =============================================================================

fn merge(mechanism: &Mechanism, mut food: FoodComponent, input: FoodInput) -> Result<FoodComponent, TagError> {
    let mut effects: Option<Vec<FoodEffect>> = None;
    for (key, value) in &input.fields {
        match key.to_ascii_lowercase().as_str() {
            "nutrition" => {
                let nutrition = value
                    .as_int()
                    .filter(|n| *n >= 0)
                    .and_then(|n| i32::try_from(n).ok())
                    .ok_or_else(|| {
                        mechanism.invalid(format!("nutrition '{}' must be a non-negative whole number", value))
                    })?;
                food.nutrition = nutrition;
            }
            "saturation" => {
                food.saturation = non_negative(mechanism, "saturation", value)? as f32;
            }
            "can_always_eat" => {
                food.can_always_eat = value.as_bool().ok_or_else(|| {
                    mechanism.invalid(format!("can_always_eat '{}' must be true or false", value))
                })?;
            }
            "eat_seconds" => {
                food.eat_seconds = if value.is_empty() {
                    None
                } else {
                    let seconds = value
                        .as_decimal()
                        .filter(|s| *s > 0.0)
                        .ok_or_else(|| mechanism.invalid(format!("eat_seconds '{}' must be positive", value)))?;
                    Some(seconds as f32)
                };
            }
            "using_converts_to" => {
                food.using_converts_to = if value.is_empty() {
                    None
                } else {
                    Some(converts_to(mechanism, value)?)
                };
            }
            "effects" => {
                let list = value
                    .as_list()
                    .iter()
                    .map(|entry| {
                        let map = entry.as_map().map_err(|e| mechanism.invalid(e.to_string()))?;
                        effect_from_map(mechanism, &map)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                effects = Some(list);
            }
            other => return Err(mechanism.invalid(format!("Unknown food key '{}'", other))),
        }
    }
    if !input.legacy_effects.is_empty() {
        let list = effects.get_or_insert_with(Vec::new);
        for map in &input.legacy_effects {
            list.push(effect_from_map(mechanism, map)?);
        }
    }
    if let Some(effects) = effects {
        food.effects = effects;
    }
    Ok(food)
}

fn non_negative(mechanism: &Mechanism, key: &str, value: &TagValue) -> Result<f64, TagError> {
    value
        .as_decimal()
        .filter(|v| *v >= 0.0)
        .ok_or_else(|| mechanism.invalid(format!("{} '{}' must be a non-negative number", key, value)))
}

fn converts_to(mechanism: &Mechanism, value: &TagValue) -> Result<MaterialKey, TagError> {
    let text = value.as_text();
    let text = text.trim();
    let base = strip_prefix_ignore_case(text, "i@").unwrap_or(text);
    MaterialKey::new(base).map_err(|e| mechanism.invalid(format!("using_converts_to: {}", e)))
}

fn effect_from_map(mechanism: &Mechanism, map: &TagMap) -> Result<FoodEffect, TagError> {
    let effect_type = map
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("type") || k.eq_ignore_ascii_case("effect"))
        .map(|(_, v)| v.as_text())
        .ok_or_else(|| mechanism.invalid("Effect is missing its type"))?;
    let key = EffectKey::new(&effect_type).map_err(|e| mechanism.invalid(e.to_string()))?;
    let mut effect = FoodEffect::new(key);

    for (key, value) in map {
        match key.to_ascii_lowercase().as_str() {
            "type" | "effect" => {}
            "duration" => {
                let ticks = non_negative(mechanism, "duration", value)? * f64::from(TICKS_PER_SECOND);
                if ticks > f64::from(u32::MAX) {
                    return Err(mechanism.invalid(format!("duration '{}' is too long", value)));
                }
                effect.duration_ticks = ticks.round() as u32;
            }
            "amplifier" => {
                effect.amplifier = value
                    .as_int()
                    .and_then(|a| u8::try_from(a).ok())
                    .ok_or_else(|| mechanism.invalid(format!("amplifier '{}' must be 0-255", value)))?;
            }
            "probability" => {
                let probability = value
                    .as_decimal()
                    .filter(|p| (0.0..=1.0).contains(p))
                    .ok_or_else(|| mechanism.invalid(format!("probability '{}' must be between 0 and 1", value)))?;
                effect.probability = probability as f32;
            }
            other => return Err(mechanism.invalid(format!("Unknown effect key '{}'", other))),
        }
    }
    Ok(effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::TestWorld;

    fn apple(world: &TestWorld) -> ObjectTag {
        world.item("apple")
    }

    #[test]
    fn default_item_has_default_food_map_and_no_property_string() {
        let world = TestWorld::new();
        let item = apple(&world);
        let food = world.resolve(&item, "food").unwrap();
        assert_eq!(
            food,
            ObjectTag::from(TagValue::map([
                ("nutrition", "0"),
                ("saturation", "0"),
                ("can_always_eat", "false"),
            ]))
        );
        assert_eq!(world.engine.identify(&item).unwrap(), "i@apple");
    }

    #[test]
    fn food_sets_fields_and_identify_omits_unset_ones() {
        let world = TestWorld::new();
        let item = apple(&world);
        world
            .mechanism(&item, "food", "[nutrition=5;saturation=1;can_always_eat=true]")
            .unwrap();
        assert_eq!(
            world.engine.identify(&item).unwrap(),
            "i@apple[food=[nutrition=5;saturation=1;can_always_eat=true]]"
        );
        assert_eq!(world.resolve(&item, "food.nutrition").unwrap(), ObjectTag::from("5"));
    }

    #[test]
    fn food_merges_with_existing_state() {
        let world = TestWorld::new();
        let item = apple(&world);
        world.mechanism(&item, "food", "[nutrition=5;saturation=2]").unwrap();
        world.mechanism(&item, "food", "[can_always_eat=true]").unwrap();

        let food = world.food(&item);
        assert_eq!(food.nutrition, 5);
        assert_eq!(food.saturation, 2.0);
        assert!(food.can_always_eat);
    }

    #[test]
    fn food_is_idempotent() {
        let world = TestWorld::new();
        let item = apple(&world);
        let input = "[nutrition=3;effects=[type=speed;duration=10]|]";
        world.mechanism(&item, "food", input).unwrap();
        let once = world.food(&item);
        world.mechanism(&item, "food", input).unwrap();
        assert_eq!(world.food(&item), once);
        assert_eq!(once.effects.len(), 1);
    }

    #[test]
    fn add_food_effect_is_additive() {
        let world = TestWorld::new();
        let item = apple(&world);
        world
            .mechanism(&item, "add_food_effect", "[type=speed;duration=5;amplifier=1]")
            .unwrap();
        world
            .mechanism(&item, "add_food_effect", "[type=speed;duration=5;amplifier=1]")
            .unwrap();

        let food = world.food(&item);
        assert_eq!(food.effects.len(), 2);
        assert_eq!(food.effects[0].duration_ticks, 100);
        assert_eq!(food.effects[0].amplifier, 1);
    }

    #[test]
    fn add_food_effect_accepts_legacy_text() {
        let world = TestWorld::new();
        let item = apple(&world);
        world
            .mechanism(&item, "add_food_effect", "jump_boost;duration=60;probability=0.5")
            .unwrap();
        let effect = &world.food(&item).effects[0];
        assert_eq!(effect.effect.as_str(), "jump_boost");
        assert_eq!(effect.duration_ticks, 1200);
        assert_eq!(effect.probability, 0.5);
    }

    #[test]
    fn legacy_list_form_is_accepted() {
        let world = TestWorld::new();
        let item = apple(&world);
        world
            .mechanism(
                &item,
                "food",
                "nutrition=5|saturation=1|can_always_eat=true|eat_seconds=0.3|using_converts_to=stone|effect=jump_boost;duration=60;amplifier=1;probability=0.1|effect=strength;duration=60",
            )
            .unwrap();

        let food = world.food(&item);
        assert_eq!(food.nutrition, 5);
        assert_eq!(food.eat_seconds, Some(0.3));
        assert_eq!(food.using_converts_to, Some(MaterialKey::new("stone").unwrap()));
        assert_eq!(food.effects.len(), 2);
        assert_eq!(food.effects[1].effect.as_str(), "strength");
        assert_eq!(food.effects[1].amplifier, 0);
        assert_eq!(food.effects[1].probability, 1.0);
    }

    #[test]
    fn invalid_entry_aborts_whole_batch() {
        let world = TestWorld::new();
        let item = apple(&world);
        world.mechanism(&item, "food", "[nutrition=2]").unwrap();
        let before = world.food(&item);

        let err = world
            .mechanism(&item, "food", "[nutrition=7;saturation=lots]")
            .unwrap_err();
        assert!(matches!(err, TagError::InvalidMechanismValue { .. }));
        assert_eq!(world.food(&item), before);

        let err = world.mechanism(&item, "food", "[nutrition=7;flavour=sweet]").unwrap_err();
        assert!(err.to_string().contains("flavour"));
        assert_eq!(world.food(&item), before);
    }

    #[test]
    fn empty_value_removes_component() {
        let world = TestWorld::new();
        let item = apple(&world);
        world.mechanism(&item, "food", "[nutrition=2]").unwrap();
        world.mechanism(&item, "food", "").unwrap();
        assert_eq!(world.stack(&item).meta.food, None);
    }

    #[test]
    fn air_is_not_described() {
        let world = TestWorld::new();
        let air = world.item("air");
        let err = world.mechanism(&air, "food", "[nutrition=1]").unwrap_err();
        assert!(matches!(err, TagError::MechanismNotApplicable { property: "food", .. }));
        assert!(matches!(
            world.resolve(&air, "food"),
            Err(TagError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn full_component_round_trips_through_identify() {
        let world = TestWorld::new();
        let item = world.item("mushroom_stew");
        world
            .mechanism(
                &item,
                "food",
                "[nutrition=6;saturation=7.2;eat_seconds=1.6;using_converts_to=i@bowl;effects=[type=nausea;duration=2.5;probability=0.3]|[type=speed;duration=10;amplifier=2]]",
            )
            .unwrap();
        let literal = world.engine.identify(&item).unwrap();
        let parsed = world.engine.parse(&literal).unwrap();
        assert!(parsed.is_clean(), "{:?}", parsed.errors);
        assert_eq!(world.food(&parsed.object), world.food(&item));
        assert_eq!(world.engine.identify(&parsed.object).unwrap(), literal);
    }
}
