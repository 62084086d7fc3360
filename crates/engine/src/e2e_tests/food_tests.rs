//! Food components through the script surface.

use mechanist_domain::{ObjectTag, TagError, TagValue};

use crate::test_fixtures::TestWorld;

/// Setting nutrition, saturation and can_always_eat shows up in identify
/// without eat-time fields, and reads back through the food map.
#[test]
fn test_food_scenario() {
    let world = TestWorld::new();
    let apple = world.item("apple");

    world
        .mechanism(
            &apple,
            "food",
            TagValue::map([
                ("nutrition", "5"),
                ("saturation", "1"),
                ("can_always_eat", "true"),
            ]),
        )
        .expect("Food mechanism should apply");

    let literal = world.engine.identify(&apple).expect("Identify should succeed");
    assert!(
        literal.contains("food=[nutrition=5;saturation=1;can_always_eat=true]"),
        "unexpected literal {}",
        literal
    );
    assert!(!literal.contains("eat_seconds"));

    assert_eq!(
        world.resolve(&apple, "food.can_always_eat").expect("Tag should resolve"),
        ObjectTag::from("true")
    );
    assert_eq!(
        world.resolve(&apple, "food.get[saturation]").expect("Tag should resolve"),
        ObjectTag::from("1")
    );
}

/// One bad value aborts the whole call and leaves the item as it was.
#[test]
fn test_batch_abort_leaves_item_untouched() {
    let world = TestWorld::new();
    let bread = world.item("bread");
    world
        .mechanism(&bread, "food", "[nutrition=5;saturation=6]")
        .expect("Food mechanism should apply");
    let before = world.stack(&bread);

    let err = world
        .mechanism(&bread, "food", "[nutrition=9;saturation=lots]")
        .expect_err("Bad saturation should be rejected");
    assert!(matches!(err, TagError::InvalidMechanismValue { .. }));
    assert_eq!(world.stack(&bread), before);
}

/// Mechanisms are looked up per object type.
#[test]
fn test_food_is_unknown_on_other_types() {
    let world = TestWorld::new();
    let stone = world.material("stone");
    assert!(matches!(
        world.mechanism(&stone, "food", "[nutrition=1]"),
        Err(TagError::UnknownMechanism { .. })
    ));
    assert!(matches!(
        world.mechanism(&ObjectTag::from("apple"), "food", "[nutrition=1]"),
        Err(TagError::UnknownMechanism { .. })
    ));
}

/// Applying the same food input twice is the same as applying it once;
/// adding an effect twice gives two effects.
#[test]
fn test_idempotence_and_additive_effects() {
    let world = TestWorld::new();
    let carrot = world.item("carrot");
    let input = "[nutrition=3;effects=[type=speed;duration=10]|[type=haste;duration=5]]";

    world.mechanism(&carrot, "food", input).expect("Food should apply");
    let once = world.engine.identify(&carrot).expect("Identify should succeed");
    world.mechanism(&carrot, "food", input).expect("Food should apply");
    assert_eq!(world.engine.identify(&carrot).expect("Identify should succeed"), once);

    world
        .mechanism(&carrot, "add_food_effect", "[type=regeneration;duration=2]")
        .expect("Effect should apply");
    world
        .mechanism(&carrot, "add_food_effect", "[type=regeneration;duration=2]")
        .expect("Effect should apply");
    assert_eq!(world.food(&carrot).effects.len(), 4);
}
