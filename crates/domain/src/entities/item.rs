//! Item host state - the stack a host item handle points at
//!
//! The host owns this data. Property code reads a copy, edits the copy and
//! hands it back in one `set_meta` call, so a half-applied edit never reaches
//! the host.

use serde::{Deserialize, Serialize};

use crate::value_objects::{EffectKey, MaterialKey};

/// Ticks per second on the host's game loop
pub const TICKS_PER_SECOND: u32 = 20;

/// A stack of items as the host stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub material: MaterialKey,
    pub quantity: u32,
    pub meta: ItemMeta,
}

impl ItemStack {
    pub fn new(material: MaterialKey) -> Self {
        Self {
            material,
            quantity: 1,
            meta: ItemMeta::default(),
        }
    }

    pub fn is_air(&self) -> bool {
        self.material.is_air()
    }
}

/// Item metadata components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMeta {
    /// `None` when the item carries no food component
    pub food: Option<FoodComponent>,
    pub hide_tooltip: bool,
}

/// Food component of an item
///
/// # Defaults
///
/// A fresh component restores nothing, cannot be eaten when full, uses the
/// host's standard eating time and has no effects. `eat_seconds` and
/// `using_converts_to` stay `None` until explicitly set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodComponent {
    pub nutrition: i32,
    pub saturation: f32,
    pub can_always_eat: bool,
    pub eat_seconds: Option<f32>,
    /// Material left behind after eating (e.g. a bowl)
    pub using_converts_to: Option<MaterialKey>,
    pub effects: Vec<FoodEffect>,
}

impl FoodComponent {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A potion effect applied with some probability when the food is eaten
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEffect {
    pub effect: EffectKey,
    pub duration_ticks: u32,
    pub amplifier: u8,
    /// Chance in `0.0..=1.0`
    pub probability: f32,
}

impl FoodEffect {
    /// Default duration for effects given without one
    pub const DEFAULT_DURATION_SECONDS: f64 = 30.0;

    pub fn new(effect: EffectKey) -> Self {
        Self {
            effect,
            duration_ticks: (Self::DEFAULT_DURATION_SECONDS as u32) * TICKS_PER_SECOND,
            amplifier: 0,
            probability: 1.0,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        f64::from(self.duration_ticks) / f64::from(TICKS_PER_SECOND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> MaterialKey {
        MaterialKey::new(k).unwrap()
    }

    #[test]
    fn new_stack_has_empty_meta() {
        let stack = ItemStack::new(key("apple"));
        assert_eq!(stack.quantity, 1);
        assert_eq!(stack.meta, ItemMeta::default());
        assert!(!stack.is_air());
    }

    #[test]
    fn default_food_component_is_default() {
        let mut food = FoodComponent::default();
        assert!(food.is_default());
        food.nutrition = 4;
        assert!(!food.is_default());
    }

    #[test]
    fn effect_duration_in_seconds() {
        let mut effect = FoodEffect::new(EffectKey::new("speed").unwrap());
        assert_eq!(effect.duration_seconds(), 30.0);
        effect.duration_ticks = 50;
        assert_eq!(effect.duration_seconds(), 2.5);
    }
}
