//! Pre-game loadout editing with the constraint rules enforced on every change.
//!
//! A [`LoadoutDraft`] can only be changed through its setters, and each setter
//! leaves the draft valid:
//!
//! - at most one of Dual Adept's Gloves, Triple Adept's Gloves and Headmaster
//!   Ring is equipped; enabling one unequips the other two
//! - Multitasker's Schedule and the Lightning element exclude each other
//! - ability scopes survive only while one of those two is active
//! - equipped abilities never exceed `1 + dual + 2 * triple + 3 * ring`
//!
//! The item cost cap is advisory. Exceeding it raises a warning for the UI but
//! never blocks a change.
use std::collections::BTreeSet;

use game_core::{AbilityId, AbilitySlot, ElementId, ItemId, LoadoutConfig, PieceKind};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadoutError {
    #[error("all {slots} ability slots are in use")]
    SlotsFull { slots: u8 },

    #[error("piece-type scoping needs the Lightning element or Multitasker's Schedule")]
    ScopingUnavailable,

    #[error("{0:?} is not equipped")]
    AbilityNotEquipped(AbilityId),
}

/// Checked/enabled pair for one UI control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Control {
    pub checked: bool,
    pub enabled: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadoutDraft {
    element: ElementId,
    items: BTreeSet<ItemId>,
    /// In the order they were enabled.
    abilities: Vec<AbilitySlot>,
}

impl LoadoutDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a config through the regular setters, dropping whatever the
    /// rules reject.
    pub fn from_config(config: &LoadoutConfig) -> Self {
        let mut draft = Self::new();
        draft.set_element(config.element);
        for item in &config.items {
            draft.set_item(*item, true);
        }
        for slot in &config.abilities {
            if let Err(err) = draft.set_ability(slot.ability, true) {
                tracing::warn!(ability = ?slot.ability, %err, "dropping ability from loaded loadout");
                continue;
            }
            if slot.scoped_kind.is_some() {
                if let Err(err) = draft.set_scope(slot.ability, slot.scoped_kind) {
                    tracing::warn!(ability = ?slot.ability, %err, "dropping scope from loaded loadout");
                }
            }
        }
        draft
    }

    pub fn to_config(&self) -> LoadoutConfig {
        LoadoutConfig {
            element: self.element,
            items: self.items.iter().copied().collect(),
            abilities: self.abilities.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().copied()
    }

    pub fn abilities(&self) -> &[AbilitySlot] {
        &self.abilities
    }

    pub fn has_item(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    pub fn has_ability(&self, ability: AbilityId) -> bool {
        self.abilities.iter().any(|slot| slot.ability == ability)
    }

    pub fn scope(&self, ability: AbilityId) -> Option<PieceKind> {
        self.abilities
            .iter()
            .find(|slot| slot.ability == ability)
            .and_then(|slot| slot.scoped_kind)
    }

    pub fn ability_slots(&self) -> u8 {
        1 + self.items.iter().map(|item| item.ability_slot_bonus()).sum::<u8>()
    }

    pub fn slots_used(&self) -> u8 {
        self.abilities.len() as u8
    }

    pub fn item_cost(&self) -> u8 {
        self.items.iter().map(|item| item.slot_cost()).sum()
    }

    /// Advisory only; the draft stays submittable either way.
    pub fn exceeds_cost_cap(&self, cap: u8) -> bool {
        self.item_cost() > cap
    }

    pub fn scoping_allowed(&self) -> bool {
        self.element.grants_scoping() || self.has_item(ItemId::MultitaskersSchedule)
    }

    pub fn item_control(&self, item: ItemId) -> Control {
        Control {
            checked: self.has_item(item),
            enabled: true,
        }
    }

    /// Unchecked abilities are disabled once every slot is used.
    pub fn ability_control(&self, ability: AbilityId) -> Control {
        let checked = self.has_ability(ability);
        Control {
            checked,
            enabled: checked || self.slots_used() < self.ability_slots(),
        }
    }

    pub fn scope_control(&self, ability: AbilityId) -> Control {
        Control {
            checked: self.scope(ability).is_some(),
            enabled: self.scoping_allowed() && self.has_ability(ability),
        }
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    /// Choosing Lightning unequips Multitasker's Schedule.
    pub fn set_element(&mut self, element: ElementId) {
        self.element = element;
        if element.grants_scoping() {
            self.items.remove(&ItemId::MultitaskersSchedule);
        }
        self.normalize();
    }

    /// Equips or unequips `item`. Slot items displace each other, and
    /// Multitasker's Schedule displaces Lightning (back to the default element).
    pub fn set_item(&mut self, item: ItemId, enabled: bool) {
        if !enabled {
            self.items.remove(&item);
            self.normalize();
            return;
        }
        if item.is_slot_item() {
            for other in ItemId::SLOT_TRIO {
                if other != item {
                    self.items.remove(&other);
                }
            }
        }
        if item.grants_scoping() && self.element.grants_scoping() {
            self.element = ElementId::default();
        }
        self.items.insert(item);
        self.normalize();
    }

    pub fn toggle_item(&mut self, item: ItemId) {
        self.set_item(item, !self.has_item(item));
    }

    /// Enabling past the slot budget is refused; everything else is idempotent.
    pub fn set_ability(&mut self, ability: AbilityId, enabled: bool) -> Result<(), LoadoutError> {
        match (enabled, self.has_ability(ability)) {
            (true, true) | (false, false) => Ok(()),
            (true, false) => {
                let slots = self.ability_slots();
                if self.slots_used() >= slots {
                    return Err(LoadoutError::SlotsFull { slots });
                }
                self.abilities.push(AbilitySlot {
                    ability,
                    scoped_kind: None,
                });
                Ok(())
            }
            (false, true) => {
                self.abilities.retain(|slot| slot.ability != ability);
                Ok(())
            }
        }
    }

    pub fn toggle_ability(&mut self, ability: AbilityId) -> Result<(), LoadoutError> {
        self.set_ability(ability, !self.has_ability(ability))
    }

    pub fn set_scope(&mut self, ability: AbilityId, kind: Option<PieceKind>) -> Result<(), LoadoutError> {
        if kind.is_some() && !self.scoping_allowed() {
            return Err(LoadoutError::ScopingUnavailable);
        }
        let slot = self
            .abilities
            .iter_mut()
            .find(|slot| slot.ability == ability)
            .ok_or(LoadoutError::AbilityNotEquipped(ability))?;
        slot.scoped_kind = kind;
        Ok(())
    }

    /// Re-establishes the invariants after an item or element change.
    fn normalize(&mut self) {
        let slots = self.ability_slots() as usize;
        if self.abilities.len() > slots {
            let dropped: Vec<AbilityId> = self.abilities[slots..].iter().map(|s| s.ability).collect();
            tracing::debug!(?dropped, slots, "slot budget shrank; dropping newest abilities");
            self.abilities.truncate(slots);
        }
        if !self.scoping_allowed() {
            for slot in &mut self.abilities {
                slot.scoped_kind = None;
            }
        }
    }
}
