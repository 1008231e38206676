//! Closed identifier sets for per-side loadouts and the submitted config shape.
//!
//! Elements, items and abilities travel as small integers. They are decoded
//! into exhaustive enums at the boundary so every rule downstream can match
//! on them instead of comparing raw numbers.
use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::board::PieceKind;
use crate::error::IdError;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    strum::Display,
    strum::IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum ElementId {
    Water = 0,
    Fire = 1,
    #[default]
    Earth = 2,
    #[strum(serialize = "Air/Wind")]
    Air = 3,
    Lightning = 4,
}

impl ElementId {
    /// Lightning lets abilities be restricted to a single piece type.
    pub const fn grants_scoping(self) -> bool {
        matches!(self, ElementId::Lightning)
    }
}

impl TryFrom<u8> for ElementId {
    type Error = IdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => ElementId::Water,
            1 => ElementId::Fire,
            2 => ElementId::Earth,
            3 => ElementId::Air,
            4 => ElementId::Lightning,
            other => return Err(IdError::Element(other)),
        })
    }
}

impl From<ElementId> for u8 {
    fn from(id: ElementId) -> Self {
        id as u8
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    strum::Display,
    strum::IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum ItemId {
    #[strum(serialize = "Multitasker's Schedule")]
    MultitaskersSchedule = 1,
    #[strum(serialize = "Poisoned Dagger")]
    PoisonedDagger = 2,
    #[strum(serialize = "Dual Adept's Gloves")]
    DualAdeptsGloves = 3,
    #[strum(serialize = "Triple Adept's Gloves")]
    TripleAdeptsGloves = 4,
    #[strum(serialize = "Headmaster Ring")]
    HeadmasterRing = 5,
    #[strum(serialize = "Pot of Hunger")]
    PotOfHunger = 6,
    #[strum(serialize = "Solar Necklace")]
    SolarNecklace = 7,
}

impl ItemId {
    /// Items that add ability slots; at most one may be equipped.
    pub const SLOT_TRIO: [ItemId; 3] = [
        ItemId::DualAdeptsGloves,
        ItemId::TripleAdeptsGloves,
        ItemId::HeadmasterRing,
    ];

    pub const fn slot_cost(self) -> u8 {
        match self {
            ItemId::TripleAdeptsGloves => 2,
            ItemId::HeadmasterRing => 3,
            _ => 1,
        }
    }

    /// Extra ability slots granted on top of the base slot.
    pub const fn ability_slot_bonus(self) -> u8 {
        match self {
            ItemId::DualAdeptsGloves => 1,
            ItemId::TripleAdeptsGloves => 2,
            ItemId::HeadmasterRing => 3,
            _ => 0,
        }
    }

    pub const fn is_slot_item(self) -> bool {
        self.ability_slot_bonus() > 0
    }

    /// Multitasker's Schedule lets abilities be restricted to a single piece type.
    pub const fn grants_scoping(self) -> bool {
        matches!(self, ItemId::MultitaskersSchedule)
    }
}

impl TryFrom<u8> for ItemId {
    type Error = IdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => ItemId::MultitaskersSchedule,
            2 => ItemId::PoisonedDagger,
            3 => ItemId::DualAdeptsGloves,
            4 => ItemId::TripleAdeptsGloves,
            5 => ItemId::HeadmasterRing,
            6 => ItemId::PotOfHunger,
            7 => ItemId::SolarNecklace,
            other => return Err(IdError::Item(other)),
        })
    }
}

impl From<ItemId> for u8 {
    fn from(id: ItemId) -> Self {
        id as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityCategory {
    Defensive,
    Offensive,
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    strum::Display,
    strum::IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum AbilityId {
    #[strum(serialize = "Block Path")]
    BlockPath = 1,
    Stalwart = 2,
    Belligerent = 3,
    Redo = 4,
    #[strum(serialize = "Double Kill")]
    DoubleKill = 5,
    #[strum(serialize = "Quantum Kill")]
    QuantumKill = 6,
    #[strum(serialize = "Chain Kill")]
    ChainKill = 7,
    Necromancer = 8,
}

impl AbilityId {
    pub const fn category(self) -> AbilityCategory {
        match self {
            AbilityId::BlockPath | AbilityId::Stalwart | AbilityId::Belligerent | AbilityId::Redo => {
                AbilityCategory::Defensive
            }
            AbilityId::DoubleKill
            | AbilityId::QuantumKill
            | AbilityId::ChainKill
            | AbilityId::Necromancer => AbilityCategory::Offensive,
        }
    }

    /// Consumable abilities draw from charges or pools that a top-up can refill.
    pub const fn is_consumable(self) -> bool {
        matches!(self, AbilityId::Redo | AbilityId::Necromancer)
    }
}

impl TryFrom<u8> for AbilityId {
    type Error = IdError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => AbilityId::BlockPath,
            2 => AbilityId::Stalwart,
            3 => AbilityId::Belligerent,
            4 => AbilityId::Redo,
            5 => AbilityId::DoubleKill,
            6 => AbilityId::QuantumKill,
            7 => AbilityId::ChainKill,
            8 => AbilityId::Necromancer,
            other => return Err(IdError::Ability(other)),
        })
    }
}

impl From<AbilityId> for u8 {
    fn from(id: AbilityId) -> Self {
        id as u8
    }
}

/// One equipped ability, optionally restricted to a single piece type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub ability: AbilityId,
    #[serde(rename = "piece_type", alias = "scopedKind", default)]
    pub scoped_kind: Option<PieceKind>,
}

/// Loadout submitted with a new game and echoed back inside snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadoutConfig {
    #[serde(rename = "element_id", alias = "elementId", default)]
    pub element: ElementId,
    #[serde(default)]
    pub items: Vec<ItemId>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
}

impl LoadoutConfig {
    pub fn has_item(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    pub fn has_ability(&self, ability: AbilityId) -> bool {
        self.abilities.iter().any(|slot| slot.ability == ability)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDef {
    pub id: ElementId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    pub slot_cost: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDef {
    pub id: AbilityId,
    pub name: String,
    #[serde(default)]
    pub scope: String,
    pub category: AbilityCategory,
    #[serde(default)]
    pub consumable: bool,
}

/// Catalogue returned by the engine's definitions endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definitions {
    #[serde(default)]
    pub elements: Vec<ElementDef>,
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub abilities: Vec<AbilityDef>,
}

impl Definitions {
    /// Catalogue built from the compiled-in identifier sets.
    pub fn builtin() -> Self {
        use strum::IntoEnumIterator;

        Self {
            elements: ElementId::iter()
                .map(|id| ElementDef {
                    id,
                    name: id.to_string(),
                })
                .collect(),
            items: ItemId::iter()
                .map(|id| ItemDef {
                    id,
                    name: id.to_string(),
                    slot_cost: id.slot_cost(),
                })
                .collect(),
            abilities: AbilityId::iter()
                .map(|id| AbilityDef {
                    id,
                    name: id.to_string(),
                    scope: "army-wide".to_string(),
                    category: id.category(),
                    consumable: id.is_consumable(),
                })
                .collect(),
        }
    }

    pub fn item_cost(&self, item: ItemId) -> u8 {
        self.items
            .iter()
            .find(|def| def.id == item)
            .map_or_else(|| item.slot_cost(), |def| def.slot_cost)
    }
}
