//! Solar Necklace resource top-up offer.
use game_core::{ItemId, PieceId, PieceKind, Side, Snapshot, Square, TopupKind};

/// One selectable top-up target. Options are enabled independently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedoTarget {
    pub uid: PieceId,
    pub kind: PieceKind,
    pub square: Square,
    pub charges: u32,
    pub capacity: u32,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopupOffer {
    pub side: Side,
    pub solar_uses: u32,
    pub solar_max: u32,
    pub necro_pool: u32,
    pub necro_max: u32,
    pub necro_enabled: bool,
    /// Own pieces that carry a redo pool at all.
    pub redo_targets: Vec<RedoTarget>,
}

impl TopupOffer {
    /// The offer for the side to move, or `None` when that side has no
    /// Solar Necklace, no uses left, or the snapshot lacks arcane data.
    pub fn for_side_to_move(snapshot: &Snapshot) -> Option<Self> {
        let side = snapshot.side_to_move;
        let loadout = snapshot.loadout(side)?;
        let resources = snapshot.arcane_state.as_ref()?;
        if !loadout.has_item(ItemId::SolarNecklace) || resources.solar_uses[side] == 0 {
            return None;
        }

        let redo_targets = snapshot
            .pieces
            .iter()
            .filter(|piece| piece.side == side && resources.redo_capacity(piece.uid) > 0)
            .map(|piece| RedoTarget {
                uid: piece.uid,
                kind: piece.kind,
                square: piece.square,
                charges: resources.redo_charge(piece.uid),
                capacity: resources.redo_capacity(piece.uid),
                enabled: resources.redo_has_headroom(piece.uid),
            })
            .collect();

        Some(Self {
            side,
            solar_uses: resources.solar_uses[side],
            solar_max: resources.solar_max,
            necro_pool: resources.necro_pool[side],
            necro_max: resources.necro_max[side],
            necro_enabled: resources.necro_has_headroom(side),
            redo_targets,
        })
    }

    /// Whether `kind` (with `target` for redo) can be submitted right now.
    pub fn allows(&self, kind: TopupKind, target: Option<PieceId>) -> bool {
        match (kind, target) {
            (TopupKind::Necro, _) => self.necro_enabled,
            (TopupKind::Redo, Some(uid)) => self
                .redo_targets
                .iter()
                .any(|t| t.uid == uid && t.enabled),
            (TopupKind::Redo, None) => false,
        }
    }

    pub fn any_enabled(&self) -> bool {
        self.necro_enabled || self.redo_targets.iter().any(|t| t.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{LoadoutConfig, ResourceState, SideMap};

    fn with_necklace(resources: ResourceState) -> Snapshot {
        let loadout = LoadoutConfig {
            items: vec![ItemId::SolarNecklace],
            ..LoadoutConfig::default()
        };
        Snapshot {
            arcane: Some(SideMap {
                white: loadout,
                black: LoadoutConfig::default(),
            }),
            arcane_state: Some(resources),
            ..Snapshot::standard()
        }
    }

    fn resources() -> ResourceState {
        let mut state = ResourceState {
            solar_uses: SideMap { white: 2, black: 0 },
            solar_max: 2,
            necro_max: SideMap { white: 2, black: 0 },
            necro_pool: SideMap { white: 2, black: 0 },
            ..ResourceState::default()
        };
        state.redo_max.insert(PieceId(9), 1);
        state.redo_charges.insert(PieceId(9), 0);
        state.redo_max.insert(PieceId(1), 1);
        state.redo_charges.insert(PieceId(1), 1);
        state
    }

    #[test]
    fn options_are_enabled_independently() {
        let offer = TopupOffer::for_side_to_move(&with_necklace(resources())).unwrap();
        assert!(!offer.necro_enabled);
        assert!(!offer.allows(TopupKind::Necro, None));
        assert!(offer.allows(TopupKind::Redo, Some(PieceId(9))));
        assert!(!offer.allows(TopupKind::Redo, Some(PieceId(1))));
        assert!(!offer.allows(TopupKind::Redo, None));
        assert_eq!(offer.redo_targets.len(), 2);
        assert!(offer.any_enabled());
    }

    #[test]
    fn necro_opens_once_pool_has_room() {
        let mut state = resources();
        state.necro_pool.white = 1;
        let offer = TopupOffer::for_side_to_move(&with_necklace(state)).unwrap();
        assert!(offer.necro_enabled);
    }

    #[test]
    fn no_offer_without_necklace_uses_or_arcane_data() {
        let mut spent = resources();
        spent.solar_uses.white = 0;
        assert!(TopupOffer::for_side_to_move(&with_necklace(spent)).is_none());

        let mut black_to_move = with_necklace(resources());
        black_to_move.side_to_move = Side::Black;
        assert!(TopupOffer::for_side_to_move(&black_to_move).is_none());

        assert!(TopupOffer::for_side_to_move(&Snapshot::standard()).is_none());
    }
}
