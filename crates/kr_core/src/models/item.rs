//! Item catalog.
//!
//! Closed enumeration of everything the roulette can dispense, including
//! the multi-count bundle variants. Classification queries live here as
//! methods so the scoring and eligibility code never duplicates a match
//! over the catalog.

use serde::{Deserialize, Serialize};

/// Every dispensable catalog entry. Bundles are distinct entries that
/// collapse to a canonical [`ItemKind`] with a stack amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    /// Placeholder / "nothing of value" fallback sentinel.
    None,

    // Speed
    Boost,
    TripleBoost,
    RocketBoost,
    Invincibility,
    Grow,

    // Throwables / traps
    OilSlick,
    TripleOilSlick,
    TenOilSlick,
    FakeItem,
    Orbital,
    TripleOrbital,
    SixOrbital,
    Seeker,
    DualSeeker,
    Mine,
    LandMine,
    Bombard,
    GachaBloom,
    TripleGachaBloom,

    // Breakaway punisher (leader-seeking, singular)
    HomingDart,

    // Disruption / utility
    Shrink,
    Ghost,

    // Shields
    LightningShield,
    BubbleShield,
    FlameShield,

    // Catch-up currency
    SuperRing,
}

/// Canonical kind once bundles are collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    None,
    Boost,
    RocketBoost,
    Invincibility,
    Grow,
    OilSlick,
    FakeItem,
    Orbital,
    Seeker,
    Mine,
    LandMine,
    Bombard,
    GachaBloom,
    HomingDart,
    Shrink,
    Ghost,
    LightningShield,
    BubbleShield,
    FlameShield,
    SuperRing,
}

impl Item {
    /// Full catalog, in declaration order. Used by the free-play draw and
    /// by anything that must be total over the catalog.
    pub const ALL: [Item; 27] = [
        Item::None,
        Item::Boost,
        Item::TripleBoost,
        Item::RocketBoost,
        Item::Invincibility,
        Item::Grow,
        Item::OilSlick,
        Item::TripleOilSlick,
        Item::TenOilSlick,
        Item::FakeItem,
        Item::Orbital,
        Item::TripleOrbital,
        Item::SixOrbital,
        Item::Seeker,
        Item::DualSeeker,
        Item::Mine,
        Item::LandMine,
        Item::Bombard,
        Item::GachaBloom,
        Item::TripleGachaBloom,
        Item::HomingDart,
        Item::Shrink,
        Item::Ghost,
        Item::LightningShield,
        Item::BubbleShield,
        Item::FlameShield,
        Item::SuperRing,
    ];

    /// Canonical kind (bundles collapse).
    pub fn kind(self) -> ItemKind {
        match self {
            Item::None => ItemKind::None,
            Item::Boost | Item::TripleBoost => ItemKind::Boost,
            Item::RocketBoost => ItemKind::RocketBoost,
            Item::Invincibility => ItemKind::Invincibility,
            Item::Grow => ItemKind::Grow,
            Item::OilSlick | Item::TripleOilSlick | Item::TenOilSlick => ItemKind::OilSlick,
            Item::FakeItem => ItemKind::FakeItem,
            Item::Orbital | Item::TripleOrbital | Item::SixOrbital => ItemKind::Orbital,
            Item::Seeker | Item::DualSeeker => ItemKind::Seeker,
            Item::Mine => ItemKind::Mine,
            Item::LandMine => ItemKind::LandMine,
            Item::Bombard => ItemKind::Bombard,
            Item::GachaBloom | Item::TripleGachaBloom => ItemKind::GachaBloom,
            Item::HomingDart => ItemKind::HomingDart,
            Item::Shrink => ItemKind::Shrink,
            Item::Ghost => ItemKind::Ghost,
            Item::LightningShield => ItemKind::LightningShield,
            Item::BubbleShield => ItemKind::BubbleShield,
            Item::FlameShield => ItemKind::FlameShield,
            Item::SuperRing => ItemKind::SuperRing,
        }
    }

    /// Stack amount handed over when this entry is drawn.
    pub fn amount(self) -> u8 {
        match self {
            Item::TripleBoost | Item::TripleOilSlick | Item::TripleOrbital
            | Item::TripleGachaBloom => 3,
            Item::TenOilSlick => 10,
            Item::SixOrbital => 6,
            Item::DualSeeker => 2,
            Item::Bombard => 5,
            Item::None => 0,
            _ => 1,
        }
    }

    /// Items that make you move faster instead of interacting with
    /// another racer. Exempt from the loneliness bias.
    pub fn is_speed_item(self) -> bool {
        matches!(
            self.kind(),
            ItemKind::Boost
                | ItemKind::RocketBoost
                | ItemKind::Invincibility
                | ItemKind::Grow
        )
    }

    /// Big-swing catch-up items. Rival/bot racers take a reduced duplicate
    /// penalty on these.
    pub fn is_power_item(self) -> bool {
        matches!(
            self.kind(),
            ItemKind::RocketBoost
                | ItemKind::Invincibility
                | ItemKind::Grow
                | ItemKind::Shrink
                | ItemKind::HomingDart
        )
    }

    pub fn is_shield(self) -> bool {
        matches!(
            self.kind(),
            ItemKind::LightningShield | ItemKind::BubbleShield | ItemKind::FlameShield
        )
    }

    /// Leader-safe entries the frontrunner is allowed to draw.
    pub fn first_place_permitted(self) -> bool {
        matches!(
            self.kind(),
            ItemKind::SuperRing
                | ItemKind::OilSlick
                | ItemKind::FakeItem
                | ItemKind::Mine
                | ItemKind::LandMine
                | ItemKind::LightningShield
                | ItemKind::BubbleShield
                | ItemKind::FlameShield
        )
    }

    /// Entries only the frontrunner may draw.
    pub fn first_place_only(self) -> bool {
        self.kind() == ItemKind::LandMine
    }

    /// At most one live instance across all racers; commits register a
    /// cooldown in the tracker.
    pub fn is_singular(self) -> bool {
        matches!(
            self.kind(),
            ItemKind::HomingDart
                | ItemKind::Shrink
                | ItemKind::LightningShield
                | ItemKind::BubbleShield
                | ItemKind::FlameShield
        )
    }

    /// Laid traps, barred during the opening seconds of a race.
    pub fn is_trap(self) -> bool {
        matches!(
            self.kind(),
            ItemKind::OilSlick | ItemKind::Mine | ItemKind::LandMine | ItemKind::FakeItem
        )
    }

    /// Race-upsetting items barred once the leader nears the finish.
    pub fn is_disruptive(self) -> bool {
        matches!(
            self.kind(),
            ItemKind::HomingDart
                | ItemKind::Shrink
                | ItemKind::Ghost
                | ItemKind::Mine
                | ItemKind::FakeItem
        )
    }

    /// Best-in-class catch-up items gated behind the experience grade:
    /// a racer who has been performing well recently does not get these
    /// just because they momentarily fell behind.
    pub fn is_expert_gated(self) -> bool {
        matches!(
            self.kind(),
            ItemKind::Invincibility | ItemKind::Grow | ItemKind::HomingDart
        )
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Item::None => "Nothing",
            Item::Boost => "Boost",
            Item::TripleBoost => "Boost x3",
            Item::RocketBoost => "Rocket Boost",
            Item::Invincibility => "Invincibility",
            Item::Grow => "Grow",
            Item::OilSlick => "Oil Slick",
            Item::TripleOilSlick => "Oil Slick x3",
            Item::TenOilSlick => "Oil Slick x10",
            Item::FakeItem => "Fake Item",
            Item::Orbital => "Orbital",
            Item::TripleOrbital => "Orbital x3",
            Item::SixOrbital => "Orbital x6",
            Item::Seeker => "Seeker",
            Item::DualSeeker => "Seeker x2",
            Item::Mine => "Mine",
            Item::LandMine => "Land Mine",
            Item::Bombard => "Bombard",
            Item::GachaBloom => "Gacha Bloom",
            Item::TripleGachaBloom => "Gacha Bloom x3",
            Item::HomingDart => "Homing Dart",
            Item::Shrink => "Shrink",
            Item::Ghost => "Ghost",
            Item::LightningShield => "Lightning Shield",
            Item::BubbleShield => "Bubble Shield",
            Item::FlameShield => "Flame Shield",
            Item::SuperRing => "Super Ring",
        }
    }
}

/// Ring-box slot symbols. Not real items; a committed symbol pays out
/// rings instead of filling the item slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotSymbol {
    Cherry,
    Ring,
    TripleRing,
    Bar,
    Seven,
    Jackpot,
}

impl SlotSymbol {
    pub fn ring_payout(self) -> u16 {
        match self {
            SlotSymbol::Cherry => 2,
            SlotSymbol::Ring => 5,
            SlotSymbol::TripleRing => 10,
            SlotSymbol::Bar => 20,
            SlotSymbol::Seven => 40,
            SlotSymbol::Jackpot => 77,
        }
    }

    /// Symbol multiset for one ring-box reel, best payouts rarest.
    pub const REEL_POOL: [(SlotSymbol, u8); 6] = [
        (SlotSymbol::Cherry, 4),
        (SlotSymbol::Ring, 3),
        (SlotSymbol::TripleRing, 3),
        (SlotSymbol::Bar, 2),
        (SlotSymbol::Seven, 2),
        (SlotSymbol::Jackpot, 1),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundles_collapse_to_kind() {
        assert_eq!(Item::TripleBoost.kind(), ItemKind::Boost);
        assert_eq!(Item::TenOilSlick.kind(), ItemKind::OilSlick);
        assert_eq!(Item::SixOrbital.kind(), ItemKind::Orbital);
        assert_eq!(Item::DualSeeker.kind(), ItemKind::Seeker);
    }

    #[test]
    fn test_bundle_amounts() {
        assert_eq!(Item::Boost.amount(), 1);
        assert_eq!(Item::TripleBoost.amount(), 3);
        assert_eq!(Item::TenOilSlick.amount(), 10);
        assert_eq!(Item::Bombard.amount(), 5);
        assert_eq!(Item::None.amount(), 0);
    }

    #[test]
    fn test_classification_is_total() {
        // Every catalog entry answers every classification query.
        for item in Item::ALL {
            let _ = item.kind();
            let _ = item.amount();
            let _ = item.is_speed_item();
            let _ = item.is_power_item();
            let _ = item.is_shield();
            let _ = item.is_singular();
            let _ = item.display_name();
        }
    }

    #[test]
    fn test_singular_items_include_shields() {
        assert!(Item::LightningShield.is_singular());
        assert!(Item::BubbleShield.is_singular());
        assert!(Item::FlameShield.is_singular());
        assert!(Item::HomingDart.is_singular());
        assert!(!Item::Boost.is_singular());
    }

    #[test]
    fn test_speed_items_are_not_traps() {
        for item in Item::ALL {
            if item.is_speed_item() {
                assert!(!item.is_trap(), "{:?} cannot be both", item);
            }
        }
    }

    #[test]
    fn test_slot_payouts_increase_with_rarity() {
        let pool = SlotSymbol::REEL_POOL;
        for w in pool.windows(2) {
            assert!(w[0].0.ring_payout() <= w[1].0.ring_payout());
        }
        assert_eq!(SlotSymbol::Jackpot.ring_payout(), 77);
    }
}
