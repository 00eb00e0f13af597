use crate::model::FruitKind;

/// Static catalog entry for a devil fruit. Rarity is fixed per fruit; the
/// awakening level is derived from it at pool-generation time.
pub struct FruitSpec {
    pub name: &'static str,
    pub kind: FruitKind,
    pub rarity: f64,
}

/// The fixed devil fruit catalog. Worldgen instantiates at most one pool
/// entry per spec.
pub const FRUIT_CATALOG: &[FruitSpec] = &[
    // Logia - rare, feared
    FruitSpec { name: "Ember-Ember Fruit", kind: FruitKind::Logia, rarity: 0.95 },
    FruitSpec { name: "Magma-Magma Fruit", kind: FruitKind::Logia, rarity: 0.93 },
    FruitSpec { name: "Frost-Frost Fruit", kind: FruitKind::Logia, rarity: 0.90 },
    FruitSpec { name: "Bolt-Bolt Fruit", kind: FruitKind::Logia, rarity: 0.92 },
    FruitSpec { name: "Smoke-Smoke Fruit", kind: FruitKind::Logia, rarity: 0.78 },
    FruitSpec { name: "Sand-Sand Fruit", kind: FruitKind::Logia, rarity: 0.82 },
    FruitSpec { name: "Gale-Gale Fruit", kind: FruitKind::Logia, rarity: 0.85 },
    FruitSpec { name: "Marsh-Marsh Fruit", kind: FruitKind::Logia, rarity: 0.72 },
    // Zoan - martial
    FruitSpec { name: "Ox-Ox Fruit", kind: FruitKind::Zoan, rarity: 0.55 },
    FruitSpec { name: "Hawk-Hawk Fruit", kind: FruitKind::Zoan, rarity: 0.58 },
    FruitSpec { name: "Wolf-Wolf Fruit", kind: FruitKind::Zoan, rarity: 0.52 },
    FruitSpec { name: "Serpent-Serpent Fruit", kind: FruitKind::Zoan, rarity: 0.60 },
    FruitSpec { name: "Leopard-Leopard Fruit", kind: FruitKind::Zoan, rarity: 0.75 },
    FruitSpec { name: "Mammoth-Mammoth Fruit", kind: FruitKind::Zoan, rarity: 0.70 },
    FruitSpec { name: "Dragon-Dragon Fruit", kind: FruitKind::Zoan, rarity: 0.88 },
    FruitSpec { name: "Phoenix-Phoenix Fruit", kind: FruitKind::Zoan, rarity: 0.86 },
    FruitSpec { name: "Turtle-Turtle Fruit", kind: FruitKind::Zoan, rarity: 0.35 },
    FruitSpec { name: "Mole-Mole Fruit", kind: FruitKind::Zoan, rarity: 0.30 },
    // Paramecia - common, strange
    FruitSpec { name: "Gum-Gum Fruit", kind: FruitKind::Paramecia, rarity: 0.65 },
    FruitSpec { name: "Quake-Quake Fruit", kind: FruitKind::Paramecia, rarity: 0.96 },
    FruitSpec { name: "Barrier-Barrier Fruit", kind: FruitKind::Paramecia, rarity: 0.45 },
    FruitSpec { name: "Slow-Slow Fruit", kind: FruitKind::Paramecia, rarity: 0.40 },
    FruitSpec { name: "Blade-Blade Fruit", kind: FruitKind::Paramecia, rarity: 0.48 },
    FruitSpec { name: "Spring-Spring Fruit", kind: FruitKind::Paramecia, rarity: 0.32 },
    FruitSpec { name: "Echo-Echo Fruit", kind: FruitKind::Paramecia, rarity: 0.28 },
    FruitSpec { name: "Stitch-Stitch Fruit", kind: FruitKind::Paramecia, rarity: 0.25 },
    FruitSpec { name: "Gravity-Gravity Fruit", kind: FruitKind::Paramecia, rarity: 0.80 },
    FruitSpec { name: "String-String Fruit", kind: FruitKind::Paramecia, rarity: 0.77 },
    FruitSpec { name: "Mirror-Mirror Fruit", kind: FruitKind::Paramecia, rarity: 0.50 },
    FruitSpec { name: "Wax-Wax Fruit", kind: FruitKind::Paramecia, rarity: 0.33 },
    FruitSpec { name: "Berry-Berry Fruit", kind: FruitKind::Paramecia, rarity: 0.20 },
    FruitSpec { name: "Hollow-Hollow Fruit", kind: FruitKind::Paramecia, rarity: 0.42 },
    FruitSpec { name: "Magnet-Magnet Fruit", kind: FruitKind::Paramecia, rarity: 0.62 },
    FruitSpec { name: "Scale-Scale Fruit", kind: FruitKind::Paramecia, rarity: 0.38 },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_rarities_in_unit_interval() {
        for spec in FRUIT_CATALOG {
            assert!(
                spec.rarity > 0.0 && spec.rarity <= 1.0,
                "{} rarity out of range",
                spec.name
            );
        }
    }

    #[test]
    fn catalog_names_unique() {
        let names: HashSet<_> = FRUIT_CATALOG.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), FRUIT_CATALOG.len());
    }

    #[test]
    fn all_three_kinds_present() {
        for kind in [FruitKind::Paramecia, FruitKind::Zoan, FruitKind::Logia] {
            assert!(FRUIT_CATALOG.iter().any(|s| s.kind == kind));
        }
    }
}
