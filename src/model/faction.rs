use serde::{Deserialize, Serialize};

/// The five factions every character and crew belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Pirate,
    Marine,
    BountyHunter,
    Civilian,
    Government,
}

/// How two factions relate when their crews meet on an island or at sea.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    Hostile,
    Neutral,
    Friendly,
}

impl Faction {
    pub const ALL: [Faction; 5] = [
        Faction::Pirate,
        Faction::Marine,
        Faction::BountyHunter,
        Faction::Civilian,
        Faction::Government,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Faction::Pirate => "pirate",
            Faction::Marine => "marine",
            Faction::BountyHunter => "bounty_hunter",
            Faction::Civilian => "civilian",
            Faction::Government => "government",
        }
    }

    pub fn parse(s: &str) -> Option<Faction> {
        match s {
            "pirate" => Some(Faction::Pirate),
            "marine" => Some(Faction::Marine),
            "bounty_hunter" => Some(Faction::BountyHunter),
            "civilian" => Some(Faction::Civilian),
            "government" => Some(Faction::Government),
            _ => None,
        }
    }

    /// Static stance matrix. Symmetric: `a.stance(b) == b.stance(a)`.
    ///
    /// Pirates fight everyone including rival pirate crews; marines and the
    /// world government back each other; civilians fight nobody.
    pub fn stance(self, other: Faction) -> Stance {
        use Faction::*;
        use Stance::*;
        match (self, other) {
            (Civilian, _) | (_, Civilian) => Neutral,
            (Pirate, _) | (_, Pirate) => Hostile,
            (BountyHunter, BountyHunter) => Hostile,
            (Marine, Government) | (Government, Marine) => Friendly,
            (Marine, Marine) | (Government, Government) => Friendly,
            (BountyHunter, _) | (_, BountyHunter) => Neutral,
        }
    }

    /// Whether a winning crew of faction `self` may absorb members from a
    /// defeated crew of faction `other`.
    ///
    /// Pirates take anyone willing; marines only press-gang captured pirates;
    /// bounty hunters recruit from the lawless side; the government promotes
    /// from within and from the marines. Civilians never recruit.
    pub fn can_recruit_from(self, other: Faction) -> bool {
        use Faction::*;
        match self {
            Pirate => matches!(other, Pirate | Marine | BountyHunter | Government),
            Marine => matches!(other, Pirate),
            BountyHunter => matches!(other, Pirate | BountyHunter),
            Government => matches!(other, Marine | Government),
            Civilian => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stance_is_symmetric() {
        for a in Faction::ALL {
            for b in Faction::ALL {
                assert_eq!(a.stance(b), b.stance(a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn civilians_are_never_hostile() {
        for f in Faction::ALL {
            assert_eq!(Faction::Civilian.stance(f), Stance::Neutral);
        }
    }

    #[test]
    fn pirates_hostile_to_law() {
        assert_eq!(Faction::Pirate.stance(Faction::Marine), Stance::Hostile);
        assert_eq!(Faction::Pirate.stance(Faction::Government), Stance::Hostile);
        assert_eq!(Faction::Pirate.stance(Faction::Pirate), Stance::Hostile);
    }

    #[test]
    fn recruitment_matrix() {
        assert!(Faction::Pirate.can_recruit_from(Faction::Marine));
        assert!(Faction::Pirate.can_recruit_from(Faction::Pirate));
        assert!(Faction::Marine.can_recruit_from(Faction::Pirate));
        assert!(!Faction::Marine.can_recruit_from(Faction::Government));
        assert!(!Faction::Civilian.can_recruit_from(Faction::Pirate));
        assert!(Faction::Government.can_recruit_from(Faction::Marine));
    }

    #[test]
    fn faction_str_round_trips() {
        for f in Faction::ALL {
            assert_eq!(Faction::parse(f.as_str()), Some(f));
        }
        assert_eq!(Faction::parse("yonkou"), None);
    }
}
