use serde::Serialize;

/// Skin id that every profile owns unconditionally.
pub const DEFAULT_SKIN_ID: &str = "default";

/// A purchasable character skin.
///
/// The catalog is fixed game data; ownership and selection live in the
/// player profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Skin {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    /// Coin price; the default skin is free.
    pub cost: u32,
}

/// Full skin catalog, in shop display order (not strictly sorted by cost:
/// the astronaut lists before the cheaper pirate).
pub const SKINS: [Skin; 8] = [
    Skin { id: "default", name: "Default", emoji: "🧑", cost: 0 },
    Skin { id: "ninja", name: "Ninja", emoji: "🥷", cost: 50 },
    Skin { id: "robot", name: "Robot", emoji: "🤖", cost: 100 },
    Skin { id: "alien", name: "Alien", emoji: "👽", cost: 150 },
    Skin { id: "wizard", name: "Wizard", emoji: "🧙", cost: 200 },
    Skin { id: "astronaut", name: "Astronaut", emoji: "🧑‍🚀", cost: 300 },
    Skin { id: "pirate", name: "Pirate", emoji: "🏴‍☠️", cost: 250 },
    Skin { id: "superhero", name: "Superhero", emoji: "🦸", cost: 400 },
];

/// Look up a skin by id.
pub fn find_skin(id: &str) -> Option<&'static Skin> {
    SKINS.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_unique() {
        for (i, skin) in SKINS.iter().enumerate() {
            assert!(
                SKINS.iter().skip(i + 1).all(|other| other.id != skin.id),
                "duplicate skin id {}",
                skin.id
            );
        }
    }

    #[test]
    fn test_default_skin_is_free() {
        let default = find_skin(DEFAULT_SKIN_ID).unwrap();
        assert_eq!(default.cost, 0);
    }

    #[test]
    fn test_find_skin() {
        assert_eq!(find_skin("ninja").unwrap().cost, 50);
        assert_eq!(find_skin("superhero").unwrap().cost, 400);
        assert!(find_skin("dragon").is_none());
    }
}
