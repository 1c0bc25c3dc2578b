//! The seven classical planets and their rotation through the planetary hours.
//!
//! The catalog is a single fixed table in Chaldean order (Saturn, Sun, Venus, Jupiter,
//! Mercury, Mars, Moon). Rulership rotates through this table one step per planetary
//! hour, wrapping every seven steps, so every lookup is plain index arithmetic
//! modulo [`PLANET_COUNT`].

use std::fmt;

use chrono::Weekday;
use serde::Serialize;

use crate::constants::PLANET_COUNT;

/// Classical element associated with a planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Air => "Air",
            Element::Water => "Water",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the seven classical planets.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Planet {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    /// Display color as a hex triplet
    pub color: &'static str,
    pub description: &'static str,
    pub element: Element,
    pub qualities: &'static [&'static str],
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol, self.name)
    }
}

/// The rotation table, in the order planetary-hour rulership follows.
pub static CHALDEAN_ORDER: [Planet; PLANET_COUNT] = [
    Planet {
        id: "saturn",
        name: "Saturn",
        symbol: "♄",
        color: "#4A5568",
        description: "Discipline, structure, limitations, and wisdom",
        element: Element::Earth,
        qualities: &["discipline", "restriction", "patience", "wisdom", "melancholy"],
    },
    Planet {
        id: "sun",
        name: "Sun",
        symbol: "☉",
        color: "#F6AD55",
        description: "Leadership, vitality, ego, and success",
        element: Element::Fire,
        qualities: &["leadership", "vitality", "success", "authority", "creativity"],
    },
    Planet {
        id: "venus",
        name: "Venus",
        symbol: "♀",
        color: "#48BB78",
        description: "Love, beauty, harmony, and pleasure",
        element: Element::Earth,
        qualities: &["love", "beauty", "harmony", "pleasure", "relationships"],
    },
    Planet {
        id: "jupiter",
        name: "Jupiter",
        symbol: "♃",
        color: "#3182CE",
        description: "Expansion, growth, luck, and abundance",
        element: Element::Fire,
        qualities: &["expansion", "luck", "wisdom", "abundance", "optimism"],
    },
    Planet {
        id: "mercury",
        name: "Mercury",
        symbol: "☿",
        color: "#9F7AEA",
        description: "Communication, intellect, and travel",
        element: Element::Air,
        qualities: &["communication", "intellect", "travel", "commerce", "versatility"],
    },
    Planet {
        id: "mars",
        name: "Mars",
        symbol: "♂",
        color: "#E53E3E",
        description: "Action, energy, conflict, and courage",
        element: Element::Fire,
        qualities: &["action", "courage", "conflict", "energy", "passion"],
    },
    Planet {
        id: "moon",
        name: "Moon",
        symbol: "☽",
        color: "#63B3ED",
        description: "Emotions, intuition, and cycles",
        element: Element::Water,
        qualities: &["emotion", "intuition", "cycles", "reflection", "subconscious"],
    },
];

// Indices into CHALDEAN_ORDER
const SATURN: usize = 0;
const SUN: usize = 1;
const VENUS: usize = 2;
const JUPITER: usize = 3;
const MERCURY: usize = 4;
const MARS: usize = 5;
const MOON: usize = 6;

/// Planet at a rotation index; indices past the catalog wrap around.
pub fn planet_by_index(index: usize) -> &'static Planet {
    &CHALDEAN_ORDER[index % PLANET_COUNT]
}

/// Look up a planet by its id (`"mercury"`), ignoring case.
pub fn planet_by_id(id: &str) -> Option<&'static Planet> {
    CHALDEAN_ORDER
        .iter()
        .find(|planet| planet.id.eq_ignore_ascii_case(id.trim()))
}

/// Rotation index of the planet ruling a weekday (and its first hour).
pub fn day_ruler_index(weekday: Weekday) -> usize {
    match weekday {
        Weekday::Sun => SUN,
        Weekday::Mon => MOON,
        Weekday::Tue => MARS,
        Weekday::Wed => MERCURY,
        Weekday::Thu => JUPITER,
        Weekday::Fri => VENUS,
        Weekday::Sat => SATURN,
    }
}

/// The planet ruling a weekday.
pub fn day_ruler(weekday: Weekday) -> &'static Planet {
    planet_by_index(day_ruler_index(weekday))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chaldean_order() {
        let ids: Vec<&str> = CHALDEAN_ORDER.iter().map(|p| p.id).collect();
        assert_eq!(
            ids,
            vec!["saturn", "sun", "venus", "jupiter", "mercury", "mars", "moon"]
        );
    }

    #[test]
    fn test_day_rulers_are_namesakes() {
        assert_eq!(day_ruler(Weekday::Sun).id, "sun");
        assert_eq!(day_ruler(Weekday::Mon).id, "moon");
        assert_eq!(day_ruler(Weekday::Tue).id, "mars");
        assert_eq!(day_ruler(Weekday::Wed).id, "mercury");
        assert_eq!(day_ruler(Weekday::Thu).id, "jupiter");
        assert_eq!(day_ruler(Weekday::Fri).id, "venus");
        assert_eq!(day_ruler(Weekday::Sat).id, "saturn");
    }

    #[test]
    fn test_planet_by_index_wraps() {
        assert_eq!(planet_by_index(0).id, "saturn");
        assert_eq!(planet_by_index(6).id, "moon");
        assert_eq!(planet_by_index(7).id, "saturn");
        assert_eq!(planet_by_index(11).id, "mercury");
        assert_eq!(planet_by_index(MERCURY + 23).id, planet_by_index(MERCURY + 2).id);
    }

    #[test]
    fn test_planet_by_id() {
        assert_eq!(planet_by_id("venus").map(|p| p.name), Some("Venus"));
        assert_eq!(planet_by_id("MARS").map(|p| p.name), Some("Mars"));
        assert!(planet_by_id("pluto").is_none());
    }

    #[test]
    fn test_catalog_entries_are_complete() {
        for planet in CHALDEAN_ORDER.iter() {
            assert!(!planet.symbol.is_empty());
            assert!(planet.color.starts_with('#') && planet.color.len() == 7);
            assert_eq!(planet.qualities.len(), 5, "{}", planet.name);
        }
        assert_eq!(planet_by_id("mercury").map(|p| p.element), Some(Element::Air));
        assert_eq!(planet_by_id("moon").map(|p| p.element), Some(Element::Water));
    }
}
