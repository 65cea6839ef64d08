/// A dhikr with a recitation target. The builtin set is the classical
/// post-salah tasbih.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DhikrPreset {
    pub slug: &'static str,
    pub name: &'static str,
    pub arabic: &'static str,
    pub target: i32,
}

pub const DHIKR_PRESETS: [DhikrPreset; 4] = [
    DhikrPreset {
        slug: "subhanallah",
        name: "SubhanAllah",
        arabic: "سُبْحَانَ اللّٰهِ",
        target: 33,
    },
    DhikrPreset {
        slug: "alhamdulillah",
        name: "Alhamdulillah",
        arabic: "اَلْحَمْدُ لِلّٰهِ",
        target: 33,
    },
    DhikrPreset {
        slug: "allahu-akbar",
        name: "Allahu Akbar",
        arabic: "اللّٰهُ أَكْبَرُ",
        target: 34,
    },
    DhikrPreset {
        slug: "la-ilaha-illallah",
        name: "La ilaha illallah",
        arabic: "لَا إِلٰهَ إِلَّا اللّٰهُ",
        target: 100,
    },
];

/// Case-insensitive lookup by slug or display name.
pub fn find_preset(name: &str) -> Option<&'static DhikrPreset> {
    let lower = name.to_lowercase();
    DHIKR_PRESETS
        .iter()
        .find(|p| p.slug == lower || p.name.to_lowercase() == lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_lookup_accepts_slug_and_name() {
        assert_eq!(find_preset("subhanallah").unwrap().target, 33);
        assert_eq!(find_preset("Allahu Akbar").unwrap().target, 34);
        assert!(find_preset("nope").is_none());
    }

    #[test]
    fn every_preset_has_a_positive_target() {
        for preset in &DHIKR_PRESETS {
            assert!(preset.target > 0, "{} has no target", preset.slug);
            assert!(!preset.arabic.is_empty());
        }
    }
}
