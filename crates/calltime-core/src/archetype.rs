use crate::types::{Archetype, ArchetypeKind, CareerStats, Highlight};

impl ArchetypeKind {
    pub const ALL: [ArchetypeKind; 5] = [
        ArchetypeKind::Specialist,
        ArchetypeKind::Generalist,
        ArchetypeKind::RisingStar,
        ArchetypeKind::Veteran,
        ArchetypeKind::Collaborator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ArchetypeKind::Specialist => "specialist",
            ArchetypeKind::Generalist => "generalist",
            ArchetypeKind::RisingStar => "rising-star",
            ArchetypeKind::Veteran => "veteran",
            ArchetypeKind::Collaborator => "collaborator",
        }
    }

    /// Badge glyph shown above the archetype title.
    pub fn badge(self) -> &'static str {
        match self {
            ArchetypeKind::Specialist => "🎯",
            ArchetypeKind::Generalist => "🧰",
            ArchetypeKind::RisingStar => "🌟",
            ArchetypeKind::Veteran => "🎖",
            ArchetypeKind::Collaborator => "🤝",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            ArchetypeKind::Specialist => "You're a Specialist",
            ArchetypeKind::Generalist => "You're a Generalist",
            ArchetypeKind::RisingStar => "You're a Rising Star",
            ArchetypeKind::Veteran => "You're a Veteran",
            ArchetypeKind::Collaborator => "You're a Collaborator",
        }
    }

    pub fn default_description(self) -> &'static str {
        match self {
            ArchetypeKind::Specialist => {
                "You've mastered your craft, working consistently in your niche with precision and expertise"
            }
            ArchetypeKind::Generalist => {
                "You moved between departments and formats, ready for whatever the call sheet asked"
            }
            ArchetypeKind::RisingStar => {
                "Your days on set climbed all year and crews kept asking for you back"
            }
            ArchetypeKind::Veteran => {
                "Long days, early calls, late wraps: you carried productions with steady experience"
            }
            ArchetypeKind::Collaborator => {
                "You built a crew around you, returning again and again to the people you trust"
            }
        }
    }
}

/// Classify a stats bundle into an archetype profile.
///
/// The backend owns the real classification; locally every user gets the
/// specialist profile with its fixed highlight set.
pub fn classify_archetype(_stats: &CareerStats) -> Archetype {
    let kind = ArchetypeKind::Specialist;
    Archetype {
        kind,
        title: kind.default_title().to_string(),
        description: kind.default_description().to_string(),
        stats: vec![
            Highlight::new("Same Department", "92%"),
            Highlight::new("Repeat Crews", 8),
            Highlight::new("Avg. Rating", "5.2★"),
        ],
    }
}
