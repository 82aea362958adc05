//! The fixed catalog of selectable moods.
//!
//! Moods are static data: five definitions created at compile time and never
//! mutated. Entries reference a mood by its short `id`; an id that does not
//! resolve through [`find`] is a dangling reference that derived views skip.

use crate::errors::ValidationError;

/// A selectable mood and its display/export metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mood {
    /// Unique short identifier stored in log entries.
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Emoji glyph.
    pub emoji: &'static str,
    /// Marking color used on calendars and legends.
    pub color: &'static str,
    /// Soft background color used for the selected state.
    pub bg: &'static str,
    /// Quote shown on the share card.
    pub quote: &'static str,
    /// Share card gradient, start then end.
    pub gradient: [&'static str; 2],
}

/// All moods in display order.
pub const MOODS: [Mood; 5] = [
    Mood {
        id: "rad",
        label: "超棒",
        emoji: "🤩",
        color: "#FACC15",
        bg: "#FEF9C3",
        quote: "生活明朗，万物可爱 ✨",
        gradient: ["#FBBF24", "#B45309"],
    },
    Mood {
        id: "good",
        label: "开心",
        emoji: "😊",
        color: "#4ADE80",
        bg: "#DCFCE7",
        quote: "保持热爱，奔赴山海 🌊",
        gradient: ["#34D399", "#047857"],
    },
    Mood {
        id: "meh",
        label: "一般",
        emoji: "😐",
        color: "#60A5FA",
        bg: "#DBEAFE",
        quote: "平平淡淡才是真 ☕",
        gradient: ["#60A5FA", "#1D4ED8"],
    },
    Mood {
        id: "sad",
        label: "难过",
        emoji: "😔",
        color: "#818CF8",
        bg: "#E0E7FF",
        quote: "抱抱自己，明天会更好 🌙",
        gradient: ["#818CF8", "#4338CA"],
    },
    Mood {
        id: "awful",
        label: "糟糕",
        emoji: "😫",
        color: "#9CA3AF",
        bg: "#F3F4F6",
        quote: "允许自己偶尔的不完美 🍃",
        gradient: ["#9CA3AF", "#374151"],
    },
];

/// Looks up a mood by identifier.
///
/// # Examples
///
/// ```
/// use moodflow::mood;
///
/// assert_eq!(mood::find("good").map(|m| m.emoji), Some("😊"));
/// assert!(mood::find("ecstatic").is_none());
/// ```
pub fn find(id: &str) -> Option<&'static Mood> {
    MOODS.iter().find(|mood| mood.id == id)
}

/// Resolves user input to a catalog mood, rejecting unknown identifiers.
///
/// Matching is case-insensitive on the identifier.
pub fn parse(input: &str) -> Result<&'static Mood, ValidationError> {
    let needle = input.trim().to_ascii_lowercase();
    find(&needle).ok_or_else(|| ValidationError::UnknownMood(input.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: HashSet<_> = MOODS.iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), MOODS.len());
    }

    #[test]
    fn test_catalog_order() {
        let ids: Vec<_> = MOODS.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["rad", "good", "meh", "sad", "awful"]);
    }

    #[test]
    fn test_colors_are_hex() {
        for mood in &MOODS {
            for color in [mood.color, mood.bg, mood.gradient[0], mood.gradient[1]] {
                assert!(color.starts_with('#') && color.len() == 7, "{}", color);
            }
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse(" Rad ").unwrap().id, "rad");
        assert_eq!(parse("AWFUL").unwrap().id, "awful");
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            parse("ecstatic"),
            Err(ValidationError::UnknownMood("ecstatic".to_string()))
        );
    }
}
