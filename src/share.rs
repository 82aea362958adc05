//! The shareable mood card.
//!
//! The card shows today's note (or the quote of today's mood), the number of
//! logged days and the date, over the gradient of today's mood.

use crate::constants::{
    APP_DISPLAY_NAME, DEFAULT_SHARE_GRADIENT, DEFAULT_SHARE_TEXT, SHARE_FOOTER,
};
use crate::mood;
use chrono::{Datelike, NaiveDate};

const CARD_WIDTH: u32 = 400;
const CARD_HEIGHT: u32 = 500;

/// Content of the share card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareCard {
    /// Main text.
    pub text: String,
    /// Background gradient, start then end.
    pub gradient: [&'static str; 2],
    /// Number of logged days.
    pub days_logged: usize,
    /// Date printed in the stats row.
    pub date_label: String,
}

impl ShareCard {
    /// Card for a day with nothing logged.
    pub fn default_card(days_logged: usize, date_label: String) -> Self {
        ShareCard {
            text: DEFAULT_SHARE_TEXT.to_string(),
            gradient: DEFAULT_SHARE_GRADIENT,
            days_logged,
            date_label,
        }
    }

    /// Card for today's quick-entry state.
    ///
    /// A non-empty note wins over the mood quote; an unknown mood falls back
    /// to the default text and gradient.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodflow::share::ShareCard;
    ///
    /// let card = ShareCard::for_today(Some("good"), "", 12, "2024/6/15".to_string());
    /// assert_eq!(card.text, "保持热爱，奔赴山海 🌊");
    /// assert_eq!(card.gradient, ["#34D399", "#047857"]);
    ///
    /// let card = ShareCard::for_today(Some("good"), "sunny", 12, "2024/6/15".to_string());
    /// assert_eq!(card.text, "\"sunny\"");
    /// ```
    pub fn for_today(
        mood_id: Option<&str>,
        note: &str,
        days_logged: usize,
        date_label: String,
    ) -> Self {
        let mut card = Self::default_card(days_logged, date_label);
        let mood = mood_id.and_then(mood::find);
        if let Some(mood) = mood {
            card.text = mood.quote.to_string();
            card.gradient = mood.gradient;
        }
        if !note.is_empty() {
            card.text = format!("\"{}\"", note);
        }
        card
    }

    /// Renders the card as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = CARD_WIDTH,
            h = CARD_HEIGHT
        ));
        svg.push_str(&format!(
            "  <defs><linearGradient id=\"bg\" x1=\"0\" y1=\"0\" x2=\"1\" y2=\"1\">\
<stop offset=\"0\" stop-color=\"{}\"/><stop offset=\"1\" stop-color=\"{}\"/>\
</linearGradient></defs>\n",
            self.gradient[0], self.gradient[1]
        ));
        svg.push_str(&format!(
            "  <rect width=\"{}\" height=\"{}\" rx=\"24\" fill=\"url(#bg)\"/>\n",
            CARD_WIDTH, CARD_HEIGHT
        ));
        svg.push_str(&format!(
            "  <text x=\"24\" y=\"48\" font-size=\"12\" font-weight=\"700\" letter-spacing=\"1\" fill=\"rgba(255,255,255,0.8)\">{}</text>\n",
            escape_xml(&APP_DISPLAY_NAME.to_uppercase())
        ));
        svg.push_str(&format!(
            "  <text x=\"24\" y=\"240\" font-size=\"28\" font-weight=\"700\" fill=\"#FFFFFF\">{}</text>\n",
            escape_xml(&self.text)
        ));
        svg.push_str(&format!(
            "  <text x=\"24\" y=\"380\" font-size=\"14\" fill=\"rgba(255,255,255,0.9)\">✨ 已记录 {} 天   📅 {}</text>\n",
            self.days_logged,
            escape_xml(&self.date_label)
        ));
        for i in 0..5u32 {
            let opacity = if i < 3 { "0.6" } else { "0.3" };
            svg.push_str(&format!(
                "  <circle cx=\"{}\" cy=\"410\" r=\"4\" fill=\"rgba(255,255,255,{})\"/>\n",
                28 + i * 16,
                opacity
            ));
        }
        svg.push_str(&format!(
            "  <line x1=\"24\" y1=\"440\" x2=\"{}\" y2=\"440\" stroke=\"rgba(255,255,255,0.2)\"/>\n",
            CARD_WIDTH - 24
        ));
        svg.push_str(&format!(
            "  <text x=\"24\" y=\"468\" font-size=\"10\" fill=\"rgba(255,255,255,0.6)\">{}</text>\n",
            escape_xml(SHARE_FOOTER)
        ));
        svg.push_str("</svg>\n");
        svg
    }
}

/// Date as printed on the card, e.g. `2024/6/15`.
pub fn card_date_label(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.year(), date.month(), date.day())
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_logged_uses_defaults() {
        let card = ShareCard::for_today(None, "", 0, "2024/6/15".to_string());
        assert_eq!(card.text, DEFAULT_SHARE_TEXT);
        assert_eq!(card.gradient, DEFAULT_SHARE_GRADIENT);
    }

    #[test]
    fn test_unknown_mood_uses_defaults() {
        let card = ShareCard::for_today(Some("ecstatic"), "", 1, "2024/6/15".to_string());
        assert_eq!(card.text, DEFAULT_SHARE_TEXT);
        assert_eq!(card.gradient, DEFAULT_SHARE_GRADIENT);
    }

    #[test]
    fn test_note_wins_over_quote_but_gradient_follows_mood() {
        let card = ShareCard::for_today(Some("sad"), "rainy", 4, "2024/6/15".to_string());
        assert_eq!(card.text, "\"rainy\"");
        assert_eq!(card.gradient, ["#818CF8", "#4338CA"]);
    }

    #[test]
    fn test_svg_escapes_text() {
        let card = ShareCard::for_today(None, "<b>&</b>", 1, "2024/6/15".to_string());
        let svg = card.to_svg();
        assert!(svg.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
        assert!(!svg.contains("<b>"));
        assert!(svg.contains("已记录 1 天"));
        assert!(svg.contains("MOODFLOW"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_card_date_label_is_unpadded() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        assert_eq!(card_date_label(date), "2024/6/5");
    }
}
