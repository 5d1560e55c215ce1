//! Serializes form input into the preferences block both agents read.

use tracing::warn;

use blogoutline_shared::{BlogPreferences, PreferencesBlock};

/// Marker written when the user left notes blank.
pub const NO_NOTES: &str = "None";

/// Compose the human-readable preferences block.
///
/// Nothing is validated: blank topic or audience are passed through as empty
/// text (and logged) so the agents see exactly what the user typed.
pub fn compose_block(prefs: &BlogPreferences) -> PreferencesBlock {
    if prefs.topic.trim().is_empty() {
        warn!("blog topic is blank");
    }
    if prefs.audience.trim().is_empty() {
        warn!("target audience is blank");
    }

    let notes = if prefs.notes.trim().is_empty() {
        NO_NOTES
    } else {
        prefs.notes.as_str()
    };
    let faq = if prefs.include_faq { "Yes" } else { "No" };

    PreferencesBlock(format!(
        "
**Topic & Audience:**
- Blog Topic: {topic}
- Target Audience: {audience}
- Industry/Domain: {domain}

**Style & Intent:**
- Tone: {tone}
- Point of View: {pov}
- Purpose: {intent}

**Format Preferences:**
- Word Count: {word_count}
- Include FAQ: {faq}
- Notes: {notes}
",
        topic = prefs.topic,
        audience = prefs.audience,
        domain = prefs.domain,
        tone = prefs.tone,
        pov = prefs.point_of_view,
        intent = prefs.intent,
        word_count = prefs.word_count,
    ))
}
