//! Market classification mirror
//!
//! Derives the opponent's market label from the pick's label.

use super::schedule::NOT_AVAILABLE;

/// Token swaps, tried in order; the first token found in a label wins
const MIRROR_TOKENS: &[(&str, &str)] = &[("Favorito", "Underdog"), ("Underdog", "Favorito")];

/// The pick's own label, with "N/A" for a missing one
pub fn pick_label(label: Option<&str>) -> String {
    match label {
        Some(l) if !l.trim().is_empty() => l.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Opponent label: swaps favourite/underdog and keeps any qualifier
/// ("Favorito Pesado" -> "Underdog Pesado"). Neutral labels pass through.
pub fn mirror(label: Option<&str>) -> String {
    let label = pick_label(label);

    for (from, to) in MIRROR_TOKENS {
        if label.contains(from) {
            return label.replace(from, to);
        }
    }
    label
}
