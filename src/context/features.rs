//! Feature phrase to visual motif mapping

/// Motif used when no rule matches
pub const DEFAULT_MOTIF: &str = "minimal elegant product focus";

/// `(keywords, motif)` pairs, evaluated top-down; first hit wins
pub const MOTIF_RULES: &[(&[&str], &str)] = &[
    (&["anc", "noise"], "soft sound wave ripples"),
    (&["water", "proof"], "fresh water splash or droplets"),
    (&["battery", "power"], "glowing energy ring"),
    (&["bluetooth", "wireless"], "wireless signal waves"),
];

pub struct FeatureVisualMapper;

impl FeatureVisualMapper {
    /// Visual motif for one feature phrase (case-insensitive substring rules)
    ///
    /// # Examples
    /// ```rust
    /// use pro_image_studio::context::FeatureVisualMapper;
    ///
    /// assert_eq!(FeatureVisualMapper::map("Bluetooth 5.3"), "wireless signal waves");
    /// ```
    #[must_use]
    pub fn map(feature_text: &str) -> &'static str {
        let lowered = feature_text.to_lowercase();
        MOTIF_RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|keyword| lowered.contains(keyword)))
            .map_or(DEFAULT_MOTIF, |(_, motif)| *motif)
    }
}
