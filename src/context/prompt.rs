//! Structured prompt assembly

use super::features::FeatureVisualMapper;
use crate::{
    error::Result,
    types::{PromptRecord, TextOverlay},
};

pub const LAYOUT: &str = "wide horizontal banner";
pub const STYLE: &str = "professional ecommerce product visualization";
pub const SUBLINE: &str = "Premium Feature";

/// Builds one prompt record per feature
pub struct PromptAssembler;

impl PromptAssembler {
    /// Build records for every feature in the comma-separated `features_text`
    ///
    /// All records share one composition phrase derived from `visual_context`
    /// (or from the product name when there is no visual context).
    ///
    /// # Examples
    /// ```rust
    /// use pro_image_studio::context::PromptAssembler;
    ///
    /// let records = PromptAssembler::assemble("X", "bg", "", "A, B, , C");
    /// assert_eq!(records.len(), 3);
    /// assert_eq!(records[0].composition, "hero shot of X, centered");
    /// ```
    #[must_use]
    pub fn assemble(
        product_name: &str,
        background: &str,
        visual_context: &str,
        features_text: &str,
    ) -> Vec<PromptRecord> {
        let composition = Self::composition_phrase(product_name, visual_context);
        Self::split_features(features_text)
            .into_iter()
            .map(|feature| PromptRecord {
                product: product_name.to_string(),
                layout: LAYOUT.to_string(),
                background: background.to_string(),
                composition: composition.clone(),
                visual_elements: FeatureVisualMapper::map(&feature).to_string(),
                text_overlay: TextOverlay {
                    headline: feature,
                    subline: SUBLINE.to_string(),
                },
                style: STYLE.to_string(),
            })
            .collect()
    }

    /// Trimmed, non-empty comma-separated entries in input order
    #[must_use]
    pub fn split_features(features_text: &str) -> Vec<String> {
        features_text
            .split(',')
            .map(str::trim)
            .filter(|feature| !feature.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[must_use]
    pub fn composition_phrase(product_name: &str, visual_context: &str) -> String {
        if visual_context.is_empty() {
            format!("hero shot of {}, centered", product_name)
        } else {
            format!("{}, centered hero shot", visual_context)
        }
    }

    /// Serialize records as a 2-space indented JSON array
    pub fn to_json(records: &[PromptRecord]) -> Result<String> {
        Ok(serde_json::to_string_pretty(records)?)
    }

    /// Parse records previously written by [`PromptAssembler::to_json`]
    pub fn from_json(json: &str) -> Result<Vec<PromptRecord>> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_skips_empty_entries() {
        let records = PromptAssembler::assemble("X", "bg", "", "A, B, , C");
        let headlines: Vec<&str> =
            records.iter().map(|r| r.text_overlay.headline.as_str()).collect();
        assert_eq!(headlines, vec!["A", "B", "C"]);
        assert!(records.iter().all(|r| r.composition == "hero shot of X, centered"));
        assert!(records.iter().all(|r| r.background == "bg" && r.layout == LAYOUT));
    }

    #[test]
    fn test_visual_context_composition() {
        let records =
            PromptAssembler::assemble("QCY", "bg", "a pair of white earbuds", "Bluetooth 5.3");
        assert_eq!(records[0].composition, "a pair of white earbuds, centered hero shot");
        assert_eq!(records[0].visual_elements, "wireless signal waves");
        assert_eq!(records[0].text_overlay.subline, SUBLINE);
        assert_eq!(records[0].style, STYLE);
    }

    #[test]
    fn test_no_features() {
        assert!(PromptAssembler::assemble("X", "bg", "", " , ,").is_empty());
        assert!(PromptAssembler::split_features("").is_empty());
    }

    #[test]
    fn test_json_layout() {
        let records = PromptAssembler::assemble("X", "bg", "", "Long Battery");
        let json = PromptAssembler::to_json(&records).unwrap();
        let expected = r#"[
  {
    "product": "X",
    "layout": "wide horizontal banner",
    "background": "bg",
    "composition": "hero shot of X, centered",
    "visual_elements": "glowing energy ring",
    "text_overlay": {
      "headline": "Long Battery",
      "subline": "Premium Feature"
    },
    "style": "professional ecommerce product visualization"
  }
]"#;
        assert_eq!(json, expected);
        assert_eq!(PromptAssembler::from_json(&json).unwrap(), records);
    }
}
