//! Background style suggestions from product context

use crate::types::StyleOptionSet;
use tracing::debug;

/// One classification rule: any keyword hit selects `styles`
#[derive(Debug, Clone, Copy)]
pub struct StyleRule {
    pub category: &'static str,
    pub keywords: &'static [&'static str],
    pub styles: &'static [(&'static str, &'static str)],
}

impl StyleRule {
    /// Substring match against already lower-cased text
    #[must_use]
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }

    #[must_use]
    pub fn style_set(&self) -> StyleOptionSet {
        StyleOptionSet::from_pairs(self.category, self.styles)
    }
}

pub const TECH_RULE: StyleRule = StyleRule {
    category: "tech",
    keywords: &["earbud", "headphone", "audio", "watch", "phone", "laptop", "tech", "anc"],
    styles: &[
        ("Premium Studio", "soft off-white premium studio background with gentle shadows"),
        ("High-Tech Dark", "sleek dark background with subtle blue tech glow lines"),
        ("Lifestyle", "soft blurred modern living room interior background"),
    ],
};

pub const BEAUTY_RULE: StyleRule = StyleRule {
    category: "beauty",
    keywords: &["cream", "oil", "skin", "beauty", "serum", "bottle"],
    styles: &[
        ("Minimalist Water", "clean white background with soft water ripples"),
        ("Natural Organic", "soft beige background with botanical leaf shadows"),
        ("Luxury Gold", "premium silk texture background with warm lighting"),
    ],
};

pub const FASHION_RULE: StyleRule = StyleRule {
    category: "fashion",
    keywords: &["shoe", "sneaker", "wear", "cloth", "bag"],
    styles: &[
        ("Urban Concrete", "concrete texture background with dramatic lighting"),
        ("Studio Clean", "infinite grey background with sharp shadows"),
        ("Vibrant Pop", "vibrant pastel colored background"),
    ],
};

/// Used when no rule matches
pub const DEFAULT_CATEGORY: &str = "default";

pub const DEFAULT_STYLES: &[(&str, &str)] = &[
    ("Clean Studio", "neutral soft studio background"),
    ("Gradient Modern", "soft cool-grey gradient background"),
    ("Warm Indoor", "warm ambient indoor lighting background"),
];

/// Evaluated top-down; the first matching rule wins
pub const STYLE_RULES: &[StyleRule] = &[TECH_RULE, BEAUTY_RULE, FASHION_RULE];

/// Rule-based background style classifier
pub struct ContextClassifier;

impl ContextClassifier {
    /// Pick the style set for a product
    ///
    /// `query_text` and `visual_text` are joined with a space and lower-cased
    /// before matching. Always yields three options.
    ///
    /// # Examples
    /// ```rust
    /// use pro_image_studio::context::ContextClassifier;
    ///
    /// let styles = ContextClassifier::classify("wireless earbuds", "");
    /// assert_eq!(styles.labels(), vec!["Premium Studio", "High-Tech Dark", "Lifestyle"]);
    /// ```
    #[must_use]
    pub fn classify(query_text: &str, visual_text: &str) -> StyleOptionSet {
        let lowered = format!("{} {}", query_text, visual_text).to_lowercase();
        let styles = match Self::matching_rule(&lowered) {
            Some(rule) => rule.style_set(),
            None => StyleOptionSet::from_pairs(DEFAULT_CATEGORY, DEFAULT_STYLES),
        };
        debug!(category = styles.category(), "Classified product context");
        styles
    }

    /// First rule matching already lower-cased text
    #[must_use]
    pub fn matching_rule(lowered: &str) -> Option<&'static StyleRule> {
        STYLE_RULES.iter().find(|rule| rule.matches(lowered))
    }
}
