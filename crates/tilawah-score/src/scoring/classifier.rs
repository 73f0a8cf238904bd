//! Maps free-form category tags onto canonical categories and sub-types.
//!
//! Matching is driven by two ordered tables: exact aliases are consulted first, then keyword
//! containment in declared priority order. Anything that matches neither is `Other`.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::domain::{Category, Classification, SubType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Scored(Category),
    Penalty,
}

struct CategoryPattern {
    target: Target,
    aliases: &'static [&'static str],
    keywords: &'static [&'static str],
    /// Keyword hits are ignored when the tag also contains any of these.
    unless: &'static [&'static str],
}

const CATEGORY_PATTERNS: &[CategoryPattern] = &[
    CategoryPattern {
        target: Target::Scored(Category::Makhraj),
        aliases: &[
            "makhraj",
            "makharij",
            "makharijul huruf",
            "makhorijul huruf",
            "makharij al-huruf",
        ],
        keywords: &["makhraj", "makharij", "makhorij"],
        unless: &[],
    },
    CategoryPattern {
        target: Target::Scored(Category::Sifat),
        aliases: &["sifat", "shifat", "sifatul huruf", "shifatul huruf"],
        keywords: &["sifat", "shifat"],
        unless: &[],
    },
    CategoryPattern {
        target: Target::Scored(Category::Ahkam),
        aliases: &["ahkam", "ahkamul huruf", "ahkam al-huruf"],
        keywords: &["ahkam"],
        unless: &["mad"],
    },
    CategoryPattern {
        target: Target::Scored(Category::Mad),
        aliases: &["mad", "madd", "ahkamul mad", "mad wal qashr", "mad wa qashr"],
        keywords: &["mad"],
        unless: &[],
    },
    CategoryPattern {
        target: Target::Scored(Category::Gharib),
        aliases: &["gharib", "ghorib", "gharaib", "kalimat gharib"],
        keywords: &["gharib", "ghorib", "gharaib"],
        unless: &[],
    },
    CategoryPattern {
        target: Target::Scored(Category::Kelancaran),
        aliases: &["kelancaran", "lancar", "fluency"],
        keywords: &["lancar", "fluency"],
        unless: &[],
    },
    CategoryPattern {
        target: Target::Penalty,
        aliases: &["pengurangan", "pengurangan nilai", "penalty", "penalti"],
        keywords: &["pengurangan", "penalt"],
        unless: &[],
    },
];

struct SubTypePattern {
    category: Category,
    sub_type: SubType,
    keywords: &'static [&'static str],
}

const SUB_TYPE_PATTERNS: &[SubTypePattern] = &[
    SubTypePattern {
        category: Category::Ahkam,
        sub_type: SubType::Tanaffus,
        keywords: &["tanaffus"],
    },
    SubTypePattern {
        category: Category::Ahkam,
        sub_type: SubType::Izhhar,
        keywords: &["izhhar", "izhar"],
    },
    SubTypePattern {
        category: Category::Ahkam,
        sub_type: SubType::Ghunnah,
        keywords: &["gunna", "ghunna"],
    },
    SubTypePattern {
        category: Category::Mad,
        sub_type: SubType::Thabii,
        keywords: &["thabii", "thabi"],
    },
    SubTypePattern {
        category: Category::Mad,
        sub_type: SubType::Qashr,
        keywords: &["qashr"],
    },
    SubTypePattern {
        category: Category::Mad,
        sub_type: SubType::Wajib,
        keywords: &["wajib"],
    },
    SubTypePattern {
        category: Category::Mad,
        sub_type: SubType::Lazim,
        keywords: &["lazim"],
    },
];

static ALIAS_MAP: OnceLock<HashMap<&'static str, Target>> = OnceLock::new();

fn alias_map() -> &'static HashMap<&'static str, Target> {
    ALIAS_MAP.get_or_init(|| {
        let mut map = HashMap::new();
        for pattern in CATEGORY_PATTERNS {
            for alias in pattern.aliases {
                map.entry(*alias).or_insert(pattern.target);
            }
        }
        map
    })
}

/// Lowercases, trims, and collapses whitespace; zero-width characters are dropped.
pub(crate) fn normalize_tag(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Classifies one observation by its category tag, deriving a sub-type for AHKAM and MAD.
pub fn classify(raw_category: &str, item_label: &str) -> Classification {
    let tag = normalize_tag(raw_category);
    let Some(target) = match_target(&tag) else {
        return Classification::Other;
    };

    match target {
        Target::Penalty => Classification::Penalty,
        Target::Scored(category) => Classification::Scored {
            category,
            sub_type: sub_type_for(category, &tag, &normalize_tag(item_label)),
        },
    }
}

fn match_target(tag: &str) -> Option<Target> {
    if tag.is_empty() {
        return None;
    }

    if let Some(target) = alias_map().get(tag) {
        return Some(*target);
    }

    CATEGORY_PATTERNS
        .iter()
        .find(|pattern| {
            pattern.keywords.iter().any(|keyword| tag.contains(keyword))
                && !pattern.unless.iter().any(|keyword| tag.contains(keyword))
        })
        .map(|pattern| pattern.target)
}

fn sub_type_for(category: Category, tag: &str, label: &str) -> SubType {
    SUB_TYPE_PATTERNS
        .iter()
        .filter(|pattern| pattern.category == category)
        .find(|pattern| {
            pattern
                .keywords
                .iter()
                .any(|keyword| tag.contains(keyword) || label.contains(keyword))
        })
        .map_or(SubType::Default, |pattern| pattern.sub_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(category: Category, sub_type: SubType) -> Classification {
        Classification::Scored { category, sub_type }
    }

    #[test]
    fn exact_aliases_resolve_regardless_of_case_and_spacing() {
        assert_eq!(
            classify("  Makharijul   Huruf ", "\u{0628}"),
            scored(Category::Makhraj, SubType::Default)
        );
        assert_eq!(
            classify("SIFAT", "Hams"),
            scored(Category::Sifat, SubType::Default)
        );
        assert_eq!(classify("Pengurangan", "Tanaffus"), Classification::Penalty);
    }

    #[test]
    fn keyword_fallback_follows_priority_order() {
        assert_eq!(
            classify("nilai makhraj huruf", "x"),
            scored(Category::Makhraj, SubType::Default)
        );
        assert_eq!(
            classify("kalimat ghorib", "x"),
            scored(Category::Gharib, SubType::Default)
        );
        assert_eq!(
            classify("tidak lancar", "x"),
            scored(Category::Kelancaran, SubType::Default)
        );
        assert_eq!(classify("pengurangan lain", "x"), Classification::Penalty);
    }

    #[test]
    fn ahkam_yields_to_mad_when_both_match() {
        assert_eq!(
            classify("ahkam mad far'i", "Mad Wajib Muttashil"),
            scored(Category::Mad, SubType::Wajib)
        );
        assert_eq!(
            classify("ahkamul mad", "x"),
            scored(Category::Mad, SubType::Default)
        );
        assert_eq!(
            classify("ahkam nun sukun", "Izhar Halqi"),
            scored(Category::Ahkam, SubType::Izhhar)
        );
    }

    #[test]
    fn sub_types_match_category_or_label() {
        assert_eq!(
            classify("ahkam", "Tanaffus"),
            scored(Category::Ahkam, SubType::Tanaffus)
        );
        assert_eq!(
            classify("ahkam ghunnah", "Nun Tasydid"),
            scored(Category::Ahkam, SubType::Ghunnah)
        );
        assert_eq!(
            classify("mad", "Mad Thabi'i"),
            scored(Category::Mad, SubType::Thabii)
        );
        assert_eq!(
            classify("mad", "Qashr"),
            scored(Category::Mad, SubType::Qashr)
        );
        assert_eq!(
            classify("mad", "Mad Lazim Kilmi"),
            scored(Category::Mad, SubType::Lazim)
        );
        assert_eq!(
            classify("mad", "Mad Badal"),
            scored(Category::Mad, SubType::Default)
        );
    }

    #[test]
    fn sub_type_keywords_never_leak_across_categories() {
        assert_eq!(
            classify("makhraj", "Tanaffus"),
            scored(Category::Makhraj, SubType::Default)
        );
        assert_eq!(
            classify("mad", "Izhar"),
            scored(Category::Mad, SubType::Default)
        );
    }

    #[test]
    fn unknown_and_empty_tags_are_other() {
        assert_eq!(classify("", "Tanaffus"), Classification::Other);
        assert_eq!(classify("   ", "x"), Classification::Other);
        assert_eq!(classify("adab", "x"), Classification::Other);
        assert_eq!(classify("\u{feff}\u{200b}", "x"), Classification::Other);
    }
}
