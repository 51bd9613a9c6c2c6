// src/extractors/fields.rs
//! Declarative description of every field the extractor fills.

use super::label::{ContainerRule, LabelMatcher, LabelTarget, MatchMode};
use super::proximity::{Strategy, ValueShape};

/// Identifies one slot of a [`CharacterRecord`](super::record::CharacterRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Cangjie,
    Mandarin,
    MiddleChineseBaxterSagart,
    MiddleChineseZhengzhang,
    OldChineseZhengzhang,
    JapaneseGoon,
    JapaneseKanon,
    JapaneseToon,
}

/// A top-level language section, matched by heading substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionQuery {
    pub heading: &'static str,
    pub level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Section(SectionQuery),
    /// The whole page, for fields that live outside any language section.
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    FirstMatch,
    AccumulateDistinct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: FieldId,
    pub scope: Scope,
    pub label: LabelMatcher,
    pub strategies: &'static [Strategy],
    pub multiplicity: Multiplicity,
}

pub const CHINESE: SectionQuery = SectionQuery { heading: "Chinese", level: 2 };
pub const JAPANESE: SectionQuery = SectionQuery { heading: "Japanese", level: 2 };

const PINYIN_MONO: ValueShape = ValueShape::Class("zhpron-monospace");
const TRAILING_TEXT: &[Strategy] = &[Strategy::TrailingText];

const fn japanese_reading(field: FieldId, variants: &'static [&'static str]) -> FieldSpec {
    FieldSpec {
        field,
        scope: Scope::Section(JAPANESE),
        label: LabelMatcher {
            variants,
            mode: MatchMode::Substring,
            target: LabelTarget::LinkText,
            container: ContainerRule::ListItem,
        },
        strategies: TRAILING_TEXT,
        multiplicity: Multiplicity::FirstMatch,
    }
}

/// Fields in assembly order.
pub static FIELD_SPECS: [FieldSpec; 8] = [
    FieldSpec {
        field: FieldId::Cangjie,
        scope: Scope::Document,
        label: LabelMatcher {
            variants: &["Appendix:Chinese Cangjie"],
            mode: MatchMode::Exact,
            target: LabelTarget::LinkTitle,
            container: ContainerRule::BlockAncestor(&["p", "div", "tr"]),
        },
        strategies: &[Strategy::InContainer(ValueShape::Class("Hani"))],
        multiplicity: Multiplicity::FirstMatch,
    },
    FieldSpec {
        field: FieldId::Mandarin,
        scope: Scope::Section(CHINESE),
        label: LabelMatcher {
            variants: &["Mandarin"],
            mode: MatchMode::Substring,
            target: LabelTarget::Text,
            container: ContainerRule::ListItem,
        },
        strategies: &[
            Strategy::InContainer(PINYIN_MONO),
            Strategy::SiblingBlock { companion: "dl", shape: PINYIN_MONO },
        ],
        multiplicity: Multiplicity::FirstMatch,
    },
    FieldSpec {
        field: FieldId::MiddleChineseBaxterSagart,
        scope: Scope::Section(CHINESE),
        label: LabelMatcher {
            variants: &["Middle Chinese"],
            mode: MatchMode::Substring,
            target: LabelTarget::Text,
            container: ContainerRule::ListItem,
        },
        strategies: &[Strategy::InContainer(PINYIN_MONO)],
        multiplicity: Multiplicity::AccumulateDistinct,
    },
    FieldSpec {
        field: FieldId::MiddleChineseZhengzhang,
        scope: Scope::Section(CHINESE),
        label: LabelMatcher {
            variants: &["Middle Chinese"],
            mode: MatchMode::Substring,
            target: LabelTarget::Text,
            container: ContainerRule::ListItem,
        },
        strategies: &[Strategy::Switcher {
            group_class: "vsSwitcher",
            row_label: "Zhengzhang",
            shape: ValueShape::AnyClass(&["IPAchar", "zhpron-monospace", "IPA"]),
        }],
        multiplicity: Multiplicity::AccumulateDistinct,
    },
    FieldSpec {
        field: FieldId::OldChineseZhengzhang,
        scope: Scope::Section(CHINESE),
        label: LabelMatcher {
            variants: &["Zhengzhang"],
            mode: MatchMode::Substring,
            target: LabelTarget::LinkTextOrTitle,
            container: ContainerRule::ListItem,
        },
        strategies: &[Strategy::Ascend {
            levels: 6,
            shapes: &[ValueShape::Class("IPAchar"), ValueShape::Lang("och-Latn-fonipa")],
            require_marker: true,
        }],
        multiplicity: Multiplicity::FirstMatch,
    },
    japanese_reading(FieldId::JapaneseGoon, &["Go-on"]),
    japanese_reading(FieldId::JapaneseKanon, &["Kan'on", "Kan-on"]),
    japanese_reading(FieldId::JapaneseToon, &["To-on", "Tō-on"]),
];

/// Regex patterns (with the highlighted part in group 1) for the annotated debug page.
pub fn debug_patterns() -> Vec<(String, &'static str)> {
    let mut patterns = vec![(r"(?s)(<h2\b[^>]*>.*?</h2>)".to_string(), "heading")];

    let mut seen: Vec<&str> = Vec::new();
    for spec in FIELD_SPECS.iter() {
        if spec.label.target == LabelTarget::LinkTitle {
            continue;
        }
        for &variant in spec.label.variants {
            if seen.contains(&variant) {
                continue;
            }
            seen.push(variant);
            patterns.push((format!(">[^<]*?({})", regex::escape(variant)), "label"));
        }
    }
    patterns
}
