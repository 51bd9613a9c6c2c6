// src/extractors/record.rs
use serde::ser::Serializer;
use serde::Serialize;
use super::fields::FieldId;

const VALUE_SEPARATOR: &str = ", ";

/// One or more extracted strings for a field, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Readings(Vec<String>);

impl Readings {
    /// Appends `value` unless an equal value (after trimming) is already present.
    /// Returns whether it was added.
    pub fn push_distinct(&mut self, value: String) -> bool {
        let trimmed = value.trim();
        if trimmed.is_empty() || self.0.iter().any(|v| v.trim() == trimmed) {
            return false;
        }
        self.0.push(value);
        true
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The serialized form: values joined with `", "`.
    pub fn joined(&self) -> String {
        self.values().join(VALUE_SEPARATOR)
    }
}

impl Serialize for Readings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.joined())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MiddleChinese {
    pub baxter_sagart: Option<Readings>,
    pub zhengzhang_shangfang: Option<Readings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OldChinese {
    pub zhengzhang_shangfang: Option<Readings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JapaneseReadings {
    pub goon: Option<Readings>,
    pub kanon: Option<Readings>,
    pub toon: Option<Readings>,
}

/// Phonological data for one character. Absent fields serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CharacterRecord {
    pub character: String,
    pub cangjie: Option<Readings>,
    pub mandarin: Option<Readings>,
    pub middle_chinese: MiddleChinese,
    pub old_chinese: OldChinese,
    pub japanese_readings: JapaneseReadings,
}

impl CharacterRecord {
    /// A record with every field absent.
    pub fn empty(character: &str) -> Self {
        Self {
            character: character.to_string(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: FieldId) -> Option<&Readings> {
        match field {
            FieldId::Cangjie => self.cangjie.as_ref(),
            FieldId::Mandarin => self.mandarin.as_ref(),
            FieldId::MiddleChineseBaxterSagart => self.middle_chinese.baxter_sagart.as_ref(),
            FieldId::MiddleChineseZhengzhang => self.middle_chinese.zhengzhang_shangfang.as_ref(),
            FieldId::OldChineseZhengzhang => self.old_chinese.zhengzhang_shangfang.as_ref(),
            FieldId::JapaneseGoon => self.japanese_readings.goon.as_ref(),
            FieldId::JapaneseKanon => self.japanese_readings.kanon.as_ref(),
            FieldId::JapaneseToon => self.japanese_readings.toon.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, field: FieldId) -> &mut Option<Readings> {
        match field {
            FieldId::Cangjie => &mut self.cangjie,
            FieldId::Mandarin => &mut self.mandarin,
            FieldId::MiddleChineseBaxterSagart => &mut self.middle_chinese.baxter_sagart,
            FieldId::MiddleChineseZhengzhang => &mut self.middle_chinese.zhengzhang_shangfang,
            FieldId::OldChineseZhengzhang => &mut self.old_chinese.zhengzhang_shangfang,
            FieldId::JapaneseGoon => &mut self.japanese_readings.goon,
            FieldId::JapaneseKanon => &mut self.japanese_readings.kanon,
            FieldId::JapaneseToon => &mut self.japanese_readings.toon,
        }
    }

    /// Joined value of a field, if present.
    pub fn text(&self, field: FieldId) -> Option<String> {
        self.get(field).map(Readings::joined)
    }

    /// Pretty JSON with four-space indentation; non-ASCII is written as-is.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever writes valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
