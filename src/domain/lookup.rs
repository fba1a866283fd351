//! Reference tables that turn program, staff, tag, and class ids into
//! display names. Unknown ids fall back to the raw id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Read-only `id -> display name` table.
pub trait Lookup: Send + Sync {
    fn display_name(&self, id: &str) -> Option<&str>;

    /// All known `(id, name)` pairs, ordered by id.
    fn entries(&self) -> Vec<(&str, &str)>;

    /// Display name for `id`, or `id` itself when the table does not know it.
    fn resolve(&self, id: &str) -> String {
        self.display_name(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticLookup {
    names: BTreeMap<String, String>,
}

impl StaticLookup {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(id, name)| (id.into(), name.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Lookup for StaticLookup {
    fn display_name(&self, id: &str) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    fn entries(&self) -> Vec<(&str, &str)> {
        self.names
            .iter()
            .map(|(id, name)| (id.as_str(), name.as_str()))
            .collect()
    }
}

/// Serializable form of the reference tables (`reference.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
    pub programs: StaticLookup,
    pub staff: StaticLookup,
    pub tags: StaticLookup,
    pub classes: StaticLookup,
}

impl ReferenceData {
    /// Sample tables used when no `reference.json` exists.
    pub fn demo() -> Self {
        Self {
            programs: StaticLookup::from_pairs([
                ("bjj-adult", "Adult Brazilian Jiu-Jitsu"),
                ("bjj-kids", "Kids Brazilian Jiu-Jitsu"),
                ("muay-thai", "Muay Thai"),
                ("judo", "Judo"),
            ]),
            staff: StaticLookup::from_pairs([
                ("staff-1", "Coach Ana Rivera"),
                ("staff-2", "Coach Malik Osei"),
                ("staff-3", "Coach Hana Sato"),
            ]),
            tags: StaticLookup::from_pairs([
                ("tag-beginner", "Beginner friendly"),
                ("tag-gi", "Gi"),
                ("tag-nogi", "No-Gi"),
                ("tag-competition", "Competition"),
            ]),
            classes: StaticLookup::from_pairs([
                ("class-fundamentals", "Fundamentals"),
                ("class-advanced", "Advanced"),
                ("class-open-mat", "Open Mat"),
                ("class-striking", "Striking"),
            ]),
        }
    }
}

/// Lookup collaborators handed to the wizards and commit handler.
pub struct ReferenceTables {
    pub programs: Box<dyn Lookup>,
    pub staff: Box<dyn Lookup>,
    pub tags: Box<dyn Lookup>,
    pub classes: Box<dyn Lookup>,
}

impl ReferenceTables {
    pub fn new(
        programs: Box<dyn Lookup>,
        staff: Box<dyn Lookup>,
        tags: Box<dyn Lookup>,
        classes: Box<dyn Lookup>,
    ) -> Self {
        Self {
            programs,
            staff,
            tags,
            classes,
        }
    }
}

impl From<ReferenceData> for ReferenceTables {
    fn from(data: ReferenceData) -> Self {
        Self::new(
            Box::new(data.programs),
            Box::new(data.staff),
            Box::new(data.tags),
            Box::new(data.classes),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_falls_back_to_raw_value() {
        let staff = StaticLookup::from_pairs([("staff-1", "Coach Ana Rivera")]);
        assert_eq!(staff.resolve("staff-1"), "Coach Ana Rivera");
        assert_eq!(staff.resolve("staff-99"), "staff-99");
    }

    #[test]
    fn entries_are_ordered_by_id() {
        let tags = StaticLookup::from_pairs([("b", "Beta"), ("a", "Alpha")]);
        assert_eq!(tags.entries(), vec![("a", "Alpha"), ("b", "Beta")]);
    }

    #[test]
    fn reference_data_parses_partial_json() {
        let data: ReferenceData =
            serde_json::from_str(r#"{"staff": {"s-1": "Coach Lee"}}"#).unwrap();
        let tables = ReferenceTables::from(data);
        assert_eq!(tables.staff.resolve("s-1"), "Coach Lee");
        assert_eq!(tables.programs.resolve("judo"), "judo");
    }
}
