use std::collections::BTreeSet;

use crate::wizard::validate::{Field, FieldIssue};

/// Tracks which fields the user has interacted with so inline messages only
/// appear after a field was touched. Step gating ignores this entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TouchedFields {
    fields: BTreeSet<Field>,
}

impl TouchedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch(&mut self, field: Field) {
        self.fields.insert(field);
    }

    /// Marks every field that currently has an issue, e.g. after a rejected
    /// attempt to advance.
    pub fn touch_all(&mut self, issues: &[FieldIssue]) {
        self.fields.extend(issues.iter().map(|issue| issue.field));
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    pub fn is_invalid(&self, field: Field, condition_met: bool) -> bool {
        self.is_touched(field) && !condition_met
    }

    pub fn visible_issues<'a>(&'a self, issues: &'a [FieldIssue]) -> impl Iterator<Item = &'a FieldIssue> + 'a {
        issues.iter().filter(move |issue| self.is_touched(issue.field))
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::MembershipDraft;
    use crate::wizard::step::MembershipStep;
    use crate::wizard::validate::membership_step_issues;

    #[test]
    fn untouched_fields_show_no_messages() {
        let draft = MembershipDraft::default();
        let issues = membership_step_issues(MembershipStep::Basics, &draft);
        assert_eq!(issues.len(), 3);

        let mut touched = TouchedFields::new();
        assert_eq!(touched.visible_issues(&issues).count(), 0);

        touched.touch(Field::Name);
        let visible: Vec<_> = touched.visible_issues(&issues).collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].field, Field::Name);
    }

    #[test]
    fn invalid_requires_touch_and_unmet_condition() {
        let mut touched = TouchedFields::new();
        assert!(!touched.is_invalid(Field::Price, false));
        touched.touch(Field::Price);
        assert!(touched.is_invalid(Field::Price, false));
        assert!(!touched.is_invalid(Field::Price, true));
    }
}
