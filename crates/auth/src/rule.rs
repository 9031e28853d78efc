use serde::Serialize;

use crate::{Action, AuthUser, Subject, SubjectInstance, SubjectKind};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Allow,
    Deny,
}

/// Predicate over `(acting user, subject record)` narrowing when a rule applies.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// The record's `owner_id` is the acting user. Kinds without an owner never satisfy it.
    OwnedByUser,
}

impl Condition {
    pub fn evaluate(&self, user: &AuthUser, instance: &SubjectInstance) -> bool {
        match self {
            Condition::OwnedByUser => instance.owner_id() == Some(user.id),
        }
    }
}

/// One declared grant or denial.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    pub effect: Effect,
    pub action: Action,
    pub subject: SubjectKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Rule {
    /// Whether this rule applies to `action` on `subject` for `user`.
    ///
    /// A conditional rule needs a record to evaluate against, so it never
    /// matches a query made with a bare kind.
    pub fn matches(&self, user: &AuthUser, action: Action, subject: Subject<'_>) -> bool {
        if !self.action.matches(action) || !self.subject.matches(subject.kind()) {
            return false;
        }

        match (self.condition, subject.instance()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(condition), Some(instance)) => condition.evaluate(user, instance),
        }
    }
}

impl core::fmt::Display for Rule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let verb = match self.effect {
            Effect::Allow => "allow",
            Effect::Deny => "deny",
        };
        write!(f, "{verb} {} on {}", self.action, self.subject)?;
        if let Some(condition) = self.condition {
            write!(f, " when {condition:?}")?;
        }
        Ok(())
    }
}
