// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

use saas_core::UserId;
use serde::Serialize;

use crate::{Ability, Action, Effect, Role, Rule, Subject};

/// Detailed explanation of an authorization decision.
///
/// Answers "why was this allowed/denied?" for logs and admin tooling.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub user_id: UserId,
    pub role: Role,
    pub action: Action,
    pub subject: String,
    pub granted: bool,
    pub reason: String,
    /// The deciding rule and its position in declaration order.
    pub matched_rule: Option<MatchedRule>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchedRule {
    pub index: usize,
    pub rule: Rule,
}

impl Ability {
    /// Explain why `action` on `subject` is (or would be) allowed or denied.
    pub fn explain<'s>(&self, action: Action, subject: impl Into<Subject<'s>>) -> AuthorizationExplanation {
        let subject = subject.into();
        let user = self.user();
        let matched = self.relevant_rule(action, subject);

        let (granted, reason) = match matched {
            Some((index, rule)) if rule.effect == Effect::Allow => {
                (true, format!("allowed by rule #{index} ({rule})"))
            }
            Some((index, rule)) => (false, format!("denied by rule #{index} ({rule})")),
            None => (
                false,
                format!("no rule of role {} covers {action} on {subject}", user.role),
            ),
        };

        AuthorizationExplanation {
            user_id: user.id,
            role: user.role,
            action,
            subject: subject.to_string(),
            granted,
            reason,
            matched_rule: matched.map(|(index, rule)| MatchedRule { index, rule: *rule }),
        }
    }
}

#[cfg(test)]
mod tests {
    use saas_core::{OrganizationId, ProjectId};

    use super::*;
    use crate::{AuthUser, ProjectSubject, SubjectInstance, SubjectKind, define_ability_for};

    #[test]
    fn explains_grant_with_the_deciding_rule() {
        let ability = define_ability_for(&AuthUser::new(UserId::new(), Role::Member)).unwrap();
        let mine = SubjectInstance::Project(ProjectSubject {
            id: ProjectId::new(),
            owner_id: ability.user().id,
            organization_id: OrganizationId::new(),
        });

        let explanation = ability.explain(Action::Delete, &mine);
        assert!(explanation.granted);
        assert_eq!(explanation.subject, "Project instance");
        let matched = explanation.matched_rule.unwrap();
        assert_eq!(matched.rule.condition, Some(crate::Condition::OwnedByUser));
        assert!(explanation.reason.starts_with("allowed by rule"));
    }

    #[test]
    fn explains_default_denial() {
        let ability = define_ability_for(&AuthUser::new(UserId::new(), Role::Billing)).unwrap();
        let explanation = ability.explain(Action::Get, SubjectKind::Project);

        assert!(!explanation.granted);
        assert!(explanation.matched_rule.is_none());
        assert_eq!(explanation.reason, "no rule of role BILLING covers get on Project");
    }

    #[test]
    fn explains_explicit_denial() {
        let ability = define_ability_for(&AuthUser::new(UserId::new(), Role::Member)).unwrap();
        let explanation = ability.explain(Action::Delete, SubjectKind::Invite);

        assert!(!explanation.granted);
        assert_eq!(explanation.matched_rule.as_ref().map(|m| m.rule.effect), Some(Effect::Deny));

        let json = serde_json::to_value(&explanation).unwrap();
        assert_eq!(json["role"], "MEMBER");
        assert_eq!(json["action"], "delete");
        assert_eq!(json["granted"], false);
    }
}
