//! Ability builder and evaluator.
//!
//! Rules are kept in declaration order. A query scans them and the last rule
//! that matches decides; when nothing matches the answer is "no".

use serde_json::Value;

use crate::{Action, AuthError, AuthUser, Condition, Effect, Rule, Subject, SubjectInstance, SubjectKind};

/// One or more actions a declaration applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actions(Vec<Action>);

impl Actions {
    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.0.iter().copied()
    }
}

impl From<Action> for Actions {
    fn from(value: Action) -> Self {
        Self(vec![value])
    }
}

impl<const N: usize> From<[Action; N]> for Actions {
    fn from(value: [Action; N]) -> Self {
        Self(value.to_vec())
    }
}

impl From<&[Action]> for Actions {
    fn from(value: &[Action]) -> Self {
        Self(value.to_vec())
    }
}

/// Collects allow/deny declarations for one user.
#[derive(Debug, Clone)]
pub struct AbilityBuilder {
    user: AuthUser,
    rules: Vec<Rule>,
}

impl AbilityBuilder {
    pub fn new(user: AuthUser) -> Self {
        Self {
            user,
            rules: Vec::new(),
        }
    }

    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    pub fn allow(&mut self, actions: impl Into<Actions>, subject: SubjectKind) -> &mut Self {
        self.push(Effect::Allow, actions.into(), subject, None)
    }

    pub fn allow_when(
        &mut self,
        actions: impl Into<Actions>,
        subject: SubjectKind,
        condition: Condition,
    ) -> &mut Self {
        self.push(Effect::Allow, actions.into(), subject, Some(condition))
    }

    pub fn deny(&mut self, actions: impl Into<Actions>, subject: SubjectKind) -> &mut Self {
        self.push(Effect::Deny, actions.into(), subject, None)
    }

    pub fn deny_when(
        &mut self,
        actions: impl Into<Actions>,
        subject: SubjectKind,
        condition: Condition,
    ) -> &mut Self {
        self.push(Effect::Deny, actions.into(), subject, Some(condition))
    }

    fn push(
        &mut self,
        effect: Effect,
        actions: Actions,
        subject: SubjectKind,
        condition: Option<Condition>,
    ) -> &mut Self {
        self.rules.extend(actions.iter().map(|action| Rule {
            effect,
            action,
            subject,
            condition,
        }));
        self
    }

    pub fn build(self) -> Ability {
        Ability {
            user: self.user,
            rules: self.rules,
        }
    }
}

/// Immutable, queryable rule set for one user in one request.
#[derive(Debug, Clone)]
pub struct Ability {
    user: AuthUser,
    rules: Vec<Rule>,
}

impl Ability {
    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The rule deciding `action` on `subject`, with its position in [`Self::rules`].
    pub fn relevant_rule<'s>(
        &self,
        action: Action,
        subject: impl Into<Subject<'s>>,
    ) -> Option<(usize, &Rule)> {
        let subject = subject.into();
        // Searching backwards yields the last match of a front-to-back scan.
        self.rules
            .iter()
            .enumerate()
            .rev()
            .find(|(_, rule)| rule.matches(&self.user, action, subject))
    }

    pub fn can<'s>(&self, action: Action, subject: impl Into<Subject<'s>>) -> bool {
        let subject = subject.into();
        let granted = self
            .relevant_rule(action, subject)
            .is_some_and(|(_, rule)| rule.effect == Effect::Allow);

        tracing::debug!(
            user_id = %self.user.id,
            role = %self.user.role,
            action = %action,
            subject = %subject,
            granted,
            "permission check"
        );

        granted
    }

    pub fn cannot<'s>(&self, action: Action, subject: impl Into<Subject<'s>>) -> bool {
        !self.can(action, subject)
    }

    /// Check against an untyped, `__typename`-tagged record.
    ///
    /// Tag resolution or attribute decoding failures are returned as errors,
    /// never folded into a denial.
    pub fn can_value(&self, action: Action, value: &Value) -> Result<bool, AuthError> {
        let instance = SubjectInstance::from_value(value)?;
        Ok(self.can(action, &instance))
    }

    pub fn cannot_value(&self, action: Action, value: &Value) -> Result<bool, AuthError> {
        self.can_value(action, value).map(|granted| !granted)
    }
}

#[cfg(test)]
mod tests {
    use saas_core::{InviteId, OrganizationId, ProjectId, UserId};
    use serde_json::json;

    use super::*;
    use crate::{InviteSubject, OrganizationSubject, ProjectSubject, Role};

    fn user() -> AuthUser {
        AuthUser::new(UserId::new(), Role::Admin)
    }

    fn invite() -> SubjectInstance {
        SubjectInstance::Invite(InviteSubject { id: InviteId::new() })
    }

    #[test]
    fn empty_ability_denies_everything() {
        let ability = AbilityBuilder::new(user()).build();
        for kind in SubjectKind::ALL {
            for action in Action::ALL {
                assert!(ability.cannot(action, kind));
            }
        }
    }

    #[test]
    fn later_deny_narrows_blanket_allow() {
        let mut builder = AbilityBuilder::new(user());
        builder.allow(Action::Manage, SubjectKind::All);
        builder.deny(Action::Delete, SubjectKind::Invite);
        let ability = builder.build();

        let invite = invite();
        assert!(ability.cannot(Action::Delete, &invite));
        assert!(ability.cannot(Action::Delete, SubjectKind::Invite));
        assert!(ability.can(Action::Update, &invite));
        assert!(ability.can(Action::Delete, SubjectKind::Project));
    }

    #[test]
    fn earlier_deny_is_overridden_by_later_allow() {
        let mut builder = AbilityBuilder::new(user());
        builder.deny(Action::Delete, SubjectKind::Invite);
        builder.allow(Action::Manage, SubjectKind::All);
        let ability = builder.build();

        assert!(ability.can(Action::Delete, SubjectKind::Invite));
    }

    #[test]
    fn conditional_allow_only_applies_to_matching_records() {
        let me = user();
        let mut builder = AbilityBuilder::new(me);
        builder.allow_when(
            [Action::Update, Action::Delete],
            SubjectKind::Project,
            Condition::OwnedByUser,
        );
        let ability = builder.build();

        let organization_id = OrganizationId::new();
        let mine = SubjectInstance::Project(ProjectSubject {
            id: ProjectId::new(),
            owner_id: me.id,
            organization_id,
        });
        let theirs = SubjectInstance::Project(ProjectSubject {
            id: ProjectId::new(),
            owner_id: UserId::new(),
            organization_id,
        });

        assert!(ability.can(Action::Delete, &mine));
        assert!(ability.can(Action::Update, &mine));
        assert!(ability.cannot(Action::Delete, &theirs));
        // No record to evaluate the condition against.
        assert!(ability.cannot(Action::Delete, SubjectKind::Project));
    }

    #[test]
    fn conditional_deny_is_skipped_for_bare_kind() {
        let mut builder = AbilityBuilder::new(user());
        builder.allow(Action::Update, SubjectKind::Organization);
        builder.deny_when(Action::Update, SubjectKind::Organization, Condition::OwnedByUser);
        let ability = builder.build();

        assert!(ability.can(Action::Update, SubjectKind::Organization));

        let owned = SubjectInstance::Organization(OrganizationSubject {
            id: OrganizationId::new(),
            owner_id: ability.user().id,
        });
        assert!(ability.cannot(Action::Update, &owned));
    }

    #[test]
    fn multi_action_declarations_expand_in_order() {
        let mut builder = AbilityBuilder::new(user());
        builder.allow([Action::Get, Action::Create], SubjectKind::Project);
        let ability = builder.build();

        let actions: Vec<Action> = ability.rules().iter().map(|r| r.action).collect();
        assert_eq!(actions, vec![Action::Get, Action::Create]);
    }

    #[test]
    fn relevant_rule_reports_last_match() {
        let mut builder = AbilityBuilder::new(user());
        builder.allow(Action::Manage, SubjectKind::All);
        builder.deny(Action::Delete, SubjectKind::Invite);
        let ability = builder.build();

        let (index, rule) = ability.relevant_rule(Action::Delete, SubjectKind::Invite).unwrap();
        assert_eq!(index, 1);
        assert_eq!(rule.effect, Effect::Deny);
        assert!(ability.relevant_rule(Action::Get, SubjectKind::Billing).is_some());
    }

    #[test]
    fn untyped_record_without_tag_is_an_error() {
        let mut builder = AbilityBuilder::new(user());
        builder.allow(Action::Manage, SubjectKind::All);
        let ability = builder.build();

        let record = json!({ "id": OrganizationId::new(), "ownerId": UserId::new() });
        assert!(matches!(
            ability.can_value(Action::Get, &record),
            Err(AuthError::UnknownSubjectKind(_))
        ));

        let tagged = json!({
            "__typename": "Organization",
            "id": OrganizationId::new(),
            "ownerId": UserId::new(),
        });
        assert_eq!(ability.can_value(Action::Get, &tagged), Ok(true));
        assert_eq!(ability.cannot_value(Action::Get, &tagged), Ok(false));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn action() -> impl Strategy<Value = Action> {
            proptest::sample::select(Action::ALL.to_vec())
        }

        fn kind() -> impl Strategy<Value = SubjectKind> {
            proptest::sample::select(SubjectKind::ALL.to_vec())
        }

        fn rule() -> impl Strategy<Value = (bool, Action, SubjectKind)> {
            (any::<bool>(), action(), kind())
        }

        /// `(allow, action, kind, owner-conditioned)`
        fn conditional_rule() -> impl Strategy<Value = (bool, Action, SubjectKind, bool)> {
            (any::<bool>(), action(), kind(), any::<bool>())
        }

        /// A record of a kind picked by `selector`, owned by `me` when `owned`.
        fn record(selector: u8, owned: bool, me: UserId) -> SubjectInstance {
            let owner_id = if owned { me } else { UserId::new() };
            match selector % 3 {
                0 => SubjectInstance::Project(ProjectSubject {
                    id: ProjectId::new(),
                    owner_id,
                    organization_id: OrganizationId::new(),
                }),
                1 => SubjectInstance::Organization(OrganizationSubject {
                    id: OrganizationId::new(),
                    owner_id,
                }),
                _ => SubjectInstance::Invite(InviteSubject { id: InviteId::new() }),
            }
        }

        proptest! {
            /// Property: queries never mutate the ability.
            #[test]
            fn queries_are_idempotent(
                rules in proptest::collection::vec(rule(), 0..12),
                queried_action in action(),
                queried_kind in kind(),
            ) {
                let mut builder = AbilityBuilder::new(user());
                for (allow, action, kind) in rules {
                    if allow {
                        builder.allow(action, kind);
                    } else {
                        builder.deny(action, kind);
                    }
                }
                let ability = builder.build();

                let first = ability.can(queried_action, queried_kind);
                for _ in 0..3 {
                    prop_assert_eq!(ability.can(queried_action, queried_kind), first);
                    prop_assert_eq!(ability.cannot(queried_action, queried_kind), !first);
                }
            }

            /// Property: conditional rules evaluated against records never mutate the ability.
            #[test]
            fn record_queries_are_idempotent(
                rules in proptest::collection::vec(conditional_rule(), 0..12),
                queried_action in action(),
                selector in any::<u8>(),
                owned in any::<bool>(),
            ) {
                let me = user();
                let mut builder = AbilityBuilder::new(me);
                for (allow, action, kind, conditioned) in rules {
                    match (allow, conditioned) {
                        (true, false) => builder.allow(action, kind),
                        (true, true) => builder.allow_when(action, kind, Condition::OwnedByUser),
                        (false, false) => builder.deny(action, kind),
                        (false, true) => builder.deny_when(action, kind, Condition::OwnedByUser),
                    };
                }
                let ability = builder.build();
                let snapshot = ability.rules().to_vec();
                let target = record(selector, owned, me.id);

                let first = ability.can(queried_action, &target);
                let deciding = ability.relevant_rule(queried_action, &target).map(|(i, _)| i);
                for _ in 0..3 {
                    prop_assert_eq!(ability.can(queried_action, &target), first);
                    prop_assert_eq!(ability.cannot(queried_action, &target), !first);
                    prop_assert_eq!(
                        ability.relevant_rule(queried_action, &target).map(|(i, _)| i),
                        deciding
                    );
                    // Bare-kind queries in between must not disturb record queries.
                    let _ = ability.can(queried_action, target.kind());
                }
                prop_assert_eq!(ability.rules(), snapshot.as_slice());
            }

            /// Property: with only denies declared, nothing is ever allowed.
            #[test]
            fn deny_only_rules_never_grant(
                rules in proptest::collection::vec((action(), kind()), 0..12),
                queried_action in action(),
                queried_kind in kind(),
            ) {
                let mut builder = AbilityBuilder::new(user());
                for (action, kind) in rules {
                    builder.deny(action, kind);
                }
                prop_assert!(builder.build().cannot(queried_action, queried_kind));
            }

            /// Property: the decision equals the effect of the last matching rule.
            #[test]
            fn last_matching_rule_decides(
                rules in proptest::collection::vec(rule(), 1..12),
                queried_action in action(),
                queried_kind in kind(),
            ) {
                let mut builder = AbilityBuilder::new(user());
                let mut expected = false;
                for (allow, action, kind) in rules {
                    if action.matches(queried_action) && kind.matches(queried_kind) {
                        expected = allow;
                    }
                    if allow {
                        builder.allow(action, kind);
                    } else {
                        builder.deny(action, kind);
                    }
                }
                prop_assert_eq!(builder.build().can(queried_action, queried_kind), expected);
            }
        }
    }
}
