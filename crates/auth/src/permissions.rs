//! Role permission definitions.
//!
//! Each role has exactly one rule-building function. Declaration order inside
//! a function is load-bearing: a later rule overrides an earlier one.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Serialize;

use crate::{Ability, AbilityBuilder, Action, AuthError, AuthUser, Condition, Role, Rule, SubjectKind};

/// Declares the rules of one role into a builder.
pub type DefinePermissions = fn(&AuthUser, &mut AbilityBuilder);

/// Rule-building function for `role`.
///
/// Exhaustive: adding a role without a definition does not compile.
pub fn definition_for(role: Role) -> DefinePermissions {
    match role {
        Role::Admin => admin,
        Role::Member => member,
        Role::Billing => billing,
    }
}

fn admin(user: &AuthUser, builder: &mut AbilityBuilder) {
    builder.allow(Action::Manage, SubjectKind::All);
    builder.deny([Action::Update, Action::TransferOwnership], SubjectKind::Organization);
    ownership_override(user, builder);
}

fn member(user: &AuthUser, builder: &mut AbilityBuilder) {
    builder.allow([Action::Get, Action::Create], SubjectKind::Project);
    builder.allow_when(
        [Action::Update, Action::Delete],
        SubjectKind::Project,
        Condition::OwnedByUser,
    );
    builder.allow(Action::Get, SubjectKind::User);
    builder.allow(Action::Get, SubjectKind::Invite);
    builder.deny(Action::Delete, SubjectKind::Organization);
    builder.deny(Action::Delete, SubjectKind::Invite);
    ownership_override(user, builder);
}

fn billing(_user: &AuthUser, builder: &mut AbilityBuilder) {
    builder.allow(Action::Get, SubjectKind::Billing);
}

/// Owners may update, delete and hand over what they own, whatever the role says.
///
/// Must run after the role's own declarations so it wins over their denies.
fn ownership_override(_user: &AuthUser, builder: &mut AbilityBuilder) {
    for kind in [SubjectKind::Organization, SubjectKind::Project] {
        builder.allow_when(
            [Action::Update, Action::Delete, Action::TransferOwnership],
            kind,
            Condition::OwnedByUser,
        );
    }
}

/// A role with its declared rules (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub role: Role,
    pub description: &'static str,
    pub rules: Vec<Rule>,
}

/// Role → rule-building function table.
#[derive(Debug, Clone)]
pub struct PermissionTable {
    definitions: BTreeMap<Role, DefinePermissions>,
}

static STANDARD: LazyLock<PermissionTable> = LazyLock::new(PermissionTable::standard);

impl PermissionTable {
    /// A table with no roles defined.
    pub fn empty() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }

    /// The built-in table: every role mapped to its definition.
    pub fn standard() -> Self {
        Role::ALL
            .into_iter()
            .fold(Self::empty(), |table, role| table.with_definition(role, definition_for(role)))
    }

    pub fn with_definition(mut self, role: Role, define: DefinePermissions) -> Self {
        self.definitions.insert(role, define);
        self
    }

    pub fn without(mut self, role: Role) -> Self {
        self.definitions.remove(&role);
        self
    }

    /// Fail on the first role that has no definition.
    ///
    /// Run at startup so a broken table is caught before any request.
    pub fn validate(&self) -> Result<(), AuthError> {
        match Role::ALL.into_iter().find(|role| !self.definitions.contains_key(role)) {
            Some(role) => Err(AuthError::MissingRolePermissions(role)),
            None => Ok(()),
        }
    }

    /// Build the ability of `user` under its resolved role.
    pub fn define_ability_for(&self, user: &AuthUser) -> Result<Ability, AuthError> {
        let define = self.definitions.get(&user.role).ok_or_else(|| {
            tracing::error!(role = %user.role, "no permission definitions for role");
            AuthError::MissingRolePermissions(user.role)
        })?;

        let mut builder = AbilityBuilder::new(*user);
        define(user, &mut builder);
        Ok(builder.build())
    }

    /// Every defined role with the rules it declares for `user`.
    pub fn describe(&self, user_id: saas_core::UserId) -> Vec<RoleDefinition> {
        self.definitions
            .iter()
            .map(|(role, define)| {
                let user = AuthUser::new(user_id, *role);
                let mut builder = AbilityBuilder::new(user);
                define(&user, &mut builder);
                RoleDefinition {
                    role: *role,
                    description: role.description(),
                    rules: builder.build().rules().to_vec(),
                }
            })
            .collect()
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Build the ability of `user` from the standard permission table.
pub fn define_ability_for(user: &AuthUser) -> Result<Ability, AuthError> {
    STANDARD.define_ability_for(user)
}
