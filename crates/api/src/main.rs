use anyhow::{Context, bail};

use saas_auth::{Action, AuthUser, PermissionTable, Role, SubjectKind};
use saas_core::UserId;

const USAGE: &str = "usage: saas-permissions [check <ROLE> <ACTION> <KIND>]";

/// Validate the permission table and print it, or explain one decision.
///
/// Exits non-zero when a role has no definition, so a broken table fails the
/// deploy instead of the first request.
fn main() -> anyhow::Result<()> {
    saas_observability::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let output = run(&PermissionTable::standard(), &args)?;
    println!("{output}");
    Ok(())
}

fn run(table: &PermissionTable, args: &[String]) -> anyhow::Result<String> {
    table.validate().context("permission table is incomplete")?;

    match args {
        [] => {
            let described = table.describe(UserId::new());
            tracing::info!(roles = described.len(), "permission table validated");
            serde_json::to_string_pretty(&described).context("failed to serialize permission table")
        }
        [command, role, action, kind] if command == "check" => {
            let role: Role = role.parse()?;
            let action: Action = action.parse()?;
            let kind: SubjectKind = kind.parse()?;

            let ability = table.define_ability_for(&AuthUser::new(UserId::new(), role))?;
            let explanation = ability.explain(action, kind);
            serde_json::to_string_pretty(&explanation).context("failed to serialize explanation")
        }
        _ => bail!(USAGE),
    }
}
