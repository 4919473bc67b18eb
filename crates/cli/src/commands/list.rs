use super::Context;
use crate::error::CliError;
use crate::support::now_ms_i64;

pub fn run(ctx: &Context) -> Result<bool, CliError> {
    let repo = ctx.repo()?;
    let mut store = ctx.open_store()?;
    let project = ctx.project(&mut store, &repo)?;

    let branches = store.list_branches(project.id, None)?;
    if branches.is_empty() {
        ctx.output
            .info(&format!("No branches tracked for {}", project.basename));
        ctx.output.info(
            "Use 'git-hop add <branch>' to add branches or 'git-hop install' to setup automatic tracking",
        );
        return Ok(true);
    }

    let current = repo.current_branch();
    ctx.output
        .branch_list(&branches, current.as_deref(), now_ms_i64());
    Ok(true)
}
