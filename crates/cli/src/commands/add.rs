use super::Context;
use crate::error::CliError;
use crate::support::now_ms_i64;
use crate::util::with_busy_retry;

pub fn run(ctx: &Context, branch: &str, verify: bool) -> Result<bool, CliError> {
    let repo = ctx.repo()?;

    if verify && !repo.branch_exists(branch) {
        ctx.output
            .error(&format!("Branch '{branch}' does not exist in repository"));
        return Ok(false);
    }

    let mut store = ctx.open_store()?;
    let project = ctx.project(&mut store, &repo)?;
    with_busy_retry(|| store.record_visit(project.id, branch, now_ms_i64()))?;
    ctx.output.success(&format!(
        "Added branch '{branch}' to tracking for {}",
        project.basename
    ));

    let total = store.count_branches(project.id)?;
    let max = ctx.config.max_branches();
    if total > max as i64 {
        ctx.output.warning(&format!(
            "Project has {total} branches (max: {max}). Consider running 'git-hop clear'"
        ));
    }

    Ok(true)
}
