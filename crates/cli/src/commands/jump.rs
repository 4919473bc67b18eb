use super::Context;
use crate::error::CliError;
use crate::support::now_ms_i64;
use crate::util::with_busy_retry;

pub fn run(ctx: &Context, index: Option<i64>) -> Result<bool, CliError> {
    let repo = ctx.repo()?;
    let mut store = ctx.open_store()?;
    let project = ctx.project(&mut store, &repo)?;

    if store.count_branches(project.id)? == 0 {
        ctx.output
            .error(&format!("No branches tracked for {}", project.basename));
        ctx.output.info("Use 'git-hop add <branch>' to add branches");
        return Ok(false);
    }

    let current = repo.current_branch();
    let target = match index {
        Some(index) => store.branch_at_index(project.id, index)?,
        None => store.next_branch(project.id, current.as_deref())?,
    };

    let Some(target) = target else {
        if let Some(index) = index {
            ctx.output.error(&format!("Invalid branch index: {index}"));
        }
        return Ok(false);
    };

    if Some(target.as_str()) == current.as_deref() {
        ctx.output.info(&format!("Already on branch '{target}'"));
        return Ok(true);
    }

    if let Err(err) = repo.checkout(&target) {
        ctx.output
            .error(&format!("Failed to checkout branch '{target}': {err}"));
        return Ok(false);
    }

    with_busy_retry(|| store.record_visit(project.id, &target, now_ms_i64()))?;
    ctx.output.success(&format!("Switched to branch '{target}'"));
    Ok(true)
}
