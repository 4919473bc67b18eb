use super::Context;
use crate::error::CliError;
use crate::repo::{GitRepo, SKIP_HOOK_ENV};
use crate::support::now_ms_i64;
use crate::util::with_busy_retry;

/// Post-checkout tracking. This path must never fail the git operation
/// that triggered it, so every error is swallowed after a debug trace and
/// the command always reports success.
pub fn post_checkout(ctx: &Context, prev_head: &str, new_head: &str, flag: &str) -> bool {
    tracing::debug!(prev_head, new_head, flag, "post-checkout hook fired");

    if flag != "1" {
        return true;
    }
    if std::env::var_os(SKIP_HOOK_ENV).is_some() {
        return true;
    }
    if !ctx.config.auto_track() {
        return true;
    }

    if let Err(err) = track_current_branch(ctx) {
        tracing::debug!(error = %err, "post-checkout tracking skipped");
    }
    true
}

fn track_current_branch(ctx: &Context) -> Result<(), CliError> {
    let repo = GitRepo::discover()?;
    let Some(current) = repo.current_branch() else {
        return Ok(());
    };

    let mut store = ctx.open_store()?;
    let project = ctx.project(&mut store, &repo)?;
    with_busy_retry(|| store.record_visit(project.id, &current, now_ms_i64()))?;

    let max = ctx.config.max_branches();
    if store.count_branches(project.id)? > max as i64 {
        with_busy_retry(|| store.cleanup_excess(project.id, max))?;
    }
    Ok(())
}
