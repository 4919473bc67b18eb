use super::Context;
use crate::error::CliError;
use crate::util::with_busy_retry;
use hop_storage::StoreError;

pub fn run(ctx: &Context, yes: bool) -> Result<bool, CliError> {
    let repo = ctx.repo()?;
    let mut store = ctx.open_store()?;
    let project = ctx.project(&mut store, &repo)?;

    if store.count_branches(project.id)? == 0 {
        ctx.output
            .info(&format!("No branches tracked for {}", project.basename));
        return Ok(true);
    }

    // Refusing to run without patterns lives here, not in the engine: an
    // empty keep list would otherwise wipe the whole project.
    let keep_patterns = ctx.config.keep_patterns(Some(&project.path)).to_vec();
    if keep_patterns.is_empty() {
        ctx.output
            .warning("No keep patterns configured. All branches would be deleted.");
        ctx.output
            .info("Configure keep_patterns in your config file to use this command");
        return Ok(false);
    }

    ctx.output
        .info(&format!("Keep patterns: {}", keep_patterns.join(", ")));
    if !yes && !ctx.output.prompt("Clear branches not matching patterns?") {
        ctx.output.info("Cancelled");
        return Ok(false);
    }

    let deleted = match with_busy_retry(|| store.clear_branches(project.id, &keep_patterns)) {
        Ok(deleted) => deleted,
        Err(err @ StoreError::InvalidPattern { .. }) => {
            ctx.output.error(&err.to_string());
            return Ok(false);
        }
        Err(err) => return Err(err.into()),
    };

    if deleted == 0 {
        ctx.output
            .info("No branches to clear (all match keep patterns)");
    } else {
        ctx.output.success(&format!("Cleared {deleted} branch(es)"));
    }
    Ok(true)
}
