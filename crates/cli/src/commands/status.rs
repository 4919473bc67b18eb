use super::{Context, install};
use crate::error::CliError;

pub fn run(ctx: &Context) -> Result<bool, CliError> {
    let repo = ctx.repo()?;
    let mut store = ctx.open_store()?;
    let project = ctx.project(&mut store, &repo)?;
    let output = &ctx.output;

    output.heading("git-hop Status");
    output.info(&format!("Project: {}", project.basename));
    output.info(&format!("Path: {}", project.path));
    output.info(&format!(
        "Current branch: {}",
        repo.current_branch().unwrap_or_else(|| "(none)".to_string())
    ));

    output.heading("Configuration");
    output.info(&format!("Config file: {}", ctx.config.path().display()));
    output.info(&format!(
        "Config exists: {}",
        if ctx.config.exists() { "Yes" } else { "No" }
    ));
    output.info(&format!(
        "Database: {}",
        ctx.config.database_path().display()
    ));
    output.info(&format!("Max branches: {}", ctx.config.max_branches()));
    output.info(&format!(
        "Auto-track: {}",
        if ctx.config.auto_track() {
            "Enabled"
        } else {
            "Disabled"
        }
    ));
    output.info(&format!(
        "Keep patterns: {}",
        ctx.config.keep_patterns(None).join(", ")
    ));

    output.heading("Hook Status");
    output.info(&format!(
        "Post-checkout hook: {}",
        if repo.hook_installed(install::HOOK_NAME) {
            "Installed"
        } else {
            "Not installed"
        }
    ));

    output.heading("Tracking Statistics");
    let stats = store.project_stats(project.id)?;
    output.info(&format!(
        "Total branches tracked: {}",
        stats.total_branches
    ));
    if let Some(most_recent) = stats.most_recent {
        output.info(&format!("Most recent: {}", most_recent.name));
    }

    Ok(true)
}
