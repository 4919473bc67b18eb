use super::Context;
use crate::error::CliError;

pub const HOOK_NAME: &str = "post-checkout";
pub const HOOK_MARKER: &str = "git-hop post-checkout hook";

pub fn hook_script() -> String {
    r#"#!/bin/sh
# git-hop post-checkout hook
# Auto-generated - do not edit manually

# Skip when git-hop itself triggered the checkout
if [ -n "$GIT_HOP_SKIP_HOOK" ]; then
    exit 0
fi

# $3 is 1 for branch checkouts, 0 for file checkouts
if [ "$3" = "1" ]; then
    if command -v git-hop >/dev/null 2>&1; then
        git-hop --quiet hook post-checkout "$1" "$2" "$3" >/dev/null 2>&1 || true
    fi
fi
"#
    .to_string()
}

pub fn run(ctx: &Context) -> Result<bool, CliError> {
    let repo = ctx.repo()?;

    if repo.hook_installed(HOOK_NAME) {
        let existing = repo.read_hook(HOOK_NAME);
        if existing.is_some_and(|content| content.contains(HOOK_MARKER)) {
            ctx.output.info("git-hop hook already installed");
            return Ok(true);
        }
        ctx.output.warning("A post-checkout hook already exists");
        if !ctx.output.prompt("Overwrite existing hook?") {
            return Ok(false);
        }
    }

    repo.install_hook(HOOK_NAME, &hook_script())?;
    ctx.output.success(&format!(
        "Installed post-checkout hook in {}",
        repo.basename()
    ));
    ctx.output
        .info("Branches will now be automatically tracked on checkout");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_script_guards_reentry_and_carries_marker() {
        let script = hook_script();
        assert!(script.starts_with("#!/bin/sh"));
        assert!(script.contains(HOOK_MARKER));
        assert!(script.contains("GIT_HOP_SKIP_HOOK"));
        assert!(script.contains("hook post-checkout"));
    }
}
