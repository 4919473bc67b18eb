use super::Context;
use crate::config::Config;
use crate::error::CliError;

pub fn run(ctx: &Context) -> Result<bool, CliError> {
    let path = ctx.config.path();

    if path.exists() {
        ctx.output.warning(&format!(
            "Config file already exists at: {}",
            path.display()
        ));
        if !ctx.output.prompt("Overwrite existing config?") {
            return Ok(false);
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default_config_content())?;

    ctx.output
        .success(&format!("Created config file at: {}", path.display()));
    ctx.output
        .info("Edit this file to customize your branch tracking settings");
    Ok(true)
}
