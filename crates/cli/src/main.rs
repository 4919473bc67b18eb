#![forbid(unsafe_code)]

mod cli;
mod commands;
mod config;
mod error;
mod output;
mod repo;
mod support;
mod util;

use clap::Parser;
use cli::{Cli, Command, HookCommand};
use commands::Context;
use config::Config;
use error::CliError;
use output::Output;
use repo::RepoError;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "warn,git_hop=debug,hop_storage=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.quiet, cli.verbose);
    let config = Config::load(cli.config.as_deref(), &output);
    let ctx = Context { config, output };

    let ok = match run(&cli.command, &ctx) {
        Ok(ok) => ok,
        Err(err) => {
            ctx.output.error(&render_error(&err));
            false
        }
    };
    if !ok {
        std::process::exit(1);
    }
}

fn run(command: &Command, ctx: &Context) -> Result<bool, CliError> {
    match command {
        Command::Setup => commands::setup::run(ctx),
        Command::Install => commands::install::run(ctx),
        Command::Add { branch, no_verify } => commands::add::run(ctx, branch, !no_verify),
        Command::List => commands::list::run(ctx),
        Command::Jump { index } => commands::jump::run(ctx, *index),
        Command::Clear { yes } => commands::clear::run(ctx, *yes),
        Command::Status => commands::status::run(ctx),
        Command::Hook { hook } => match hook {
            HookCommand::PostCheckout {
                prev_head,
                new_head,
                flag,
            } => Ok(commands::hook::post_checkout(ctx, prev_head, new_head, flag)),
        },
    }
}

fn render_error(err: &CliError) -> String {
    match err {
        CliError::Repo(RepoError::NotARepository(path)) => {
            format!("Not a git repository: {}", path.display())
        }
        other => other.to_string(),
    }
}
