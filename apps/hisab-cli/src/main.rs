mod cli;
mod commands;
mod context;
mod terminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, GroupCommand, UserCommand};
use commands::*;
use context::Context;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut ctx = Context::load(cli.config.as_deref(), cli.data.as_deref())?;

    match cli.command {
        Command::User { user_cmd } => match user_cmd {
            UserCommand::Add {
                id,
                name,
                email,
                image_url,
            } => {
                cmd_user_add(&ctx, &id, &name, email, image_url)?;
            }
            UserCommand::List => {
                cmd_user_list(&ctx);
            }
            UserCommand::Use { id } => {
                cmd_user_use(&mut ctx, &id)?;
            }
            UserCommand::Whoami => {
                cmd_user_whoami(&ctx).await?;
            }
            UserCommand::Search { query } => {
                cmd_user_search(&ctx, &query).await?;
            }
        },
        Command::Contacts => {
            cmd_contacts(&ctx).await?;
        }
        Command::Group { group_cmd } => match group_cmd {
            GroupCommand::Create {
                name,
                description,
                members,
            } => {
                cmd_group_create(&ctx, &name, description, &members).await?;
            }
        },
    }

    Ok(())
}
