mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{
    handle_clear, handle_move, handle_path, handle_plan, handle_remove, handle_show, handle_split,
    Cli, Commands, Context,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::load(&cli)?;

    match cli.command {
        Commands::Path { from, to } => handle_path(&ctx, &from, &to)?,
        Commands::Plan { start, waypoints } => handle_plan(&ctx, &start, &waypoints)?,
        Commands::Show => handle_show(&ctx)?,
        Commands::Split { system } => handle_split(&ctx, &system)?,
        Commands::Remove { system } => handle_remove(&ctx, &system)?,
        Commands::Move { old, new } => handle_move(&ctx, &old, &new)?,
        Commands::Clear => handle_clear(&ctx)?,
    }

    Ok(())
}
