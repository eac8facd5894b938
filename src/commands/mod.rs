pub mod add;
pub mod archive;
pub mod check;
pub mod countdown;
pub mod delete;
pub mod duplicate;
pub mod edit;
pub mod export;
pub mod init;
pub mod list;
pub mod migrations;
pub mod milestone;
pub mod recur;
pub mod remind;
pub mod show;
pub mod stats;
pub mod templates;
pub mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Create a countdown event")]
    Add(add::AddArgs),
    #[command(about = "List events")]
    List(list::ListArgs),
    #[command(about = "Show an event with its milestones and recurrence")]
    Show(show::ShowArgs),
    #[command(about = "Edit an event")]
    Edit(edit::EditArgs),
    #[command(about = "Delete an event")]
    Delete(delete::DeleteArgs),
    #[command(about = "Copy an event")]
    Duplicate(duplicate::DuplicateArgs),
    #[command(about = "Deactivate an event")]
    Archive(archive::ArchiveArgs),
    #[command(about = "Reactivate an archived event")]
    Restore(archive::ArchiveArgs),
    #[command(about = "Show time remaining")]
    Countdown(countdown::CountdownArgs),
    #[command(about = "Manage milestones", arg_required_else_help = true)]
    Milestone(milestone::MilestoneArgs),
    #[command(about = "Manage recurring events", arg_required_else_help = true)]
    Recur(recur::RecurArgs),
    #[command(about = "Snooze reminders or get suggested reminder times", arg_required_else_help = true)]
    Remind(remind::RemindArgs),
    #[command(about = "Check milestones, reminders and recurring events once")]
    Check,
    #[command(about = "Run the watcher in the background")]
    Watch(watch::WatchArgs),
    #[command(about = "Show statistics")]
    Stats(stats::StatsArgs),
    #[command(about = "Export data to CSV, JSON or Excel")]
    Export(export::ExportArgs),
    #[command(about = "List event templates")]
    Templates(templates::TemplatesArgs),
    #[cfg(debug_assertions)]
    #[command(about = "Database migrations", arg_required_else_help = true)]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Add(args) => add::cmd(args),
            Commands::List(args) => list::cmd(args),
            Commands::Show(args) => show::cmd(args),
            Commands::Edit(args) => edit::cmd(args),
            Commands::Delete(args) => delete::cmd(args),
            Commands::Duplicate(args) => duplicate::cmd(args),
            Commands::Archive(args) => archive::archive(args),
            Commands::Restore(args) => archive::restore(args),
            Commands::Countdown(args) => countdown::cmd(args),
            Commands::Milestone(args) => milestone::cmd(args),
            Commands::Recur(args) => recur::cmd(args),
            Commands::Remind(args) => remind::cmd(args),
            Commands::Check => check::cmd(),
            Commands::Watch(args) => watch::cmd(args).await,
            Commands::Stats(args) => stats::cmd(args),
            Commands::Export(args) => export::cmd(args),
            Commands::Templates(args) => templates::cmd(args),
            #[cfg(debug_assertions)]
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}
