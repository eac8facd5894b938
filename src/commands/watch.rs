use crate::{
    libs::{daemon, messages::Message},
    msg_info,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Run in this terminal instead of detaching
    #[arg(short, long)]
    foreground: bool,
    /// Stop the background watcher
    #[arg(short, long, conflicts_with_all = ["foreground", "status"])]
    stop: bool,
    /// Report whether the background watcher is running
    #[arg(long, conflicts_with = "foreground")]
    status: bool,
}

pub async fn cmd(args: WatchArgs) -> Result<()> {
    if args.stop {
        return daemon::stop();
    }

    if args.status {
        match daemon::status()? {
            Some(pid) => msg_info!(Message::WatcherRunningWithPid(pid)),
            None => msg_info!(Message::WatcherNotRunning),
        }
        return Ok(());
    }

    if args.foreground {
        return daemon::run_with_signal_handling().await;
    }

    daemon::spawn()
}
