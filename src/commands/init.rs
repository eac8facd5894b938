use crate::{
    db::db::Db,
    libs::{config::Config, data_storage::DataStorage, messages::Message},
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write the default configuration without prompting
    #[arg(short, long)]
    defaults: bool,
}

pub fn cmd(args: InitArgs) -> Result<()> {
    let config = if args.defaults {
        Config {
            watcher: Some(Default::default()),
            display: Some(Default::default()),
            milestones: Some(Default::default()),
            recurrence: Some(Default::default()),
        }
    } else {
        Config::init()?
    };
    config.save()?;
    Db::new()?;

    msg_success!(Message::ConfigSaved);
    msg_info!(Message::DataDirectory(DataStorage::new().base_path().display().to_string()));
    Ok(())
}
