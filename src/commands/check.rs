use crate::{
    db::db::Db,
    libs::{
        config::Config,
        formatter,
        messages::Message,
        watcher::{announce, Watcher},
    },
    msg_info,
};
use anyhow::Result;

/// One watcher pass in the foreground.
pub fn cmd() -> Result<()> {
    let now = formatter::now();
    let watcher = Watcher::new(&Config::read()?);
    let db = Db::new()?;

    let report = watcher.run_once(&db, now)?;
    if report.is_empty() && report.deferred == 0 {
        msg_info!(Message::NothingToReport(report.checked_events));
    } else {
        announce(&report, now);
    }
    Ok(())
}
