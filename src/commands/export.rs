use crate::{
    db::db::Db,
    libs::{
        analytics::TimeRange,
        export::{ExportData, ExportFormat, Exporter},
        formatter,
        messages::Message,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(value_enum, default_value = "events")]
    data: ExportData,

    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,

    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only events created within this range
    #[arg(short, long, value_enum, default_value_t = TimeRange::AllTime)]
    range: TimeRange,
}

pub fn cmd(args: ExportArgs) -> Result<()> {
    let now = formatter::now();
    let db = Db::new()?;

    msg_info!(Message::ExportingData(format!("{:?}", args.data), format!("{:?}", args.format)));

    let exporter = Exporter::new(args.format, args.output, now);
    for path in exporter.export(&db, args.data, args.range, now)? {
        msg_success!(Message::ExportCompleted(path.display().to_string()));
    }

    Ok(())
}
