use crate::libs::{
    event::EventCategory,
    template::{self, EVENT_TEMPLATES},
    view::View,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    /// Only templates of this category
    #[arg(short, long)]
    category: Option<EventCategory>,
    /// Only the most used templates
    #[arg(short, long, conflicts_with = "category")]
    popular: bool,
}

pub fn cmd(args: TemplatesArgs) -> Result<()> {
    if args.popular {
        View::event_templates(template::popular());
        return Ok(());
    }

    match args.category {
        Some(category) => {
            let templates: Vec<_> = template::by_category(category).into_iter().copied().collect();
            View::event_templates(&templates);
        }
        None => View::event_templates(&EVENT_TEMPLATES),
    }
    Ok(())
}
