//! hearth init command implementation
//!
//! Creates the hub data directory, default config, and seeded categories.

use std::path::PathBuf;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};

use super::GlobalOptions;

pub struct InitOptions {
    pub household: Option<String>,
    pub dir: Option<PathBuf>,
    pub globals: GlobalOptions,
}

#[derive(serde::Serialize)]
struct InitReport {
    root: PathBuf,
    household: String,
    categories: Vec<String>,
}

pub fn run(opts: InitOptions) -> Result<()> {
    let root = match opts.dir.or(opts.globals.hub) {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let hub = crate::hub::init(&root, opts.household.as_deref())?;
    let store = hub.store();
    let categories = crate::category::CategoryRepo::new(&store).list()?.names;

    let report = InitReport {
        root: hub.root.clone(),
        household: hub.config.household.clone(),
        categories: categories.clone(),
    };

    let mut human = HumanOutput::new(format!(
        "hearth init: hub ready for {}",
        hub.config.household
    ));
    human.push_summary("root", hub.root.display().to_string());
    human.push_summary("categories", categories.join(", "));
    human.push_next_step("hearth signin <name>");
    human.push_next_step("hearth task add \"first task\"");

    emit_success(
        OutputOptions {
            json: opts.globals.json,
            quiet: opts.globals.quiet,
        },
        "init",
        &report,
        Some(&human),
    )
}
