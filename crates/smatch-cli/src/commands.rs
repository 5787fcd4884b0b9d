use anyhow::{Context, Result};
use smatch_cli::config::MatchConfig;
use smatch_cli::run::{Request, execute, open_source};
use smatch_map::RankedMatch;

use crate::cli::{Command, SourceArgs, TuningArgs};

/// Config file values overlaid with command line flags.
pub fn build_config(source: &SourceArgs, tuning: &TuningArgs) -> Result<MatchConfig> {
    let mut config = match &source.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };

    let cupid = &mut config.cupid;
    for (flag, slot) in [
        (tuning.leaf_w_struct, &mut cupid.leaf_w_struct),
        (tuning.w_struct, &mut cupid.w_struct),
        (tuning.th_accept, &mut cupid.th_accept),
        (tuning.th_high, &mut cupid.th_high),
        (tuning.th_low, &mut cupid.th_low),
        (tuning.c_inc, &mut cupid.c_inc),
        (tuning.c_dec, &mut cupid.c_dec),
        (tuning.th_ns, &mut cupid.th_ns),
    ] {
        if let Some(value) = flag {
            *slot = value;
        }
    }
    if let Some(max) = tuning.max_matches {
        config.max_matches = Some(max);
    }

    if let Some(parallelism) = source.parallelism {
        config.retrieval.parallelism = parallelism;
    }
    if let Some(chunk_size) = source.chunk_size {
        config.retrieval.chunk_size = chunk_size;
    }
    let atlas = &mut config.atlas;
    if source.atlas_url.is_some() {
        atlas.url.clone_from(&source.atlas_url);
    }
    if source.atlas_user.is_some() {
        atlas.user.clone_from(&source.atlas_user);
    }
    if source.atlas_password.is_some() {
        atlas.password.clone_from(&source.atlas_password);
    }
    if source.timeout_secs.is_some() {
        atlas.timeout_secs = source.timeout_secs;
    }
    Ok(config)
}

fn request_for(command: &Command) -> Request {
    match command {
        Command::WithinDb { table } => Request::WithinDb {
            table: table.clone(),
        },
        Command::OtherDb { table, database } => Request::OtherDb {
            table: table.clone(),
            database: database.clone(),
        },
        Command::Holistic { table } => Request::Holistic {
            table: table.clone(),
        },
    }
}

pub fn run_match(
    command: &Command,
    source: &SourceArgs,
    tuning: &TuningArgs,
) -> Result<Vec<RankedMatch>> {
    let config = build_config(source, tuning)?;
    let schemas = open_source(&config, source.datasets.as_deref())?;
    execute(schemas.as_ref(), &config, &request_for(command)).context("matching request failed")
}
