//! `phantomscan run-all`: the end-to-end daily pipeline (§4.7).

use crate::error::{PhantomScanError, Result};
use crate::model::{Corpus, Ecosystem, Policy};
use crate::persistence::{FileStore, Store};
use crate::pipeline::{self, RunOutcome};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct RunAllArgs {
    pub ecosystems: Vec<Ecosystem>,
    pub limit: usize,
    pub date: NaiveDate,
    pub top_n: Option<usize>,
}

/// Runs the pipeline; on a global failure, retries once in offline mode so
/// demos still produce output (§4.7, "Failure semantics").
pub fn run_run_all(
    mut args: RunAllArgs,
    policy: &mut Policy,
    corpus: &Corpus,
    store: &mut Store,
    files: &FileStore,
    stop: &AtomicBool,
) -> Result<RunOutcome> {
    if let Some(top_n) = args.top_n.take() {
        policy.top_n = top_n;
    }

    match pipeline::run_all(
        &args.ecosystems,
        args.limit,
        args.date,
        policy,
        corpus,
        store,
        files,
        stop,
    ) {
        Ok(outcome) => Ok(outcome),
        Err(err) if std::env::var(crate::config::OFFLINE_ENV_VAR).is_err() => {
            tracing::error!(error = %err, "run-all failed, retrying offline");
            std::env::set_var(crate::config::OFFLINE_ENV_VAR, "true");
            let retried = pipeline::run_all(
                &args.ecosystems,
                args.limit,
                args.date,
                policy,
                corpus,
                store,
                files,
                stop,
            );
            std::env::remove_var(crate::config::OFFLINE_ENV_VAR);
            retried.map_err(|retry_err| {
                PhantomScanError::internal(format!(
                    "run-all failed ({err}); offline retry also failed ({retry_err})"
                ))
            })
        }
        Err(err) => Err(err),
    }
}
