//! `phantomscan fetch`: list recently published candidates and persist the
//! raw dump, without scoring them.

use crate::error::Result;
use crate::model::{Ecosystem, Policy};
use crate::persistence::{FileStore, Store};
use chrono::NaiveDate;

pub struct FetchArgs {
    pub ecosystems: Vec<Ecosystem>,
    pub limit: usize,
    pub date: NaiveDate,
}

pub fn run_fetch(
    args: FetchArgs,
    _policy: &Policy,
    store: &mut Store,
    files: &FileStore,
) -> Result<usize> {
    let mut total = 0;
    for ecosystem in args.ecosystems {
        let candidates = crate::sources::fetch_recent(ecosystem, args.limit);
        total += candidates.len();
        store.insert_raw_candidates(args.date, ecosystem, &candidates)?;
        files.write_raw_candidates(args.date, ecosystem, &candidates)?;
        tracing::info!(
            ecosystem = ecosystem.as_str(),
            count = candidates.len(),
            "fetched candidates"
        );
    }
    Ok(total)
}
