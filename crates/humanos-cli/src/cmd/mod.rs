pub mod cache;
pub mod catalog;
pub mod refresh;
pub mod run;
pub mod settings;
pub mod status;
pub mod today;
pub mod week;

use anyhow::Context;
use humanos_core::catalog::HttpSource;
use humanos_core::routine::Routine;
use humanos_core::store::FileStore;
use std::path::Path;

pub(crate) fn open_store(root: &Path) -> FileStore {
    FileStore::open(root)
}

pub(crate) fn http_source() -> anyhow::Result<HttpSource> {
    HttpSource::new().context("failed to set up HTTP client")
}

pub(crate) fn window(routine: &Routine) -> String {
    format!("{}-{}", routine.trigger.start, routine.trigger.end)
}
