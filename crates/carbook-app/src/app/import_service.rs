//! Legacy import use case with dry-run support

use std::path::Path;

use carbook_domain::repository::{SlotStorage, VEHICLES_KEY};
use carbook_infra::legacy_importer::{
    import_legacy_data, load_legacy_export, summarize_legacy_export, ImportMode, ImportResult,
};
use carbook_infra::persistence::MemorySlotStorage;
use carbook_store::VehicleStore;
use carbook_types::Result;
use tracing::info;

#[derive(Debug)]
pub struct ImportOutcome {
    /// Overview of the file contents
    pub summary: String,
    pub result: ImportResult,
    /// True when the import ran against a throwaway copy
    pub dry_run: bool,
}

/// Import a legacy export file into `store`.
///
/// With `dry_run` the import runs against an in-memory copy of the current
/// collection, so the counts are real but nothing is written.
pub fn import_file<S: SlotStorage>(
    store: &mut VehicleStore<S>,
    path: &Path,
    mode: ImportMode,
    dry_run: bool,
) -> Result<ImportOutcome> {
    let legacy = load_legacy_export(path)?;
    let summary = summarize_legacy_export(&legacy);

    let result = if dry_run {
        let snapshot = serde_json::to_string(&store.list())?;
        let mut scratch = VehicleStore::open(MemorySlotStorage::with_value(VEHICLES_KEY, snapshot))?;
        import_legacy_data(&legacy, &mut scratch, mode)?
    } else {
        import_legacy_data(&legacy, store, mode)?
    };

    info!(path = %path.display(), dry_run, imported = result.vehicles_imported, "import finished");
    Ok(ImportOutcome {
        summary,
        result,
        dry_run,
    })
}
