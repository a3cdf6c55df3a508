//! Vessel list loading.
//!
//! The input is a headed CSV. The identifier column may be named
//! `vessel_id` or `id`; `name` is optional. Rows with an empty identifier
//! are silently skipped: a malformed row is excluded, not an error.

use std::collections::BTreeMap;
use std::path::Path;

use seatrace_ingest_models::VesselRef;

/// Loads the vessel list from a CSV file.
///
/// Duplicate identifiers are preserved: the downstream upserts are
/// idempotent, so a duplicate merely redoes work.
///
/// # Errors
///
/// Returns [`csv::Error`] if the file cannot be opened or a row cannot be
/// parsed.
pub fn load_vessels(path: &Path) -> Result<Vec<VesselRef>, csv::Error> {
    let reader = csv::Reader::from_path(path)?;
    read_vessels(reader)
}

/// Loads the vessel list from any CSV reader.
///
/// # Errors
///
/// Returns [`csv::Error`] if a row cannot be parsed.
pub fn read_vessels<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<VesselRef>, csv::Error> {
    let mut vessels = Vec::new();

    for row in reader.deserialize::<BTreeMap<String, String>>() {
        let row = row?;

        // `vessel_id` wins; an empty value falls through to `id`.
        let Some(vessel_id) = ["vessel_id", "id"]
            .iter()
            .find_map(|col| row.get(*col).map(|v| v.trim()).filter(|v| !v.is_empty()))
        else {
            continue;
        };

        let name = row
            .get("name")
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_owned);

        vessels.push(VesselRef {
            vessel_id: vessel_id.to_owned(),
            name,
        });
    }

    log::debug!("Loaded {} vessel(s)", vessels.len());

    Ok(vessels)
}
