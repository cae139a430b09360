use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

/// Load the location-to-region lookup from a JSON object file, e.g.
/// `{"Nelson": "South Island", "Hastings": "North Island"}`.
pub fn load_region_lookup(path: &Path) -> anyhow::Result<HashMap<String, String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read region lookup {}", path.display()))?;
    let lookup: HashMap<String, String> = serde_json::from_str(&contents)
        .with_context(|| format!("invalid region lookup JSON in {}", path.display()))?;
    Ok(lookup)
}
