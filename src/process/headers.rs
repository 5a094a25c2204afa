use std::collections::{HashMap, HashSet};

/// Placeholder for header cells that are empty or all whitespace.
const UNNAMED: &str = "Unnamed";

/// Produce a unique, non-empty name for every header cell, order preserved.
///
/// Empty cells become `"Unnamed"` first; duplicates then get a numeric
/// suffix, `_1` for the second occurrence, `_2` for the third, and so on.
/// A suffixed candidate can itself collide with a header seen earlier
/// (e.g. `["Name", "Name_1", "Name"]`), in which case the count keeps
/// climbing until the name is unique.
pub fn normalize_headers(raw: &[String]) -> Vec<String> {
    // occurrence count per post-placeholder name; lives only for this pass
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(raw.len());
    let mut used: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut out = Vec::with_capacity(raw.len());

    for cell in raw {
        let base = if cell.trim().is_empty() {
            UNNAMED.to_string()
        } else {
            cell.clone()
        };

        let mut occurrence = seen.get(&base).copied().unwrap_or(0);
        let mut name = if occurrence == 0 {
            base.clone()
        } else {
            format!("{}_{}", base, occurrence)
        };
        while !used.insert(name.clone()) {
            occurrence += 1;
            name = format!("{}_{}", base, occurrence);
        }
        seen.insert(base, occurrence + 1);
        out.push(name);
    }

    out
}
