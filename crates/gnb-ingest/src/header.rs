//! Header normalization for spreadsheet and delimited sources.

use std::collections::HashSet;

/// Normalize a raw header cell: trim whitespace and strip a UTF-8 BOM.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().trim_start_matches('\u{feff}').trim().to_string()
}

/// Resolve header cells into unique column names.
///
/// Empty cells become `Unnamed: <index>`. Repeated names are mangled as
/// `name.1`, `name.2`, … in order of appearance.
pub fn header_names(cells: &[Option<String>], width: usize) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(width);
    let mut names = Vec::with_capacity(width);
    for index in 0..width {
        let base = cells
            .get(index)
            .and_then(Option::as_deref)
            .map(normalize_header)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Unnamed: {index}"));
        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}
