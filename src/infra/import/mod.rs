use std::collections::HashSet;

pub mod csv;
pub mod xlsx;

/// Renames repeated header names to `name_2`, `name_3`, ... so every column
/// can be addressed by name.
pub fn unique_column_names(columns: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(columns.len());
    columns
        .into_iter()
        .map(|name| {
            let mut candidate = name.clone();
            let mut suffix = 2;
            while used.contains(&candidate) {
                candidate = format!("{name}_{suffix}");
                suffix += 1;
            }
            used.insert(candidate.clone());
            candidate
        })
        .collect()
}
