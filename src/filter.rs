// Journal filtering over in-memory tables

use crate::models::{Marque, RepairRecord};

/// Distinct marque values present in the table, in first-appearance order.
/// Drives the journal filter checkboxes: only values actually on file are
/// offered.
pub fn distinct_marques(table: &[RepairRecord]) -> Vec<Marque> {
    let mut seen = Vec::new();
    for record in table {
        if !seen.contains(&record.appareil_marque) {
            seen.push(record.appareil_marque);
        }
    }
    seen
}

/// Rows whose marque is in `selection`. An empty selection means no
/// filtering: every row passes.
pub fn filter_by_marques<'a>(
    table: &'a [RepairRecord],
    selection: &[Marque],
) -> Vec<&'a RepairRecord> {
    if selection.is_empty() {
        return table.iter().collect();
    }
    table
        .iter()
        .filter(|r| selection.contains(&r.appareil_marque))
        .collect()
}
