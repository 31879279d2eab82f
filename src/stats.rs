// Dashboard aggregation over the in-memory table

use crate::models::RepairRecord;

/// The three headline metrics over `Prix_Final`.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialSummary {
    /// Chiffre d'affaires total, FCFA.
    pub total: u64,
    /// Number of interventions.
    pub count: usize,
    /// Panier moyen, FCFA.
    pub mean: f64,
}

/// Compute the headline metrics, or `None` for an empty table — the
/// dashboard is skipped entirely in that case rather than dividing by zero.
pub fn summary(table: &[RepairRecord]) -> Option<FinancialSummary> {
    if table.is_empty() {
        return None;
    }
    let total: u64 = table.iter().map(|r| u64::from(r.prix_final)).sum();
    let count = table.len();
    Some(FinancialSummary {
        total,
        count,
        mean: total as f64 / count as f64,
    })
}

/// Frequency counts of `key(record)` labels, most frequent first; ties keep
/// first-appearance order. Feeds the two bar charts (by marque, by client
/// type).
pub fn value_counts<F>(table: &[RepairRecord], key: F) -> Vec<(String, usize)>
where
    F: Fn(&RepairRecord) -> String,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in table {
        let label = key(record);
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientType, Intake, Marque, now_local};

    fn record(marque: Marque, client_type: ClientType, prix_final: u32) -> RepairRecord {
        RepairRecord::new(
            Intake {
                client_nom: "Client".to_string(),
                client_type,
                appareil_marque: marque,
                appareil_modele: "M".to_string(),
                probleme: "P".to_string(),
                diagnostic: "D".to_string(),
                prix_devis: prix_final,
                prix_final,
            },
            now_local(),
        )
    }

    #[test]
    fn test_summary_empty_table_is_none() {
        assert_eq!(summary(&[]), None);
    }

    #[test]
    fn test_summary_matches_direct_recomputation() {
        let table = vec![
            record(Marque::Samsung, ClientType::Nouveau, 15000),
            record(Marque::Apple, ClientType::Ancien, 5000),
        ];
        let s = summary(&table).unwrap();
        assert_eq!(s.total, 20000);
        assert_eq!(s.count, 2);
        assert_eq!(s.mean, 10000.0);
    }

    #[test]
    fn test_marque_counts_for_scenario() {
        let table = vec![
            record(Marque::Samsung, ClientType::Nouveau, 15000),
            record(Marque::Apple, ClientType::Ancien, 5000),
        ];
        let counts = value_counts(&table, |r| r.appareil_marque.to_string());
        assert_eq!(counts, vec![("Samsung".to_string(), 1), ("Apple".to_string(), 1)]);
    }

    #[test]
    fn test_client_type_counts_accumulate() {
        let table = vec![
            record(Marque::Samsung, ClientType::Nouveau, 1),
            record(Marque::Samsung, ClientType::Nouveau, 1),
            record(Marque::Apple, ClientType::Recommande, 1),
        ];
        let counts = value_counts(&table, |r| r.client_type.to_string());
        assert_eq!(
            counts,
            vec![("Nouveau".to_string(), 2), ("Recommandé".to_string(), 1)]
        );
    }

    #[test]
    fn test_counts_sorted_most_frequent_first() {
        let table = vec![
            record(Marque::Apple, ClientType::Ancien, 1),
            record(Marque::Samsung, ClientType::Ancien, 1),
            record(Marque::Samsung, ClientType::Ancien, 1),
            record(Marque::Autre, ClientType::Ancien, 1),
            record(Marque::Autre, ClientType::Ancien, 1),
            record(Marque::Samsung, ClientType::Ancien, 1),
        ];
        let counts = value_counts(&table, |r| r.appareil_marque.to_string());
        assert_eq!(
            counts,
            vec![
                ("Samsung".to_string(), 3),
                ("Autre".to_string(), 2),
                ("Apple".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_mean_is_fractional() {
        let table = vec![
            record(Marque::Autre, ClientType::Ancien, 1000),
            record(Marque::Autre, ClientType::Ancien, 2000),
            record(Marque::Autre, ClientType::Ancien, 2000),
        ];
        let s = summary(&table).unwrap();
        assert!((s.mean - 5000.0 / 3.0).abs() < 1e-9);
    }
}
