// CSV file operations for the backing table

use crate::models::RepairRecord;
use crate::store::StoreError;
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// The fixed column set of the backing file, in on-disk order.
pub const COLUMNS: [&str; 12] = [
    "Date",
    "ID_Unique",
    "Client_Nom",
    "Client_Type",
    "Appareil_Marque",
    "Appareil_Modele",
    "Probleme",
    "Diagnostic",
    "Prix_Devis",
    "Prix_Final",
    "Statut",
    "Image_Path",
];

/// Read the whole table from a CSV file.
///
/// A nonexistent file yields an empty table and leaves the filesystem
/// untouched. An existing file must carry exactly the expected header and
/// rows deserializable to [`RepairRecord`]; anything else is a read error
/// that propagates to the caller unrecovered.
pub fn read_table(path: &Path) -> Result<Vec<RepairRecord>, StoreError> {
    if !path.exists() {
        debug!(file = ?path, "backing file absent, starting with empty table");
        return Ok(Vec::new());
    }

    let file = File::open(path).map_err(|e| StoreError::read(path, e))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader.headers().map_err(|e| StoreError::read(path, e))?;
    if headers.iter().ne(COLUMNS) {
        warn!(file = ?path, found = ?headers, "header does not match expected columns");
        return Err(StoreError::schema_mismatch(path, headers));
    }

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: RepairRecord = row.map_err(|e| StoreError::read(path, e))?;
        records.push(record);
    }

    debug!(file = ?path, count = records.len(), "loaded table");
    Ok(records)
}

/// Overwrite `path` with the serialized table: header row first, then one
/// row per record in slice order. Not atomic, no temp-file-then-rename.
pub fn write_table(path: &Path, records: &[RepairRecord]) -> Result<(), StoreError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| StoreError::write(path, e))?;

    // Header written explicitly so an empty table still persists the schema.
    writer
        .write_record(COLUMNS)
        .map_err(|e| StoreError::write(path, e))?;

    for record in records {
        writer.serialize(record).map_err(|e| StoreError::write(path, e))?;
    }

    writer.flush().map_err(|e| StoreError::write(path, e))?;
    debug!(file = ?path, count = records.len(), "persisted table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientType, Intake, Marque, RepairRecord, now_local};
    use std::fs;
    use tempfile::TempDir;

    fn sample(nom: &str, marque: Marque, prix_final: u32) -> RepairRecord {
        RepairRecord::new(
            Intake {
                client_nom: nom.to_string(),
                client_type: ClientType::Ancien,
                appareil_marque: marque,
                appareil_modele: "X".to_string(),
                probleme: "Ne charge plus".to_string(),
                diagnostic: "Connecteur oxydé".to_string(),
                prix_devis: prix_final,
                prix_final,
            },
            now_local(),
        )
    }

    #[test]
    fn test_read_nonexistent_file_is_empty_table() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("inventory.csv");

        let records = read_table(&path).unwrap();
        assert!(records.is_empty());
        // No side effect: loading must not create the file.
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_table_persists_header_only() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("inventory.csv");

        write_table(&path, &[]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), COLUMNS.join(","));
    }

    #[test]
    fn test_round_trip_preserves_rows_and_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("inventory.csv");

        let table = vec![
            sample("Moussa", Marque::Samsung, 15000),
            sample("Fatou", Marque::Apple, 5000),
            sample("Oumar", Marque::TecnoInfinix, 8000),
        ];
        write_table(&path, &table).unwrap();

        let loaded = read_table(&path).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_free_text_with_commas_and_newlines_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("inventory.csv");

        let mut record = sample("Binta", Marque::Autre, 3000);
        record.probleme = "Écran noir, vibre\nmais ne s'allume pas".to_string();
        record.diagnostic = "Carte mère HS, devis \"plafonné\"".to_string();
        write_table(&path, &[record.clone()]).unwrap();

        let loaded = read_table(&path).unwrap();
        assert_eq!(loaded, vec![record]);
    }

    #[test]
    fn test_header_mismatch_is_read_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("inventory.csv");
        fs::write(&path, "Date,Nom,Prix\n2024-01-01,Ali,500\n").unwrap();

        let err = read_table(&path).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn test_malformed_row_is_read_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("inventory.csv");
        let mut content = COLUMNS.join(",");
        content.push_str("\n2024-01-01 10:00,202401011000,Ali\n");
        fs::write(&path, content).unwrap();

        let err = read_table(&path).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[test]
    fn test_write_to_unwritable_path_is_write_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("no_such_dir").join("inventory.csv");

        let err = write_table(&path, &[]).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }
}
