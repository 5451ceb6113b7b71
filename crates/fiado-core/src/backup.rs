//! # Backup Snapshot
//!
//! The manual export: both collections in one JSON document named after
//! the day it was taken.

use chrono::NaiveDate;

use crate::types::ShopData;

/// File name for a backup taken on `date`: `BACKUP_MERCEARIA_19-10-2026.json`.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("BACKUP_MERCEARIA_{}.json", date.format("%d-%m-%Y"))
}

/// Serializes the snapshot as `{"products": [...], "customers": [...]}`.
pub fn backup_document(shop: &ShopData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(shop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(backup_file_name(date), "BACKUP_MERCEARIA_07-03-2026.json");
    }

    #[test]
    fn test_document_has_both_collections() {
        let shop = ShopData::new(seed::products(), seed::customers());
        let text = backup_document(&shop).unwrap();

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["products"].as_array().unwrap().len(), 5);
        assert_eq!(value["customers"].as_array().unwrap().len(), 3);

        let restored: ShopData = serde_json::from_str(&text).unwrap();
        assert_eq!(restored, shop);
    }
}
