//! CSV snapshot loader
//!
//! Reads the flat shopping table (one purchase per customer) and splits it
//! into user and item records. Rows with any missing value are dropped here,
//! before the data reaches the recommenders.

use serde::{Deserialize, Serialize};
use shoprec_core::{CustomerId, Dataset, ItemRecord, UserRecord};
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed snapshot: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Dataset(#[from] shoprec_core::Error),
}

/// One row of the shopping table, keyed by the table's column names.
///
/// Columns not listed here are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingRow {
    #[serde(rename = "Customer ID")]
    pub customer_id: CustomerId,
    #[serde(rename = "Age", default)]
    pub age: Option<f64>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "Location", default)]
    pub location: Option<String>,
    #[serde(rename = "Size", default)]
    pub size: Option<String>,
    #[serde(rename = "Previous Purchases", default)]
    pub previous_purchases: Option<f64>,
    #[serde(rename = "Frequency of Purchases", default)]
    pub purchase_frequency: Option<String>,
    #[serde(rename = "Subscription Status", default)]
    pub subscription_status: Option<String>,
    #[serde(rename = "Item Purchased", default)]
    pub item_name: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Purchase Amount (USD)", default)]
    pub purchase_amount: Option<f64>,
    #[serde(rename = "Color", default)]
    pub color: Option<String>,
    #[serde(rename = "Season", default)]
    pub season: Option<String>,
}

impl ShoppingRow {
    fn is_complete(&self) -> bool {
        let numbers = [self.age, self.previous_purchases, self.purchase_amount];
        let texts = [
            &self.gender,
            &self.location,
            &self.size,
            &self.purchase_frequency,
            &self.subscription_status,
            &self.item_name,
            &self.category,
            &self.color,
            &self.season,
        ];
        numbers.iter().all(|n| n.is_some_and(f64::is_finite)) && texts.iter().all(|t| t.is_some())
    }

    fn into_records(self) -> (UserRecord, ItemRecord) {
        let user = UserRecord {
            customer_id: self.customer_id,
            age: self.age,
            gender: self.gender,
            location: self.location,
            size: self.size,
            previous_purchases: self.previous_purchases,
            purchase_frequency: self.purchase_frequency,
            subscription_status: self.subscription_status,
        };
        let item = ItemRecord {
            customer_id: self.customer_id,
            item_name: self.item_name,
            category: self.category,
            purchase_amount: self.purchase_amount,
            color: self.color,
            season: self.season,
        };
        (user, item)
    }
}

/// Read a headed CSV table of [`ShoppingRow`]s. Empty cells load as `None`.
pub fn load_rows(path: impl AsRef<Path>) -> Result<Vec<ShoppingRow>, SnapshotError> {
    let file = File::open(path.as_ref())?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    let rows = reader
        .deserialize::<ShoppingRow>()
        .collect::<Result<Vec<_>, _>>()?;
    info!(rows = rows.len(), path = %path.as_ref().display(), "snapshot loaded");
    Ok(rows)
}

/// Drop incomplete rows and split the rest into user and item records
pub fn split_rows(rows: Vec<ShoppingRow>) -> (Vec<UserRecord>, Vec<ItemRecord>) {
    let total = rows.len();
    let (users, items): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .filter(ShoppingRow::is_complete)
        .map(ShoppingRow::into_records)
        .unzip();

    let dropped = total - users.len();
    if dropped > 0 {
        warn!(dropped, kept = users.len(), "dropped rows with missing values");
    }
    (users, items)
}

/// Load, clean and index a snapshot in one step
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, SnapshotError> {
    let (users, items) = split_rows(load_rows(path)?);
    Ok(Dataset::new(users, items)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Customer ID,Age,Gender,Item Purchased,Category,Purchase Amount (USD),\
Location,Size,Color,Season,Review Rating,Subscription Status,Shipping Type,Discount Applied,\
Promo Code Used,Previous Purchases,Payment Method,Frequency of Purchases";

    const ROWS: &str = "\
1,55,Male,Blouse,Clothing,53,Kentucky,L,Gray,Winter,3.1,Yes,Express,Yes,Yes,14,Venmo,Fortnightly
2,19,Male,Sweater,Clothing,64,Maine,L,Maroon,Winter,3.1,Yes,Express,Yes,Yes,2,Cash,Fortnightly
3,,Male,Jeans,Clothing,73,Massachusetts,S,Maroon,Spring,3.1,Yes,Free Shipping,Yes,Yes,23,Credit Card,Weekly
";

    fn write_snapshot(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn snapshot() -> tempfile::NamedTempFile {
        write_snapshot(&format!("{HEADER}\n{ROWS}"))
    }

    #[test]
    fn test_load_and_split() {
        let file = snapshot();
        let rows = load_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].purchase_amount, Some(53.0));
        assert_eq!(rows[0].purchase_frequency.as_deref(), Some("Fortnightly"));
        assert_eq!(rows[2].age, None);

        let (users, items) = split_rows(rows);
        assert_eq!(users.len(), 2);
        assert_eq!(items.len(), 2);
        assert_eq!(users[1].customer_id, 2);
        assert_eq!(items[0].item_name.as_deref(), Some("Blouse"));
    }

    #[test]
    fn test_load_dataset() {
        let file = snapshot();
        let dataset = load_dataset(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(dataset.user(3).is_none());
    }

    #[test]
    fn test_writer_output_loads_back() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let row = ShoppingRow {
            customer_id: 7,
            age: Some(31.0),
            gender: Some("Female".into()),
            location: Some("Ohio".into()),
            size: Some("M".into()),
            previous_purchases: Some(4.0),
            purchase_frequency: Some("Monthly".into()),
            subscription_status: Some("No".into()),
            item_name: Some("Hat".into()),
            category: Some("Accessories".into()),
            purchase_amount: Some(25.0),
            color: Some("Red".into()),
            season: None,
        };
        let mut writer = csv::Writer::from_path(file.path()).unwrap();
        writer.serialize(&row).unwrap();
        writer.flush().unwrap();

        let rows = load_rows(file.path()).unwrap();
        assert_eq!(rows, vec![row]);
        assert_eq!(split_rows(rows).0.len(), 0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let line = "1,20,Female,Hat,Accessories,10,X,M,Red,Fall,4.0,No,Express,No,No,1,Cash,Weekly";
        let file = write_snapshot(&format!("{HEADER}\n{line}\n{line}\n"));
        assert!(matches!(load_dataset(file.path()), Err(SnapshotError::Dataset(_))));
    }

    #[test]
    fn test_malformed_snapshot() {
        let file = write_snapshot(&format!("{HEADER}\nnot-a-number,20,Female\n"));
        assert!(matches!(load_rows(file.path()), Err(SnapshotError::Csv(_))));
        assert!(matches!(
            load_rows("/nonexistent/shoprec.csv"),
            Err(SnapshotError::Io(_))
        ));
    }
}
