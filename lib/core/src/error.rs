use crate::record::{CustomerId, Field};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Duplicate customer id in {kind} records: {id}")]
    DuplicateCustomer { kind: &'static str, id: CustomerId },

    #[error("Customer {0} has a user record but no item record")]
    MissingItem(CustomerId),

    #[error("Customer {0} has an item record but no user record")]
    MissingUser(CustomerId),

    #[error("Field {field} is not carried by {kind} records")]
    FieldNotApplicable { field: Field, kind: &'static str },

    #[error("Encoder needs at least one field")]
    EmptyFieldList,

    #[error("Dense similarity over {rows} rows exceeds the limit of {limit}")]
    DatasetTooLarge { rows: usize, limit: usize },

    #[error("Invalid matrix shape: {rows} rows x {dim} columns for {len} values")]
    InvalidShape { rows: usize, dim: usize, len: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
