use crate::record::{CustomerId, ItemRecord, Record, UserRecord};
use crate::{Error, Result};
use ahash::AHashMap;

/// One static snapshot of users and their purchases.
///
/// Rows are addressed through explicit id indices, so the two record sets
/// do not have to share positional order.
#[derive(Debug, Clone)]
pub struct Dataset {
    users: Vec<UserRecord>,
    items: Vec<ItemRecord>,
    user_rows: AHashMap<CustomerId, usize>,
    item_rows: AHashMap<CustomerId, usize>,
}

impl Dataset {
    /// Build a dataset, checking that users and items pair one-to-one.
    pub fn new(users: Vec<UserRecord>, items: Vec<ItemRecord>) -> Result<Self> {
        let user_rows = index_by_id(&users)?;
        let item_rows = index_by_id(&items)?;

        if let Some(user) = users.iter().find(|u| !item_rows.contains_key(&u.customer_id)) {
            return Err(Error::MissingItem(user.customer_id));
        }
        if let Some(item) = items.iter().find(|i| !user_rows.contains_key(&i.customer_id)) {
            return Err(Error::MissingUser(item.customer_id));
        }

        Ok(Self {
            users,
            items,
            user_rows,
            item_rows,
        })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn items(&self) -> &[ItemRecord] {
        &self.items
    }

    pub fn user_row(&self, id: CustomerId) -> Option<usize> {
        self.user_rows.get(&id).copied()
    }

    pub fn item_row(&self, id: CustomerId) -> Option<usize> {
        self.item_rows.get(&id).copied()
    }

    pub fn user(&self, id: CustomerId) -> Option<&UserRecord> {
        self.user_row(id).map(|row| &self.users[row])
    }

    pub fn item(&self, id: CustomerId) -> Option<&ItemRecord> {
        self.item_row(id).map(|row| &self.items[row])
    }

    /// The user who bought the item at `item_row`
    pub fn purchaser_of(&self, item_row: usize) -> Option<&UserRecord> {
        self.items
            .get(item_row)
            .and_then(|item| self.user(item.customer_id))
    }

    /// Customer ids in user-row order
    pub fn customer_ids(&self) -> impl Iterator<Item = CustomerId> + '_ {
        self.users.iter().map(|u| u.customer_id)
    }
}

fn index_by_id<R: Record>(records: &[R]) -> Result<AHashMap<CustomerId, usize>> {
    let mut rows = AHashMap::with_capacity(records.len());
    for (row, record) in records.iter().enumerate() {
        if rows.insert(record.customer_id(), row).is_some() {
            return Err(Error::DuplicateCustomer {
                kind: R::KIND,
                id: record.customer_id(),
            });
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: CustomerId) -> UserRecord {
        UserRecord {
            customer_id: id,
            age: Some(20.0 + id as f64),
            gender: Some("Male".to_string()),
            location: Some("Ohio".to_string()),
            size: Some("M".to_string()),
            previous_purchases: Some(3.0),
            purchase_frequency: Some("Weekly".to_string()),
            subscription_status: Some("No".to_string()),
        }
    }

    fn item(id: CustomerId) -> ItemRecord {
        ItemRecord {
            customer_id: id,
            item_name: Some("Shirt".to_string()),
            category: Some("Clothing".to_string()),
            purchase_amount: Some(40.0),
            color: Some("Red".to_string()),
            season: Some("Fall".to_string()),
        }
    }

    #[test]
    fn test_index_is_order_independent() {
        let dataset = Dataset::new(vec![user(1), user(2), user(3)], vec![item(3), item(1), item(2)])
            .unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.user_row(3), Some(2));
        assert_eq!(dataset.item_row(3), Some(0));
        assert_eq!(dataset.purchaser_of(0).unwrap().customer_id, 3);
        assert!(dataset.user(99).is_none());
    }

    #[test]
    fn test_duplicate_customer_rejected() {
        let err = Dataset::new(vec![user(1), user(1)], vec![item(1)]).unwrap_err();
        assert_eq!(err, Error::DuplicateCustomer { kind: "user", id: 1 });
    }

    #[test]
    fn test_unpaired_records_rejected() {
        assert_eq!(
            Dataset::new(vec![user(1), user(2)], vec![item(1)]).unwrap_err(),
            Error::MissingItem(2)
        );
        assert_eq!(
            Dataset::new(vec![user(1)], vec![item(1), item(5)]).unwrap_err(),
            Error::MissingUser(5)
        );
    }
}
