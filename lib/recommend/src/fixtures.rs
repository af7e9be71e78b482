//! Small in-memory shop shared by the unit tests

use shoprec_core::{Dataset, ItemRecord, UserRecord};
use std::sync::Arc;

type UserRow = (u32, f64, &'static str, &'static str, &'static str, f64, &'static str, &'static str);
type ItemRow = (u32, &'static str, &'static str, f64, &'static str, &'static str);

const USERS: &[UserRow] = &[
    (1, 25.0, "Male", "New York", "M", 10.0, "Weekly", "Yes"),
    (2, 27.0, "Male", "New York", "M", 12.0, "Weekly", "Yes"),
    (3, 60.0, "Female", "Los Angeles", "S", 40.0, "Rarely", "No"),
    (4, 58.0, "Female", "Los Angeles", "S", 38.0, "Rarely", "No"),
    (5, 40.0, "Male", "Texas", "L", 20.0, "Monthly", "Yes"),
    (6, 42.0, "Male", "Texas", "L", 22.0, "Monthly", "Yes"),
    (7, 33.0, "Female", "New York", "M", 15.0, "Weekly", "No"),
    (8, 35.0, "Female", "New York", "M", 16.0, "Weekly", "No"),
    (9, 50.0, "Male", "Los Angeles", "XL", 30.0, "Often", "Yes"),
    (10, 19.0, "Female", "Texas", "S", 2.0, "Occasionally", "No"),
    (11, 45.0, "Male", "New York", "L", 25.0, "Monthly", "Yes"),
    (12, 30.0, "Female", "Los Angeles", "M", 8.0, "Weekly", "Yes"),
];

const ITEMS: &[ItemRow] = &[
    (1, "Jeans", "Clothing", 50.0, "Blue", "Winter"),
    (2, "Jeans", "Clothing", 50.0, "Blue", "Winter"),
    (3, "Sandals", "Footwear", 30.0, "Red", "Summer"),
    (4, "Sandals", "Footwear", 35.0, "Red", "Summer"),
    (5, "Jacket", "Outerwear", 90.0, "Black", "Fall"),
    (6, "Jacket", "Outerwear", 85.0, "Black", "Fall"),
    (7, "Blouse", "Clothing", 40.0, "White", "Spring"),
    (8, "Blouse", "Clothing", 45.0, "White", "Spring"),
    (9, "Sneakers", "Footwear", 60.0, "Blue", "Winter"),
    (10, "Hat", "Accessories", 20.0, "Green", "Summer"),
    (11, "Jeans", "Clothing", 55.0, "Black", "Winter"),
    (12, "Sweater", "Clothing", 65.0, "Blue", "Fall"),
];

pub(crate) fn user(row: &UserRow) -> UserRecord {
    let &(customer_id, age, gender, location, size, previous, frequency, subscription) = row;
    UserRecord {
        customer_id,
        age: Some(age),
        gender: Some(gender.to_string()),
        location: Some(location.to_string()),
        size: Some(size.to_string()),
        previous_purchases: Some(previous),
        purchase_frequency: Some(frequency.to_string()),
        subscription_status: Some(subscription.to_string()),
    }
}

pub(crate) fn item(row: &ItemRow) -> ItemRecord {
    let &(customer_id, name, category, amount, color, season) = row;
    ItemRecord {
        customer_id,
        item_name: Some(name.to_string()),
        category: Some(category.to_string()),
        purchase_amount: Some(amount),
        color: Some(color.to_string()),
        season: Some(season.to_string()),
    }
}

pub(crate) fn shop() -> Arc<Dataset> {
    let users = USERS.iter().map(user).collect();
    let items = ITEMS.iter().map(item).collect();
    Arc::new(Dataset::new(users, items).unwrap())
}
