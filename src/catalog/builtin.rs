//! Built-in e-commerce schema catalog
//!
//! Table and column descriptions for the bundled demo database: members,
//! items, marketing campaigns, transactions, and transaction line items.

use super::{SchemaCatalog, SchemaEntry};
use crate::error::Result;

/// (table, description, columns: (name, type, description))
type TableDef = (&'static str, &'static str, &'static [ColumnDef]);
type ColumnDef = (&'static str, &'static str, &'static str);

const TABLES: &[TableDef] = &[
    (
        "members",
        "Table that stores information about registered members.",
        &[
            ("member_id", "INTEGER", "Unique identifier for each member"),
            ("member_name", "TEXT", "Member's full name"),
            ("email", "TEXT", "Member's email address"),
            ("join_date", "DATETIME", "Date the member registered"),
            ("member_level", "TEXT", "Membership level (e.g., Bronze, Silver, Gold, Platinum)"),
            ("referrer_id", "INTEGER", "ID of the member who referred this member (nullable)"),
            ("gender", "TEXT", "Member's gender (Male, Female, Unknown)"),
            ("birth_year", "INTEGER", "Year the member was born"),
            ("country", "TEXT", "Country the member belongs to"),
            ("is_active", "BOOLEAN", "Whether the member's account is active"),
        ],
    ),
    (
        "items",
        "Table containing details of all items available for sale.",
        &[
            ("item_id", "INTEGER", "Unique identifier for each item"),
            ("item_name", "TEXT", "Name of the item"),
            ("category", "TEXT", "Primary category of the item"),
            ("subcategory", "TEXT", "Subcategory of the item"),
            ("brand", "TEXT", "Brand of the item (e.g., Apple, Samsung, Nike, Adidas)"),
            ("price", "REAL", "Original price of the item"),
            ("stock_quantity", "INTEGER", "Number of items available for sale"),
            ("rating", "REAL", "Average user rating"),
            ("is_active", "BOOLEAN", "Whether the item is currently listed for sale"),
            ("created_at", "DATETIME", "Time the item was listed"),
        ],
    ),
    (
        "campaigns",
        "Table listing all marketing campaigns and related information.",
        &[
            ("campaign_id", "INTEGER", "Unique identifier for each marketing campaign"),
            ("campaign_name", "TEXT", "Name of the marketing campaign"),
            ("start_date", "DATETIME", "Start date of the campaign"),
            ("end_date", "DATETIME", "End date of the campaign"),
            ("discount_rate", "REAL", "Discount rate offered in the campaign"),
            ("channel", "TEXT", "Promotion channel (e.g., App, Website, Email, Social Media)"),
            ("description", "TEXT", "Detailed description of the campaign"),
        ],
    ),
    (
        "transactions",
        "Table recording each transaction made by members.",
        &[
            ("transaction_id", "INTEGER", "Unique identifier for each transaction"),
            ("member_id", "INTEGER", "Unique ID of the member making the transaction"),
            ("campaign_id", "INTEGER", "Associated marketing campaign for this transaction (nullable)"),
            ("discount_rate", "REAL", "Discount rate used in this transaction (0-100%)"),
            ("final_price", "REAL", "Final price after applying discount"),
            ("payment_method", "TEXT", "Payment method used (e.g., CreditCard, PayPal, ATM, LinePay)"),
            ("transaction_time", "DATETIME", "Time the transaction occurred"),
        ],
    ),
    (
        "transaction_items",
        "Table listing the specific items purchased in each transaction.",
        &[
            ("transaction_id", "INTEGER", "Unique ID of the related main transaction"),
            ("item_id", "INTEGER", "Unique ID of the purchased item"),
            ("quantity", "INTEGER", "Quantity of the purchased item"),
            ("unit_price", "REAL", "Unit price of the item"),
        ],
    ),
];

/// Build the catalog for the bundled e-commerce demo database.
///
/// Each table contributes one table-level entry (so table names themselves
/// are retrievable) followed by one entry per column, in schema order.
pub fn ecommerce_catalog() -> Result<SchemaCatalog> {
    let mut entries = Vec::new();

    for (table, description, columns) in TABLES {
        let column_list = columns
            .iter()
            .map(|(name, _, _)| *name)
            .collect::<Vec<_>>()
            .join(", ");
        entries.push(SchemaEntry::table(table, description, &column_list));

        for (name, data_type, col_description) in *columns {
            entries.push(SchemaEntry::column(name, table, col_description, data_type));
        }
    }

    SchemaCatalog::new(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EntityKind;

    #[test]
    fn test_catalog_shape() {
        let catalog = ecommerce_catalog().unwrap();
        let tables: Vec<_> = catalog
            .entries()
            .iter()
            .filter(|e| e.entity_kind == EntityKind::Table)
            .collect();
        assert_eq!(tables.len(), 5);

        // 10 + 10 + 7 + 7 + 4 column entries
        let columns = catalog.len() - tables.len();
        assert_eq!(columns, 38);
    }

    #[test]
    fn test_transactions_columns_present() {
        let catalog = ecommerce_catalog().unwrap();
        let names: Vec<_> = catalog
            .columns_of("transactions")
            .iter()
            .map(|e| e.entity_name.clone())
            .collect();
        assert!(names.contains(&"final_price".to_string()));
        assert!(names.contains(&"member_id".to_string()));
    }
}
