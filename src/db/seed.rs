//! Demo e-commerce database: schema and deterministic synthetic data
//!
//! DDL and population for the bundled dataset the CLI runs against when no
//! database file is given. Values are derived from row ids with fixed pools
//! and formulas, so every build produces byte-identical data and read
//! queries stay reproducible across runs.

use crate::error::{Result, SqlScoutError};
use chrono::{Duration, NaiveDate};
use rusqlite::{params, Connection};

/// SQL to create the `members` table.
pub const CREATE_MEMBERS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS members (
        member_id INTEGER PRIMARY KEY,
        member_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        join_date DATETIME NOT NULL,
        member_level TEXT NOT NULL,
        referrer_id INTEGER REFERENCES members(member_id),
        gender TEXT NOT NULL,
        birth_year INTEGER NOT NULL,
        country TEXT NOT NULL,
        is_active BOOLEAN NOT NULL
    );
";

/// SQL to create the `items` table.
pub const CREATE_ITEMS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS items (
        item_id INTEGER PRIMARY KEY,
        item_name TEXT NOT NULL,
        category TEXT NOT NULL,
        subcategory TEXT NOT NULL,
        brand TEXT NOT NULL,
        price REAL NOT NULL,
        stock_quantity INTEGER NOT NULL,
        rating REAL NOT NULL,
        is_active BOOLEAN NOT NULL,
        created_at DATETIME NOT NULL
    );
";

/// SQL to create the `campaigns` table.
pub const CREATE_CAMPAIGNS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS campaigns (
        campaign_id INTEGER PRIMARY KEY,
        campaign_name TEXT NOT NULL,
        start_date DATETIME NOT NULL,
        end_date DATETIME NOT NULL,
        discount_rate REAL NOT NULL,
        channel TEXT NOT NULL,
        description TEXT NOT NULL
    );
";

/// SQL to create the `transactions` table.
pub const CREATE_TRANSACTIONS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS transactions (
        transaction_id INTEGER PRIMARY KEY,
        member_id INTEGER NOT NULL REFERENCES members(member_id),
        campaign_id INTEGER REFERENCES campaigns(campaign_id),
        discount_rate REAL NOT NULL,
        final_price REAL NOT NULL,
        payment_method TEXT NOT NULL,
        transaction_time DATETIME NOT NULL
    );
";

/// SQL to create the `transaction_items` table.
pub const CREATE_TRANSACTION_ITEMS_TABLE_SQL: &str = "
    CREATE TABLE IF NOT EXISTS transaction_items (
        transaction_id INTEGER NOT NULL REFERENCES transactions(transaction_id),
        item_id INTEGER NOT NULL REFERENCES items(item_id),
        quantity INTEGER NOT NULL,
        unit_price REAL NOT NULL,
        PRIMARY KEY (transaction_id, item_id)
    );
";

/// All schema creation statements, in dependency order.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    CREATE_MEMBERS_TABLE_SQL,
    CREATE_ITEMS_TABLE_SQL,
    CREATE_CAMPAIGNS_TABLE_SQL,
    CREATE_TRANSACTIONS_TABLE_SQL,
    CREATE_TRANSACTION_ITEMS_TABLE_SQL,
];

const NUM_MEMBERS: i64 = 40;
const NUM_ITEMS: i64 = 24;
const NUM_CAMPAIGNS: i64 = 5;
const NUM_TRANSACTIONS: i64 = 120;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Chiara", "Daniel", "Elena", "Felix", "Grace", "Hiro", "Ines", "Jonas",
    "Keiko", "Liam", "Mei", "Noah", "Olga", "Pedro", "Quinn", "Rosa", "Sven", "Tara",
];
const LAST_NAMES: &[&str] = &[
    "Anders", "Baker", "Chen", "Diaz", "Evans", "Fischer", "Garcia", "Huang", "Ito", "Jones",
];
const LEVELS: &[&str] = &["Bronze", "Silver", "Gold", "Platinum"];
const GENDERS: &[&str] = &["Male", "Female", "Unknown"];
const COUNTRIES: &[&str] = &["Taiwan", "Japan", "Korea", "USA"];
const PAYMENT_METHODS: &[&str] = &["CreditCard", "PayPal", "ATM", "LinePay"];
const CHANNELS: &[&str] = &["App", "Website", "Email", "Social Media"];

/// (category, subcategories, brands)
const CATEGORIES: &[(&str, &[&str], &[&str])] = &[
    (
        "Electronics",
        &["Laptop", "Smartphone", "Headphones", "Tablet"],
        &["Apple", "Samsung", "Sony", "ASUS"],
    ),
    (
        "Apparel",
        &["T-Shirt", "Jeans", "Sneakers", "Jacket"],
        &["Nike", "Adidas", "Uniqlo", "Levi's"],
    ),
    (
        "Home & Kitchen",
        &["Sofa", "Dining Table", "Cookware Set", "Lamp"],
        &["IKEA", "Philips", "Tefal", "Panasonic"],
    ),
    (
        "Sports & Outdoors",
        &["Backpack", "Running Shoes", "Yoga Mat", "Bicycle"],
        &["Nike", "Adidas", "Decathlon", "Giant"],
    ),
];

fn pick<'a>(pool: &'a [&'a str], seed: i64) -> &'a str {
    pool[(seed.unsigned_abs() as usize) % pool.len()]
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid base date")
}

fn timestamp(days: i64, hour: i64) -> String {
    let date = base_date() + Duration::days(days);
    format!("{} {:02}:00:00", date, hour % 24)
}

/// Create all demo tables
pub fn create_schema(conn: &Connection) -> Result<()> {
    for ddl in ALL_TABLE_CREATION_SQL {
        conn.execute_batch(ddl)
            .map_err(|e| SqlScoutError::Infrastructure(format!("schema creation failed: {}", e)))?;
    }
    log::info!("Demo schema created ({} tables)", ALL_TABLE_CREATION_SQL.len());
    Ok(())
}

/// Populate all demo tables in one transaction
pub fn populate(conn: &mut Connection) -> Result<()> {
    let tx = conn
        .transaction()
        .map_err(|e| SqlScoutError::Infrastructure(format!("failed to begin seed: {}", e)))?;

    insert_members(&tx)?;
    insert_items(&tx)?;
    insert_campaigns(&tx)?;
    insert_transactions(&tx)?;

    tx.commit()
        .map_err(|e| SqlScoutError::Infrastructure(format!("failed to commit seed: {}", e)))?;

    log::info!(
        "Demo data seeded: {} members, {} items, {} campaigns, {} transactions",
        NUM_MEMBERS,
        NUM_ITEMS,
        NUM_CAMPAIGNS,
        NUM_TRANSACTIONS
    );
    Ok(())
}

fn insert_members(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO members (member_id, member_name, email, join_date, member_level,
         referrer_id, gender, birth_year, country, is_active)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )?;

    for i in 1..=NUM_MEMBERS {
        let name = format!("{} {}", pick(FIRST_NAMES, i), pick(LAST_NAMES, i * 3));
        let referrer = if i > 4 && i % 3 == 0 { Some(i / 2) } else { None };
        stmt.execute(params![
            i,
            name,
            format!("member{}@example.com", i),
            timestamp(i * 7, i),
            pick(LEVELS, i),
            referrer,
            pick(GENDERS, i * 5),
            1960 + (i * 7) % 47,
            pick(COUNTRIES, i * 11),
            i % 5 != 0,
        ])?;
    }
    Ok(())
}

fn insert_items(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO items (item_id, item_name, category, subcategory, brand, price,
         stock_quantity, rating, is_active, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )?;

    for i in 1..=NUM_ITEMS {
        let (category, subcategories, brands) =
            CATEGORIES[(i.unsigned_abs() as usize) % CATEGORIES.len()];
        let subcategory = pick(subcategories, i * 3);
        let brand = pick(brands, i * 7);
        stmt.execute(params![
            i,
            format!("{} {} {}", brand, subcategory, i),
            category,
            subcategory,
            brand,
            (10 + (i * 83) % 1990) as f64 + 0.99,
            (i * 37) % 500,
            1.0 + ((i * 3) % 9) as f64 * 0.5,
            i % 4 != 0,
            timestamp(i * 11, i * 2),
        ])?;
    }
    Ok(())
}

fn insert_campaigns(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO campaigns (campaign_id, campaign_name, start_date, end_date,
         discount_rate, channel, description)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )?;

    for i in 1..=NUM_CAMPAIGNS {
        let start = i * 50;
        stmt.execute(params![
            i,
            format!("{} Sale", pick(&["Spring", "Summer", "Autumn", "Winter", "Anniversary"], i - 1)),
            timestamp(start, 0),
            timestamp(start + 14 + i, 0),
            campaign_discount(i),
            pick(CHANNELS, i),
            format!("Seasonal promotion number {} with sitewide discounts.", i),
        ])?;
    }
    Ok(())
}

fn campaign_discount(campaign_id: i64) -> f64 {
    5.0 + (campaign_id * 5) as f64
}

fn item_price(item_id: i64) -> f64 {
    (10 + (item_id * 83) % 1990) as f64 + 0.99
}

fn insert_transactions(conn: &Connection) -> Result<()> {
    let mut tx_stmt = conn.prepare(
        "INSERT INTO transactions (transaction_id, member_id, campaign_id, discount_rate,
         final_price, payment_method, transaction_time)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )?;
    let mut line_stmt = conn.prepare(
        "INSERT INTO transaction_items (transaction_id, item_id, quantity, unit_price)
         VALUES (?, ?, ?, ?)",
    )?;

    for i in 1..=NUM_TRANSACTIONS {
        let member_id = 1 + (i * 17) % NUM_MEMBERS;
        let campaign_id = if i % 3 == 0 { Some(1 + i % NUM_CAMPAIGNS) } else { None };
        let discount = campaign_id.map(campaign_discount).unwrap_or(0.0);

        let line_count = 1 + i % 3;
        let mut total = 0.0;
        let mut lines = Vec::new();
        for line in 0..line_count {
            let item_id = 1 + (i * 13 + line * 7) % NUM_ITEMS;
            // One line item per distinct item; skip collisions
            if lines.iter().any(|(id, _, _)| *id == item_id) {
                continue;
            }
            let quantity = 1 + (i + line) % 5;
            let unit_price = item_price(item_id);
            total += unit_price * quantity as f64;
            lines.push((item_id, quantity, unit_price));
        }

        let final_price = (total * (100.0 - discount) / 100.0 * 100.0).round() / 100.0;

        tx_stmt.execute(params![
            i,
            member_id,
            campaign_id,
            discount,
            final_price,
            pick(PAYMENT_METHODS, i * 7),
            timestamp(300 + i * 2, i * 3),
        ])?;

        for (item_id, quantity, unit_price) in lines {
            line_stmt.execute(params![i, item_id, quantity, unit_price])?;
        }
    }
    Ok(())
}
