use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id               TEXT PRIMARY KEY,
            username         TEXT NOT NULL,
            email            TEXT NOT NULL,
            profile_image    TEXT NOT NULL DEFAULT '',
            online           INTEGER NOT NULL DEFAULT 0,
            listed_products  INTEGER NOT NULL DEFAULT 0,
            created_at       TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS products (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            price       REAL NOT NULL,
            category    TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            images      TEXT NOT NULL DEFAULT '[]',
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS orders (
            id                TEXT PRIMARY KEY,
            customer_name     TEXT NOT NULL,
            customer_email    TEXT NOT NULL DEFAULT '',
            customer_phone    TEXT NOT NULL DEFAULT '',
            customer_address  TEXT NOT NULL DEFAULT '',
            customer_city     TEXT NOT NULL DEFAULT '',
            payment_proof     TEXT,
            total_amount      REAL NOT NULL DEFAULT 0,
            status            TEXT NOT NULL DEFAULT 'Review',
            created_at        TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Line items are order-time snapshots. product_id is deliberately not
        -- a foreign key: deleting a product must not touch past orders.
        CREATE TABLE IF NOT EXISTS order_items (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id    TEXT NOT NULL REFERENCES orders(id),
            product_id  TEXT NOT NULL,
            name        TEXT NOT NULL,
            quantity    INTEGER NOT NULL,
            price       REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_order_items_order
            ON order_items(order_id);

        -- Messages reference users by id only; user deletion must not
        -- cascade here either.
        CREATE TABLE IF NOT EXISTS messages (
            id            TEXT PRIMARY KEY,
            sender_id     TEXT NOT NULL,
            receiver_id   TEXT NOT NULL,
            sender_email  TEXT NOT NULL DEFAULT '',
            body          TEXT NOT NULL DEFAULT '',
            image_url     TEXT,
            created_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_messages_pair
            ON messages(sender_id, receiver_id, created_at);

        CREATE INDEX IF NOT EXISTS idx_orders_created
            ON orders(created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
