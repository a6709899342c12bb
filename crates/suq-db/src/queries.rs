use crate::Database;
use crate::models::{
    ConversationRow, MessageRow, OrderItemRow, OrderRow, OverviewRow, ProductRow, UserRow,
};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &UserRow) -> Result<()> {
        self.run(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, profile_image, online, listed_products, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    user.id,
                    user.username,
                    user.email,
                    user.profile_image,
                    user.online,
                    user.listed_products,
                    user.created_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Directory listing, newest accounts first. `search` narrows on
    /// username or email, matching the dashboard's search box.
    pub fn list_users(&self, search: Option<&str>) -> Result<Vec<UserRow>> {
        self.run(|conn| {
            let mut sql = String::from(
                "SELECT id, username, email, profile_image, online, listed_products, created_at
                 FROM users",
            );
            let mut params: Vec<String> = Vec::new();

            if let Some(term) = search {
                sql.push_str(" WHERE username LIKE '%'||?1||'%' OR email LIKE '%'||?1||'%'");
                params.push(term.to_string());
            }
            // rowid breaks ties within the same second
            sql.push_str(" ORDER BY created_at DESC, rowid DESC");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(params.iter()), user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.run(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, email, profile_image, online, listed_products, created_at
                 FROM users WHERE id = ?1",
            )?;
            stmt.query_row([id], user_from_row).optional()
        })
    }

    /// Returns false when no such user exists. Messages and orders that
    /// reference the user are left alone.
    pub fn delete_user(&self, id: &str) -> Result<bool> {
        self.run(|conn| {
            let changed = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    // -- Products --

    pub fn insert_product(&self, product: &ProductRow) -> Result<()> {
        self.run(|conn| {
            conn.execute(
                "INSERT INTO products (id, name, price, category, description, images, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    product.id,
                    product.name,
                    product.price,
                    product.category,
                    product.description,
                    product.images,
                    product.created_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Full-row update; created_at is preserved. Returns false when the
    /// product does not exist.
    pub fn update_product(&self, product: &ProductRow) -> Result<bool> {
        self.run(|conn| {
            let changed = conn.execute(
                "UPDATE products
                 SET name = ?2, price = ?3, category = ?4, description = ?5, images = ?6
                 WHERE id = ?1",
                rusqlite::params![
                    product.id,
                    product.name,
                    product.price,
                    product.category,
                    product.description,
                    product.images,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Removes the listing only. Order line items keep their snapshot of the
    /// product's name and price.
    pub fn delete_product(&self, id: &str) -> Result<bool> {
        self.run(|conn| {
            let changed = conn.execute("DELETE FROM products WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    pub fn get_product(&self, id: &str) -> Result<Option<ProductRow>> {
        self.run(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, price, category, description, images, created_at
                 FROM products WHERE id = ?1",
            )?;
            stmt.query_row([id], product_from_row).optional()
        })
    }

    pub fn list_products(&self, search: Option<&str>, category: Option<&str>) -> Result<Vec<ProductRow>> {
        self.run(|conn| {
            let mut sql = String::from(
                "SELECT id, name, price, category, description, images, created_at FROM products",
            );
            let mut clauses: Vec<String> = Vec::new();
            let mut params: Vec<String> = Vec::new();

            if let Some(term) = search {
                params.push(term.to_string());
                clauses.push(format!(
                    "(name LIKE '%'||?{n}||'%' OR description LIKE '%'||?{n}||'%')",
                    n = params.len()
                ));
            }
            if let Some(cat) = category {
                params.push(cat.to_string());
                clauses.push(format!("category = ?{}", params.len()));
            }
            if !clauses.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&clauses.join(" AND "));
            }
            sql.push_str(" ORDER BY created_at DESC, rowid DESC");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(params.iter()), product_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Orders --

    pub fn insert_order(&self, order: &OrderRow, items: &[OrderItemRow]) -> Result<()> {
        self.run(|conn| {
            conn.execute(
                "INSERT INTO orders (id, customer_name, customer_email, customer_phone,
                                     customer_address, customer_city, payment_proof,
                                     total_amount, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                rusqlite::params![
                    order.id,
                    order.customer_name,
                    order.customer_email,
                    order.customer_phone,
                    order.customer_address,
                    order.customer_city,
                    order.payment_proof,
                    order.total_amount,
                    order.status,
                    order.created_at,
                ],
            )?;
            for item in items {
                conn.execute(
                    "INSERT INTO order_items (order_id, product_id, name, quantity, price)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    rusqlite::params![order.id, item.product_id, item.name, item.quantity, item.price],
                )?;
            }
            Ok(())
        })
    }

    /// Newest orders first, capped at 100 like the dashboard's source query.
    /// `search` narrows on customer name or order id.
    pub fn list_orders(&self, search: Option<&str>, status: Option<&str>) -> Result<Vec<OrderRow>> {
        self.run(|conn| {
            let mut sql = String::from(
                "SELECT id, customer_name, customer_email, customer_phone, customer_address,
                        customer_city, payment_proof, total_amount, status, created_at
                 FROM orders",
            );
            let mut clauses: Vec<String> = Vec::new();
            let mut params: Vec<String> = Vec::new();

            if let Some(term) = search {
                params.push(term.to_string());
                clauses.push(format!(
                    "(customer_name LIKE '%'||?{n}||'%' OR id LIKE '%'||?{n}||'%')",
                    n = params.len()
                ));
            }
            if let Some(status) = status {
                params.push(status.to_string());
                clauses.push(format!("status = ?{}", params.len()));
            }
            if !clauses.is_empty() {
                sql.push_str(" WHERE ");
                sql.push_str(&clauses.join(" AND "));
            }
            sql.push_str(" ORDER BY created_at DESC, rowid DESC LIMIT 100");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(params.iter()), order_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_order(&self, id: &str) -> Result<Option<OrderRow>> {
        self.run(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, customer_name, customer_email, customer_phone, customer_address,
                        customer_city, payment_proof, total_amount, status, created_at
                 FROM orders WHERE id = ?1",
            )?;
            stmt.query_row([id], order_from_row).optional()
        })
    }

    /// Batch-fetch line items for a set of order IDs.
    pub fn get_items_for_orders(&self, order_ids: &[String]) -> Result<Vec<OrderItemRow>> {
        if order_ids.is_empty() {
            return Ok(vec![]);
        }

        self.run(|conn| {
            let placeholders: Vec<String> = (1..=order_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "SELECT order_id, product_id, name, quantity, price FROM order_items
                 WHERE order_id IN ({}) ORDER BY id",
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn rusqlite::types::ToSql> = order_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();

            let rows = stmt
                .query_map(params.as_slice(), |row| {
                    Ok(OrderItemRow {
                        order_id: row.get(0)?,
                        product_id: row.get(1)?,
                        name: row.get(2)?,
                        quantity: row.get(3)?,
                        price: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Sets the order status. Writing the current status again is a no-op
    /// that still succeeds; only a missing order returns false.
    pub fn set_order_status(&self, id: &str, status: &str) -> Result<bool> {
        self.run(|conn| {
            let changed = conn.execute(
                "UPDATE orders SET status = ?2 WHERE id = ?1",
                rusqlite::params![id, status],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Messages --

    pub fn insert_message(&self, message: &MessageRow) -> Result<()> {
        self.run(|conn| {
            conn.execute(
                "INSERT INTO messages (id, sender_id, receiver_id, sender_email, body, image_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    message.id,
                    message.sender_id,
                    message.receiver_id,
                    message.sender_email,
                    message.body,
                    message.image_url,
                    message.created_at,
                ],
            )?;
            Ok(())
        })
    }

    /// All messages exchanged between exactly this pair of participants, in
    /// creation order. The pair predicate runs in the store rather than over
    /// a fetch-everything scan.
    pub fn get_conversation(&self, a: &str, b: &str) -> Result<Vec<MessageRow>> {
        self.run(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sender_id, receiver_id, sender_email, body, image_url, created_at
                 FROM messages
                 WHERE (sender_id = ?1 AND receiver_id = ?2)
                    OR (sender_id = ?2 AND receiver_id = ?1)
                 ORDER BY created_at ASC, rowid ASC",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![a, b], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// One row per chat peer of `admin`, carrying the latest message in that
    /// conversation, most recently active first. SQLite's bare-column rule
    /// makes body and image_url come from the row holding MAX(created_at).
    pub fn list_conversations(&self, admin: &str) -> Result<Vec<ConversationRow>> {
        self.run(|conn| {
            let mut stmt = conn.prepare(
                "SELECT CASE WHEN sender_id = ?1 THEN receiver_id ELSE sender_id END AS peer_id,
                        body, image_url, MAX(created_at) AS created_at
                 FROM messages
                 WHERE sender_id = ?1 OR receiver_id = ?1
                 GROUP BY peer_id
                 ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([admin], |row| {
                    Ok(ConversationRow {
                        peer_id: row.get(0)?,
                        last_body: row.get(1)?,
                        last_image_url: row.get(2)?,
                        last_created_at: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Analytics --

    pub fn user_creation_dates(&self) -> Result<Vec<String>> {
        self.run(|conn| creation_dates(conn, "SELECT created_at FROM users"))
    }

    pub fn product_creation_dates(&self) -> Result<Vec<String>> {
        self.run(|conn| creation_dates(conn, "SELECT created_at FROM products"))
    }

    pub fn order_creation_dates(&self) -> Result<Vec<String>> {
        self.run(|conn| creation_dates(conn, "SELECT created_at FROM orders"))
    }

    pub fn overview(&self) -> Result<OverviewRow> {
        self.run(|conn| {
            let (total_revenue, total_orders): (f64, i64) = conn.query_row(
                "SELECT COALESCE(SUM(total_amount), 0), COUNT(*) FROM orders",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            let total_products: i64 =
                conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
            let (active_listers, new_users_this_month): (i64, i64) = conn.query_row(
                "SELECT
                    COUNT(CASE WHEN listed_products > 0 THEN 1 END),
                    COUNT(CASE WHEN created_at >= datetime('now', '-1 month') THEN 1 END)
                 FROM users",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            Ok(OverviewRow {
                total_revenue,
                total_orders,
                total_products,
                active_listers,
                new_users_this_month,
            })
        })
    }

    pub fn category_counts(&self) -> Result<Vec<(String, i64)>> {
        self.run(|conn| {
            let mut stmt = conn.prepare(
                "SELECT category, COUNT(*) FROM products GROUP BY category ORDER BY COUNT(*) DESC",
            )?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn creation_dates(conn: &Connection, sql: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn user_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<UserRow, rusqlite::Error> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        profile_image: row.get(3)?,
        online: row.get(4)?,
        listed_products: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn product_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<ProductRow, rusqlite::Error> {
    Ok(ProductRow {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        category: row.get(3)?,
        description: row.get(4)?,
        images: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn order_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<OrderRow, rusqlite::Error> {
    Ok(OrderRow {
        id: row.get(0)?,
        customer_name: row.get(1)?,
        customer_email: row.get(2)?,
        customer_phone: row.get(3)?,
        customer_address: row.get(4)?,
        customer_city: row.get(5)?,
        payment_proof: row.get(6)?,
        total_amount: row.get(7)?,
        status: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn message_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<MessageRow, rusqlite::Error> {
    Ok(MessageRow {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        receiver_id: row.get(2)?,
        sender_email: row.get(3)?,
        body: row.get(4)?,
        image_url: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn open_db(dir: &tempfile::TempDir) -> Database {
        Database::open(&dir.path().join("suq.db")).unwrap()
    }

    fn user(id: &str, username: &str, listed: i64, created_at: &str) -> UserRow {
        UserRow {
            id: id.into(),
            username: username.into(),
            email: format!("{username}@example.com"),
            profile_image: String::new(),
            online: false,
            listed_products: listed,
            created_at: created_at.into(),
        }
    }

    fn message(id: &str, sender: &str, receiver: &str, body: &str, created_at: &str) -> MessageRow {
        MessageRow {
            id: id.into(),
            sender_id: sender.into(),
            receiver_id: receiver.into(),
            sender_email: String::new(),
            body: body.into(),
            image_url: None,
            created_at: created_at.into(),
        }
    }

    fn product(id: &str, name: &str, category: &str, created_at: &str) -> ProductRow {
        ProductRow {
            id: id.into(),
            name: name.into(),
            price: 1200.0,
            category: category.into(),
            description: String::new(),
            images: "[]".into(),
            created_at: created_at.into(),
        }
    }

    fn order(id: &str, customer: &str, amount: f64, created_at: &str) -> OrderRow {
        OrderRow {
            id: id.into(),
            customer_name: customer.into(),
            customer_email: String::new(),
            customer_phone: String::new(),
            customer_address: String::new(),
            customer_city: String::new(),
            payment_proof: None,
            total_amount: amount,
            status: "Review".into(),
            created_at: created_at.into(),
        }
    }

    #[test]
    fn conversation_is_pair_scoped_and_ascending() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        db.insert_message(&message("m1", "admin", "bob", "hi bob", "2026-08-01 09:00:00")).unwrap();
        db.insert_message(&message("m2", "bob", "admin", "hello", "2026-08-01 09:01:00")).unwrap();
        db.insert_message(&message("m3", "admin", "carol", "hi carol", "2026-08-01 09:02:00")).unwrap();
        db.insert_message(&message("m4", "carol", "bob", "unrelated", "2026-08-01 09:03:00")).unwrap();
        db.insert_message(&message("m5", "admin", "bob", "still there?", "2026-08-01 09:04:00")).unwrap();

        let rows = db.get_conversation("admin", "bob").unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m5"]);

        // Symmetric: argument order does not change the result.
        let rows = db.get_conversation("bob", "admin").unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn conversation_list_carries_latest_message_per_peer() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        db.insert_message(&message("m1", "admin", "bob", "hi bob", "2026-08-01 09:00:00")).unwrap();
        db.insert_message(&message("m2", "carol", "admin", "hello", "2026-08-01 09:05:00")).unwrap();
        db.insert_message(&message("m3", "bob", "admin", "hey", "2026-08-01 09:10:00")).unwrap();
        db.insert_message(&message("m4", "carol", "dave", "unrelated", "2026-08-01 09:15:00")).unwrap();

        let sidebar = db.list_conversations("admin").unwrap();
        assert_eq!(sidebar.len(), 2);
        // Most recently active first, each with its latest message.
        assert_eq!(sidebar[0].peer_id, "bob");
        assert_eq!(sidebar[0].last_body, "hey");
        assert_eq!(sidebar[1].peer_id, "carol");
        assert_eq!(sidebar[1].last_body, "hello");
    }

    #[test]
    fn order_status_update_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        db.insert_order(&order("o1", "Abebe", 4500.0, "2026-08-01 10:00:00"), &[]).unwrap();

        assert!(db.set_order_status("o1", "Delivered").unwrap());
        // Writing the same value again still reports success.
        assert!(db.set_order_status("o1", "Delivered").unwrap());
        assert_eq!(db.get_order("o1").unwrap().unwrap().status, "Delivered");

        assert!(!db.set_order_status("missing", "Pending").unwrap());
    }

    #[test]
    fn product_delete_keeps_order_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        db.insert_product(&product("p1", "sofa bed", "አልጋ", "2026-08-01 08:00:00")).unwrap();
        let items = vec![OrderItemRow {
            order_id: "o1".into(),
            product_id: "p1".into(),
            name: "sofa bed".into(),
            quantity: 2,
            price: 1200.0,
        }];
        db.insert_order(&order("o1", "Abebe", 2400.0, "2026-08-01 10:00:00"), &items).unwrap();

        assert!(db.delete_product("p1").unwrap());
        assert!(db.get_product("p1").unwrap().is_none());

        let kept = db.get_items_for_orders(&["o1".to_string()]).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "sofa bed");
        assert_eq!(kept[0].product_id, "p1");
    }

    #[test]
    fn user_delete_does_not_cascade_to_messages() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        db.create_user(&user("bob", "bob", 0, "2026-08-01 08:00:00")).unwrap();
        db.insert_message(&message("m1", "admin", "bob", "hi", "2026-08-01 09:00:00")).unwrap();

        assert!(db.get_user_by_id("bob").unwrap().is_some());
        assert!(db.delete_user("bob").unwrap());
        assert!(db.get_user_by_id("bob").unwrap().is_none());
        assert!(!db.delete_user("bob").unwrap());
        assert_eq!(db.get_conversation("admin", "bob").unwrap().len(), 1);
    }

    #[test]
    fn list_products_filters_by_category_and_search() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        db.insert_product(&product("p1", "queen bed", "አልጋ", "2026-08-01 08:00:00")).unwrap();
        db.insert_product(&product("p2", "corner buffet", "ቡፌ", "2026-08-02 08:00:00")).unwrap();
        db.insert_product(&product("p3", "king bed", "አልጋ", "2026-08-03 08:00:00")).unwrap();

        let beds = db.list_products(None, Some("አልጋ")).unwrap();
        assert_eq!(beds.len(), 2);
        // newest first
        assert_eq!(beds[0].id, "p3");

        let kings = db.list_products(Some("king"), Some("አልጋ")).unwrap();
        assert_eq!(kings.len(), 1);
        assert_eq!(kings[0].id, "p3");

        assert!(db.list_products(Some("wardrobe"), None).unwrap().is_empty());
    }

    #[test]
    fn list_users_searches_name_and_email() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        db.create_user(&user("u1", "abebe", 3, "2026-08-01 08:00:00")).unwrap();
        db.create_user(&user("u2", "kebede", 0, "2026-08-02 08:00:00")).unwrap();

        let all = db.list_users(None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "u2");

        let hits = db.list_users(Some("abebe@")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "u1");
    }

    #[test]
    fn overview_counts_revenue_and_listers() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(&dir);

        db.create_user(&user("u1", "abebe", 3, "2020-01-01 08:00:00")).unwrap();
        db.create_user(&user("u2", "kebede", 0, "2020-01-02 08:00:00")).unwrap();
        db.insert_product(&product("p1", "queen bed", "አልጋ", "2020-01-03 08:00:00")).unwrap();
        db.insert_order(&order("o1", "Abebe", 4500.0, "2020-01-04 10:00:00"), &[]).unwrap();
        db.insert_order(&order("o2", "Kebede", 500.0, "2020-01-05 10:00:00"), &[]).unwrap();

        let overview = db.overview().unwrap();
        assert_eq!(overview.total_revenue, 5000.0);
        assert_eq!(overview.total_orders, 2);
        assert_eq!(overview.total_products, 1);
        assert_eq!(overview.active_listers, 1);
        assert_eq!(overview.new_users_this_month, 0);

        let categories = db.category_counts().unwrap();
        assert_eq!(categories, vec![("አልጋ".to_string(), 1)]);
    }
}
