//! In-memory SQLite store with the production migrations applied.

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

/// Test database wrapper.
///
/// Every instance is a fresh private in-memory database. The pool holds a
/// single connection because each SQLite in-memory connection is its own
/// database.
pub struct TestDatabase {
    pub connection: DatabaseConnection,
}

impl TestDatabase {
    /// Fresh database with the schema and the three seed products
    ///
    /// ```ignore
    /// use test_utils::TestDatabase;
    ///
    /// # async fn example() {
    /// let db = TestDatabase::new().await;
    /// let repo = SomeRepository::new(db.connection());
    /// # }
    /// ```
    pub async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let connection = Database::connect(options)
            .await
            .expect("Failed to open in-memory SQLite database");

        Migrator::up(&connection, None)
            .await
            .expect("Failed to apply migrations");

        tracing::debug!("Test database ready");

        Self { connection }
    }

    /// Fresh database with the schema but no rows
    pub async fn empty() -> Self {
        let db = Self::new().await;
        db.execute("DELETE FROM products").await;
        db
    }

    /// Cloned pool handle, for repositories and factories
    pub fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Insert a product row directly, bypassing the repository layer
    pub async fn insert_product(&self, id: i32, name: &str, price: &str, is_available: bool) {
        let sql = format!(
            "INSERT INTO products (id, name, description, price, is_available) \
             VALUES ({id}, '{name}', 'Description of {name}', {price}, {is_available})",
            name = name.replace('\'', "''"),
            is_available = if is_available { "TRUE" } else { "FALSE" },
        );
        self.execute(&sql).await;
    }

    pub async fn execute(&self, sql: &str) {
        self.connection
            .execute_unprepared(sql)
            .await
            .unwrap_or_else(|e| panic!("Failed to execute `{sql}`: {e}"));
    }

    pub async fn count_products(&self) -> i64 {
        let row = self
            .connection
            .query_one_raw(sea_orm::Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT COUNT(*) FROM products",
            ))
            .await
            .expect("Failed to count products")
            .expect("COUNT(*) returned no row");

        row.try_get_by_index(0).expect("COUNT(*) was not an integer")
    }
}
