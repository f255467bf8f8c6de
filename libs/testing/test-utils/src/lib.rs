//! Shared test utilities for the product catalog crates
//!
//! - `TestDatabase`: in-memory SQLite with the real migrations applied
//! - `TestDataBuilder`: deterministic test data
//! - `assertions`: small assertion helpers
//!
//! ```rust,ignore
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let db = TestDatabase::empty().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let name = builder.name("product", "main");
//!     let price = builder.price();
//! }
//! ```

mod database;

pub use database::TestDatabase;

use rust_decimal::Decimal;

/// Builder for test data with deterministic randomization
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed derived from the test name, so each test gets stable, distinct data
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// `test-{prefix}-{seed}-{suffix}`
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let name = TestDataBuilder::new(7).name("product", "main");
    /// assert_eq!(name, "test-product-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Price between 0.25 and 100.00 in steps of 0.25, exact in binary floating point
    pub fn price(&self) -> Decimal {
        let quarters = (self.seed % 400) as i64 + 1;
        Decimal::new(quarters * 25, 2)
    }
}

pub mod assertions {
    /// Unwrap an option with a contextual panic message
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert the ids of `items` match `expected`, in order
    pub fn assert_ids<T, K, F>(items: &[T], expected: &[K], id: F)
    where
        K: PartialEq + std::fmt::Debug,
        F: Fn(&T) -> K,
    {
        let actual: Vec<K> = items.iter().map(id).collect();
        assert_eq!(actual, expected, "unexpected ids");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let first = TestDataBuilder::new(42);
        let second = TestDataBuilder::new(42);

        assert_eq!(first.name("product", "a"), second.name("product", "a"));
        assert_eq!(first.price(), second.price());
    }

    #[test]
    fn test_data_builder_different_names() {
        let first = TestDataBuilder::from_test_name("test1");
        let second = TestDataBuilder::from_test_name("test2");

        assert_ne!(first.name("product", "a"), second.name("product", "a"));
    }

    #[test]
    fn test_price_range_and_scale() {
        for seed in [0, 1, 399, 400, u64::MAX] {
            let price = TestDataBuilder::new(seed).price();
            assert!(price >= Decimal::new(25, 2));
            assert!(price <= Decimal::new(10000, 2));
            assert!(price.scale() <= 2);
        }
    }
}
