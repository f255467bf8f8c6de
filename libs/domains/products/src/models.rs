use database::Identifiable;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Largest price magnitude a `decimal(18, 2)` column holds, exclusive
const PRICE_LIMIT: i64 = 10_000_000_000_000_000;

/// Catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 19.99)]
    pub price: Decimal,
    pub is_available: bool,
}

impl Identifiable for Product {
    type Id = i32;

    fn id(&self) -> i32 {
        self.id
    }
}

/// Body of create and update requests.
///
/// `id` is optional on create (store-assigned when absent) and ignored on
/// update, where the route decides.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 19.99)]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
    #[serde(default)]
    pub is_available: bool,
}

impl ProductInput {
    /// The full record this input describes under `id`
    pub fn into_product(self, id: i32) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            is_available: self.is_available,
        }
    }
}

/// At most two fractional digits and sixteen integer digits
fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.normalize().scale() > 2 {
        return Err(ValidationError::new("precision")
            .with_message("price must have at most two decimal places".into()));
    }
    if price.abs() >= Decimal::from(PRICE_LIMIT) {
        return Err(ValidationError::new("range")
            .with_message("price must have at most sixteen integer digits".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(price: serde_json::Value) -> ProductInput {
        serde_json::from_value(json!({
            "name": "Desk lamp",
            "description": "Adjustable arm",
            "price": price,
        }))
        .unwrap()
    }

    #[test]
    fn test_product_serializes_camel_case_with_numeric_price() {
        let product = Product {
            id: 1,
            name: "Product 1".into(),
            description: "Description 1".into(),
            price: Decimal::new(1050, 2),
            is_available: true,
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["isAvailable"], json!(true));
        assert_eq!(value["price"], json!(10.5));
        assert!(value.get("is_available").is_none());
    }

    #[test]
    fn test_input_defaults() {
        let parsed = input(json!(12.5));
        assert_eq!(parsed.id, None);
        assert!(!parsed.is_available);
        assert_eq!(parsed.price, Decimal::new(125, 1));
    }

    #[test]
    fn test_price_precision() {
        assert!(input(json!(19.99)).validate().is_ok());
        assert!(input(json!(10)).validate().is_ok());

        let err = input(json!(1.234)).validate().unwrap_err();
        assert!(err.field_errors().contains_key("price"));
    }

    #[test]
    fn test_price_magnitude() {
        assert!(input(json!(1e17)).validate().is_err());
        assert!(input(json!(-1e17)).validate().is_err());
    }

    #[test]
    fn test_into_product_uses_given_id() {
        let mut parsed = input(json!(5));
        parsed.id = Some(99);

        let product = parsed.into_product(7);
        assert_eq!(product.id, 7);
        assert_eq!(product.name, "Desk lamp");
    }
}
