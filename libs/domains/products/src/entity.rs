use database::Identifiable;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};

use crate::models::{Product, ProductInput};

/// Sea-ORM Entity for the products table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub price: Decimal,
    pub is_available: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Identifiable for Model {
    type Id = i32;

    fn id(&self) -> i32 {
        self.id
    }
}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            is_available: model.is_available,
        }
    }
}

// Insert: an absent id is left to the store
impl From<ProductInput> for ActiveModel {
    fn from(input: ProductInput) -> Self {
        ActiveModel {
            id: input.id.map_or(NotSet, Set),
            name: Set(input.name),
            description: Set(input.description),
            price: Set(input.price),
            is_available: Set(input.is_available),
        }
    }
}

// Full replace keyed by id
impl From<Product> for ActiveModel {
    fn from(product: Product) -> Self {
        ActiveModel {
            id: Unchanged(product.id),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            is_available: Set(product.is_available),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn input(id: Option<i32>) -> ProductInput {
        ProductInput {
            id,
            name: "Kettle".into(),
            description: "1.7l".into(),
            price: Decimal::new(2999, 2),
            is_available: true,
        }
    }

    #[test]
    fn test_insert_leaves_missing_id_to_store() {
        let model = ActiveModel::from(input(None));
        assert!(matches!(model.id, NotSet));
        assert_eq!(model.name, Set("Kettle".to_string()));
    }

    #[test]
    fn test_insert_keeps_client_id() {
        let model = ActiveModel::from(input(Some(42)));
        assert_eq!(model.id, Set(42));
    }

    #[test]
    fn test_replace_sets_every_column() {
        let model = ActiveModel::from(input(None).into_product(5));
        assert_eq!(model.id, Unchanged(5));
        assert_eq!(model.price, Set(Decimal::new(2999, 2)));
        assert_eq!(model.is_available, Set(true));
    }
}
