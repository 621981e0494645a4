use crate::entities::product_entity as products;
use crate::error::AppResult;
use crate::models::*;
use crate::utils::validate_table_id;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

#[derive(Clone)]
pub struct ProductService {
    pool: DatabaseConnection,
    restaurant_name: String,
}

impl ProductService {
    pub fn new(pool: DatabaseConnection, restaurant_name: impl Into<String>) -> Self {
        Self {
            pool,
            restaurant_name: restaurant_name.into(),
        }
    }

    /// Available products, ordered by category then name
    pub async fn list_available(&self, category: Option<&str>) -> AppResult<Vec<ProductResponse>> {
        let mut query = products::Entity::find().filter(products::Column::Available.eq(true));
        if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
            query = query.filter(products::Column::Category.eq(category));
        }
        let list = query
            .order_by_asc(products::Column::Category)
            .order_by_asc(products::Column::Name)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn menu_for_table(&self, table_id: &str) -> AppResult<MenuResponse> {
        let table_id = validate_table_id(table_id)?;
        let products = self.list_available(None).await?;
        Ok(MenuResponse {
            table_id,
            restaurant_name: self.restaurant_name.clone(),
            categories: group_by_category(products),
        })
    }

    /// Only available products are returned; callers detect missing ids.
    pub async fn find_available_by_ids(&self, ids: &[i64]) -> AppResult<Vec<products::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let list = products::Entity::find()
            .filter(products::Column::Id.is_in(ids.to_vec()))
            .filter(products::Column::Available.eq(true))
            .all(&self.pool)
            .await?;
        Ok(list)
    }
}

/// Groups products by category, keeping the order categories first appear in.
pub fn group_by_category(products: Vec<ProductResponse>) -> Vec<MenuCategory> {
    let mut categories: Vec<MenuCategory> = Vec::new();
    for product in products {
        match categories
            .iter_mut()
            .find(|c| c.category == product.category)
        {
            Some(existing) => existing.products.push(product),
            None => categories.push(MenuCategory {
                category: product.category.clone(),
                products: vec![product],
            }),
        }
    }
    categories
}
