use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use lossbook_core::errors::{DatabaseError, Error, Result};
use lossbook_core::products::{NewProduct, Product, ProductRepositoryTrait, UnitType};

use crate::convert::{decimal_from_db, decimal_to_db, timestamp_from_db, timestamp_to_db};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::products;

use super::model::ProductDB;

fn to_product(row: ProductDB) -> Result<Product> {
    let unit_type = UnitType::from_db_str(&row.unit_type).ok_or_else(|| {
        Error::Database(DatabaseError::Internal(format!(
            "column products.unit_type holds unknown value '{}'",
            row.unit_type
        )))
    })?;
    Ok(Product {
        code: row.code,
        name: row.name,
        unit_type,
        regular_price: decimal_from_db(&row.regular_price, "products.regular_price")?,
        club_price: row
            .club_price
            .as_deref()
            .map(|v| decimal_from_db(v, "products.club_price"))
            .transpose()?,
        created_at: timestamp_from_db(&row.created_at, "products.created_at")?,
        updated_at: timestamp_from_db(&row.updated_at, "products.updated_at")?,
        deleted_at: row
            .deleted_at
            .as_deref()
            .map(|v| timestamp_from_db(v, "products.deleted_at"))
            .transpose()?,
    })
}

pub struct ProductRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProductRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl ProductRepositoryTrait for ProductRepository {
    fn find_by_code(&self, code: &str) -> Result<Option<Product>> {
        let mut conn = get_connection(&self.pool)?;
        let row = products::table
            .filter(products::code.eq(code))
            .filter(products::deleted_at.is_null())
            .select(ProductDB::as_select())
            .first::<ProductDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(to_product).transpose()
    }

    fn list(&self) -> Result<Vec<Product>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = products::table
            .filter(products::deleted_at.is_null())
            .order(products::name.asc())
            .select(ProductDB::as_select())
            .load::<ProductDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(to_product).collect()
    }

    async fn upsert(&self, product: NewProduct) -> Result<Product> {
        self.writer
            .exec(move |conn| {
                let now = timestamp_to_db(Utc::now());
                let row = ProductDB {
                    code: product.code,
                    name: product.name,
                    unit_type: product.unit_type.as_db_str().to_string(),
                    regular_price: decimal_to_db(product.regular_price),
                    club_price: product.club_price.map(decimal_to_db),
                    created_at: now.clone(),
                    updated_at: now.clone(),
                    deleted_at: None,
                };

                let stored = diesel::insert_into(products::table)
                    .values(&row)
                    .on_conflict(products::code)
                    .do_update()
                    .set((
                        products::name.eq(row.name.clone()),
                        products::unit_type.eq(row.unit_type.clone()),
                        products::regular_price.eq(row.regular_price.clone()),
                        products::club_price.eq(row.club_price.clone()),
                        products::updated_at.eq(now),
                        products::deleted_at.eq(None::<String>),
                    ))
                    .returning(ProductDB::as_returning())
                    .get_result::<ProductDB>(conn)
                    .map_err(StorageError::from)?;
                to_product(stored)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    use crate::db::{create_pool, init, run_migrations, write_actor::spawn_writer};

    fn setup_repo() -> (ProductRepository, Arc<DbPool>) {
        let app_data = tempdir()
            .expect("tempdir")
            .keep()
            .to_string_lossy()
            .to_string();
        let db_path = init(&app_data).expect("init db");
        run_migrations(&db_path).expect("migrate db");
        let pool = create_pool(&db_path).expect("create pool");
        let writer = spawn_writer(pool.as_ref().clone());
        (ProductRepository::new(pool.clone(), writer), pool)
    }

    fn rice() -> NewProduct {
        NewProduct {
            code: "7891234567890".to_string(),
            name: "Rice 5kg".to_string(),
            unit_type: UnitType::Count,
            regular_price: dec!(25.99),
            club_price: Some(dec!(22.99)),
        }
    }

    #[tokio::test]
    async fn upsert_creates_then_updates_by_code() {
        let (repo, _pool) = setup_repo();

        let created = repo.upsert(rice()).await.expect("insert");
        assert_eq!(created.name, "Rice 5kg");
        assert_eq!(created.regular_price, dec!(25.99));

        let mut update = rice();
        update.name = "Rice 5kg premium".to_string();
        update.unit_type = UnitType::Weight;
        update.club_price = None;
        let updated = repo.upsert(update).await.expect("update");

        assert_eq!(updated.name, "Rice 5kg premium");
        assert_eq!(updated.unit_type, UnitType::Weight);
        assert_eq!(updated.club_price, None);
        assert_eq!(repo.list().expect("list").len(), 1);
    }

    #[tokio::test]
    async fn lookup_misses_return_none() {
        let (repo, _pool) = setup_repo();
        assert!(repo.find_by_code("unknown").expect("query").is_none());
    }

    #[tokio::test]
    async fn soft_deleted_products_are_invisible() {
        let (repo, pool) = setup_repo();
        repo.upsert(rice()).await.expect("insert");

        let mut conn = get_connection(&pool).expect("conn");
        diesel::update(products::table.filter(products::code.eq("7891234567890")))
            .set(products::deleted_at.eq(Some(timestamp_to_db(Utc::now()))))
            .execute(&mut conn)
            .expect("soft delete");

        assert!(repo.find_by_code("7891234567890").expect("query").is_none());
        assert!(repo.list().expect("list").is_empty());
    }

    #[tokio::test]
    async fn listing_orders_by_name() {
        let (repo, _pool) = setup_repo();
        let mut beans = rice();
        beans.code = "2".to_string();
        beans.name = "Beans 1kg".to_string();
        repo.upsert(rice()).await.expect("insert");
        repo.upsert(beans).await.expect("insert");

        let names: Vec<String> = repo.list().expect("list").into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Beans 1kg", "Rice 5kg"]);
    }
}
