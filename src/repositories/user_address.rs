use sqlx::PgPool;
use uuid::Uuid;

use super::{RepoError, UserAddressRepository};
use crate::models::{NewAddress, UserAddress};

#[derive(Clone)]
pub struct PgUserAddressRepository {
    pool: PgPool,
}

impl PgUserAddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserAddressRepository for PgUserAddressRepository {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<UserAddress>, RepoError> {
        let addresses = sqlx::query_as::<_, UserAddress>(
            r#"
            SELECT id, user_id, address_type, address_line_1, address_line_2,
                   city, state, zip_code, country, created_at, updated_at
            FROM user_addresses
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(addresses)
    }

    async fn list_by_users(&self, user_ids: &[Uuid]) -> Result<Vec<UserAddress>, RepoError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let addresses = sqlx::query_as::<_, UserAddress>(
            r#"
            SELECT id, user_id, address_type, address_line_1, address_line_2,
                   city, state, zip_code, country, created_at, updated_at
            FROM user_addresses
            WHERE user_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(addresses)
    }

    async fn find_by_id(&self, address_id: Uuid) -> Result<Option<UserAddress>, RepoError> {
        let address = sqlx::query_as::<_, UserAddress>(
            r#"
            SELECT id, user_id, address_type, address_line_1, address_line_2,
                   city, state, zip_code, country, created_at, updated_at
            FROM user_addresses
            WHERE id = $1
            "#,
        )
        .bind(address_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(address)
    }

    async fn create(&self, user_id: Uuid, address: &NewAddress) -> Result<UserAddress, RepoError> {
        let created = sqlx::query_as::<_, UserAddress>(
            r#"
            INSERT INTO user_addresses
                (user_id, address_type, address_line_1, address_line_2, city, state, zip_code, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, address_type, address_line_1, address_line_2,
                      city, state, zip_code, country, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&address.address_type)
        .bind(&address.address_line_1)
        .bind(&address.address_line_2)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip_code)
        .bind(&address.country)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update(&self, address: &UserAddress) -> Result<UserAddress, RepoError> {
        let updated = sqlx::query_as::<_, UserAddress>(
            r#"
            UPDATE user_addresses
            SET address_type = $2, address_line_1 = $3, address_line_2 = $4,
                city = $5, state = $6, zip_code = $7, country = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, address_type, address_line_1, address_line_2,
                      city, state, zip_code, country, created_at, updated_at
            "#,
        )
        .bind(address.id)
        .bind(&address.address_type)
        .bind(&address.address_line_1)
        .bind(&address.address_line_2)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip_code)
        .bind(&address.country)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, user_id: Uuid, address_id: Uuid) -> Result<u64, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_addresses
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id)
        .bind(address_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
