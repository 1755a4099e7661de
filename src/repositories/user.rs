use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{Pagination, RepoError, UserFilter, UserRepository};
use crate::models::{DEFAULT_USER_STATUS, NewUser, ProfileUpdate, UserAccount, UserProfile};

const ACCOUNT_COLUMNS: &str = r#"
    SELECT u.id, u.username, u.email, u.status,
           p.first_name, p.last_name, p.phone_number, p.profile_image_url,
           u.created_at, u.updated_at
    FROM users u
    JOIN user_profiles p ON p.user_id = u.id
"#;

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// LIKE のメタ文字をエスケープ
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// WHERE 句を組み立てる
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    let mut separator = " WHERE ";

    let text_filters = [
        ("u.username", &filter.username),
        ("u.email", &filter.email),
        ("p.first_name", &filter.first_name),
        ("p.last_name", &filter.last_name),
    ];
    for (column, value) in text_filters {
        if let Some(value) = value {
            builder
                .push(separator)
                .push(column)
                .push(" ILIKE ")
                .push_bind(format!("%{}%", escape_like(value)));
            separator = " AND ";
        }
    }

    if let Some(status) = &filter.status {
        builder
            .push(separator)
            .push("u.status = ")
            .push_bind(status.clone());
    }
}

#[async_trait::async_trait]
impl UserRepository for PgUserRepository {
    async fn find_page(
        &self,
        filter: &UserFilter,
        pagination: Pagination,
    ) -> Result<(Vec<UserAccount>, i64), RepoError> {
        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM users u JOIN user_profiles p ON p.user_id = u.id",
        );
        push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(ACCOUNT_COLUMNS);
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY u.created_at, u.id LIMIT ")
            .push_bind(pagination.size)
            .push(" OFFSET ")
            .push_bind(pagination.offset());
        let users = select
            .build_query_as::<UserAccount>()
            .fetch_all(&self.pool)
            .await?;

        Ok((users, total))
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserAccount>, RepoError> {
        let account = sqlx::query_as::<_, UserAccount>(&format!("{ACCOUNT_COLUMNS} WHERE u.id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, RepoError> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_id, first_name, last_name, phone_number, profile_image_url,
                   created_at, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    /// # Errors
    /// - UNIQUE制約違反時: `RepoError::UniqueViolation` (`users_username_key` / `users_email_key`)
    async fn create(&self, new_user: &NewUser) -> Result<Uuid, RepoError> {
        let mut tx = self.pool.begin().await?;

        let user_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, email, password_hash, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(DEFAULT_USER_STATUS)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, first_name, last_name, phone_number, profile_image_url)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.phone_number)
        .bind(&new_user.profile_image_url)
        .execute(&mut *tx)
        .await?;

        if let Some(address) = &new_user.address {
            sqlx::query(
                r#"
                INSERT INTO user_addresses
                    (user_id, address_type, address_line_1, address_line_2, city, state, zip_code, country)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
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
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(user_id)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<UserAccount>, RepoError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE user_profiles
            SET first_name = $2, last_name = $3, phone_number = $4, profile_image_url = $5,
                updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.phone_number)
        .bind(&update.profile_image_url)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(None);
        }

        sqlx::query("UPDATE users SET updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.find_by_id(user_id).await
    }

    async fn delete(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
