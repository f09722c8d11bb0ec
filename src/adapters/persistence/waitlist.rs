use async_trait::async_trait;
use chrono::Utc;

use crate::{
    adapters::persistence::SqlitePersistence,
    app_error::{AppError, AppResult},
    domain::entities::waitlist_entry::{NewWaitlistEntry, WaitlistEntry},
    use_cases::signup::WaitlistRepo,
};

const SELECT_ENTRY: &str = r#"
    SELECT id, email, role, first_name, last_name, phone, created_at, notified
    FROM waitlist
"#;

#[async_trait]
impl WaitlistRepo for SqlitePersistence {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<WaitlistEntry>> {
        let rec = sqlx::query_as::<_, WaitlistEntry>(&format!("{SELECT_ENTRY} WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(rec)
    }

    async fn insert(&self, entry: &NewWaitlistEntry) -> AppResult<i64> {
        let result = sqlx::query(
            r#"
                INSERT INTO waitlist (email, role, first_name, last_name, phone, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.email)
        .bind(entry.role)
        .bind(&entry.first_name)
        .bind(&entry.last_name)
        .bind(&entry.phone)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(result.last_insert_rowid())
    }

    async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM waitlist")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(count)
    }

    async fn list_newest_first(&self) -> AppResult<Vec<WaitlistEntry>> {
        let rows = sqlx::query_as::<_, WaitlistEntry>(&format!(
            "{SELECT_ENTRY} ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows)
    }

    async fn list_unnotified(&self) -> AppResult<Vec<WaitlistEntry>> {
        let rows = sqlx::query_as::<_, WaitlistEntry>(&format!(
            "{SELECT_ENTRY} WHERE notified = FALSE ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows)
    }

    async fn mark_notified(&self, id: i64) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE waitlist SET notified = TRUE WHERE id = ? AND notified = FALSE")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(AppError::from)?;
        Ok(result.rows_affected() == 1)
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM waitlist")
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected())
    }
}
