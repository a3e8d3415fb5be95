//! User database operations (users)

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Result as SqliteResult};

use crate::db::Database;
use crate::models::{UpdateUserRequest, User};

const USER_COLUMNS: &str = "id, telegram_id, username, first_name, last_name, age, city, gender,
     timezone, language_code, onboarding_completed, created_at, updated_at, deleted_at";

impl Database {
    /// Look up a live (not soft-deleted) user by Telegram id.
    pub fn get_user_by_telegram_id(&self, telegram_id: i64) -> SqliteResult<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {} FROM users WHERE telegram_id = ?1 AND deleted_at IS NULL",
                USER_COLUMNS
            ),
            [telegram_id],
            |row| Self::row_to_user(row),
        )
        .optional()
    }

    /// Get an existing user or lazily create one on first interaction.
    pub fn get_or_create_user(&self, telegram_id: i64) -> SqliteResult<User> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT OR IGNORE INTO users (telegram_id, created_at, updated_at)
             VALUES (?1, ?2, ?2)",
            rusqlite::params![telegram_id, &now],
        )?;
        conn.query_row(
            &format!("SELECT {} FROM users WHERE telegram_id = ?1", USER_COLUMNS),
            [telegram_id],
            |row| Self::row_to_user(row),
        )
    }

    /// Update onboarding fields with dynamic SQL; only supplied fields change.
    pub fn update_user(&self, id: i64, request: &UpdateUserRequest) -> SqliteResult<Option<User>> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();

        let mut updates = vec!["updated_at = ?1".to_string()];
        let mut param_idx = 2;

        if request.first_name.is_some() {
            updates.push(format!("first_name = ?{}", param_idx));
            param_idx += 1;
        }
        if request.age.is_some() {
            updates.push(format!("age = ?{}", param_idx));
            param_idx += 1;
        }
        if request.city.is_some() {
            updates.push(format!("city = ?{}", param_idx));
            param_idx += 1;
        }
        if request.gender.is_some() {
            updates.push(format!("gender = ?{}", param_idx));
            param_idx += 1;
        }

        let sql = format!("UPDATE users SET {} WHERE id = ?{}", updates.join(", "), param_idx);

        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(now)];
        if let Some(ref first_name) = request.first_name {
            params.push(Box::new(first_name.clone()));
        }
        if let Some(age) = request.age {
            params.push(Box::new(age));
        }
        if let Some(ref city) = request.city {
            params.push(Box::new(city.clone()));
        }
        if let Some(ref gender) = request.gender {
            params.push(Box::new(gender.clone()));
        }
        params.push(Box::new(id));

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_ref.as_slice())?;

        drop(conn);
        self.get_user(id)
    }

    pub fn get_user(&self, id: i64) -> SqliteResult<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            [id],
            |row| Self::row_to_user(row),
        )
        .optional()
    }

    pub fn set_onboarding_completed(&self, id: i64) -> SqliteResult<()> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "UPDATE users SET onboarding_completed = 1, updated_at = ?1 WHERE id = ?2",
            rusqlite::params![&now, id],
        )?;
        Ok(())
    }

    /// Soft delete: users are never removed, only timestamped.
    pub fn soft_delete_user(&self, id: i64) -> SqliteResult<bool> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let rows = conn.execute(
            "UPDATE users SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
            rusqlite::params![&now, id],
        )?;
        Ok(rows > 0)
    }

    pub(crate) fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let created_at_str: String = row.get(11)?;
        let updated_at_str: String = row.get(12)?;
        let deleted_at_str: Option<String> = row.get(13)?;

        Ok(User {
            id: row.get(0)?,
            telegram_id: row.get(1)?,
            username: row.get(2)?,
            first_name: row.get(3)?,
            last_name: row.get(4)?,
            age: row.get(5)?,
            city: row.get(6)?,
            gender: row.get(7)?,
            timezone: row.get(8)?,
            language_code: row.get(9)?,
            onboarding_completed: row.get::<_, i64>(10)? != 0,
            created_at: parse_ts(&created_at_str),
            updated_at: parse_ts(&updated_at_str),
            deleted_at: deleted_at_str.map(|s| parse_ts(&s)),
        })
    }
}

pub(crate) fn parse_ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

#[cfg(test)]
mod tests {
    use crate::db::Database;
    use crate::models::UpdateUserRequest;

    #[test]
    fn get_or_create_is_idempotent() {
        let db = Database::new(":memory:").expect("in-memory db");
        let a = db.get_or_create_user(42).unwrap();
        let b = db.get_or_create_user(42).unwrap();
        assert_eq!(a.id, b.id);
        assert!(!a.onboarding_completed);
        assert_eq!(a.next_onboarding_field(), Some("name"));
    }

    #[test]
    fn update_user_sets_only_supplied_fields() {
        let db = Database::new(":memory:").expect("in-memory db");
        let user = db.get_or_create_user(1).unwrap();

        let updated = db
            .update_user(
                user.id,
                &UpdateUserRequest {
                    first_name: Some("Ann".to_string()),
                    age: Some(30),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.first_name.as_deref(), Some("Ann"));
        assert_eq!(updated.age, Some(30));
        assert_eq!(updated.city, None);
        assert_eq!(updated.next_onboarding_field(), Some("city"));
    }

    #[test]
    fn soft_deleted_user_is_hidden_from_lookup() {
        let db = Database::new(":memory:").expect("in-memory db");
        let user = db.get_or_create_user(7).unwrap();
        assert!(db.soft_delete_user(user.id).unwrap());
        assert!(db.get_user_by_telegram_id(7).unwrap().is_none());
        // Second soft delete is a no-op
        assert!(!db.soft_delete_user(user.id).unwrap());
    }
}
