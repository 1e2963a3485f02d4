use crate::db::models::{ContactMessage, DirectoryEntry, Resource, Subscriber, User};
use crate::db::schema::SQLITE_INIT;
use crate::error::CadenceError;
use crate::types::directory::{BgColor, EntryType};
use crate::types::records::{
    NewContactMessage, NewDirectoryEntry, NewResource, NewSubscriber, NewUser,
};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Executor, Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, name, user_type, country, genre, created_at";

/// Open (creating if needed) the SQLite database behind `database_url`.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, CadenceError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(connect_opts)
        .await?;
    Ok(pool)
}

/// Insert a subscriber through any executor, so callers can run it inside
/// their own transaction. Uniqueness is enforced by the table constraint.
pub async fn insert_subscriber_with<'e, E>(
    executor: E,
    new: &NewSubscriber,
) -> Result<Subscriber, CadenceError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let subscriber = sqlx::query_as::<_, Subscriber>(
        "INSERT INTO subscribers (email, created_at) VALUES (?, ?) RETURNING id, email, created_at",
    )
    .bind(new.email.as_str())
    .bind(Utc::now())
    .fetch_one(executor)
    .await?;
    Ok(subscriber)
}

#[derive(Clone)]
pub struct DirectoryStorage {
    pool: SqlitePool,
}

impl DirectoryStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), CadenceError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn list_directory_entries(&self) -> Result<Vec<DirectoryEntry>, CadenceError> {
        let rows = sqlx::query(
            r#"SELECT id, name, type, location, tags, initials, bg_color
               FROM directory_entries ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_entry).collect()
    }

    pub async fn list_directory_entries_by_type(
        &self,
        entry_type: EntryType,
    ) -> Result<Vec<DirectoryEntry>, CadenceError> {
        let rows = sqlx::query(
            r#"SELECT id, name, type, location, tags, initials, bg_color
               FROM directory_entries WHERE type = ? ORDER BY id"#,
        )
        .bind(entry_type.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_entry).collect()
    }

    pub async fn insert_directory_entry(
        &self,
        new: &NewDirectoryEntry,
    ) -> Result<DirectoryEntry, CadenceError> {
        let tags_json = serde_json::to_string(&new.tags)?;
        let row = sqlx::query(
            r#"
            INSERT INTO directory_entries (name, type, location, tags, initials, bg_color)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, name, type, location, tags, initials, bg_color
            "#,
        )
        .bind(new.name.as_str())
        .bind(new.entry_type.as_str())
        .bind(new.location.as_str())
        .bind(tags_json)
        .bind(new.initials.as_str())
        .bind(new.bg_color.as_str())
        .fetch_one(&self.pool)
        .await?;
        Self::row_to_entry(row)
    }

    pub async fn count_directory_entries(&self) -> Result<i64, CadenceError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM directory_entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    pub async fn list_resources(&self) -> Result<Vec<Resource>, CadenceError> {
        let rows = sqlx::query_as::<_, Resource>(
            r#"SELECT id, title, description, image_url, category, date,
               download_link, access_link
               FROM resources ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn insert_resource(&self, new: &NewResource) -> Result<Resource, CadenceError> {
        let resource = sqlx::query_as::<_, Resource>(
            r#"
            INSERT INTO resources (
                title, description, image_url, category, date,
                download_link, access_link
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, title, description, image_url, category, date,
                download_link, access_link
            "#,
        )
        .bind(new.title.as_str())
        .bind(new.description.as_str())
        .bind(new.image_url.as_str())
        .bind(new.category.as_str())
        .bind(new.date.as_str())
        .bind(new.download_link.as_deref())
        .bind(new.access_link.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(resource)
    }

    pub async fn count_resources(&self) -> Result<i64, CadenceError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM resources")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    pub async fn insert_subscriber(&self, new: &NewSubscriber) -> Result<Subscriber, CadenceError> {
        insert_subscriber_with(&self.pool, new).await
    }

    pub async fn insert_contact_message(
        &self,
        new: &NewContactMessage,
    ) -> Result<ContactMessage, CadenceError> {
        let message = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, subject, message, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, subject, message, created_at
            "#,
        )
        .bind(new.name.as_str())
        .bind(new.email.as_str())
        .bind(new.subject.as_str())
        .bind(new.message.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(message)
    }

    /// Store a user with an already-hashed password.
    pub async fn insert_user(&self, new: &NewUser, password_hash: &str) -> Result<User, CadenceError> {
        let sql = format!(
            r#"INSERT INTO users (
                username, email, password_hash, name, user_type, country, genre, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {USER_COLUMNS}"#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(new.username.as_str())
            .bind(new.email.as_str())
            .bind(password_hash)
            .bind(new.name.as_str())
            .bind(new.user_type.as_str())
            .bind(new.country.as_str())
            .bind(new.genre.as_deref())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, CadenceError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_user_by_email(
        &self,
        email: &str,
        user_type: &str,
    ) -> Result<Option<User>, CadenceError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? AND user_type = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(user_type)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    fn row_to_entry(row: SqliteRow) -> Result<DirectoryEntry, CadenceError> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let type_str: String = row.try_get("type")?;
        let location: String = row.try_get("location")?;
        let tags_json: String = row.try_get("tags")?;
        let initials: String = row.try_get("initials")?;
        let bg_color_str: String = row.try_get("bg_color")?;

        let entry_type = EntryType::from_str(&type_str).map_err(|_| {
            sqlx::Error::Decode(format!("unknown directory entry type `{type_str}`").into())
        })?;
        let bg_color = BgColor::from_str(&bg_color_str).map_err(|_| {
            sqlx::Error::Decode(format!("unknown bg_color `{bg_color_str}`").into())
        })?;
        let tags: Vec<String> =
            serde_json::from_str(&tags_json).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(DirectoryEntry {
            id,
            name,
            entry_type,
            location,
            tags,
            initials,
            bg_color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::directory::BgColor;

    async fn storage() -> DirectoryStorage {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        let storage = DirectoryStorage::new(pool);
        storage.init_schema().await.unwrap();
        storage
    }

    fn entry(name: &str, entry_type: EntryType, tags: &[&str]) -> NewDirectoryEntry {
        NewDirectoryEntry {
            name: name.to_string(),
            entry_type,
            location: "Nashville".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            initials: "HR".to_string(),
            bg_color: BgColor::Primary,
        }
    }

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        let storage = storage().await;
        storage.init_schema().await.unwrap();
        assert_eq!(storage.count_directory_entries().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn directory_entries_round_trip_in_creation_order() {
        let storage = storage().await;
        let first = storage
            .insert_directory_entry(&entry("Harmony Records", EntryType::RecordLabel, &["Rock"]))
            .await
            .unwrap();
        let second = storage
            .insert_directory_entry(&entry("Sofia Rodriguez", EntryType::Artist, &["Pop", "Latin"]))
            .await
            .unwrap();
        assert!(second.id > first.id);

        let all = storage.list_directory_entries().await.unwrap();
        assert_eq!(all, vec![first.clone(), second.clone()]);
        assert_eq!(all[1].tags, vec!["Pop".to_string(), "Latin".to_string()]);

        let artists = storage
            .list_directory_entries_by_type(EntryType::Artist)
            .await
            .unwrap();
        assert_eq!(artists, vec![second]);
    }

    #[tokio::test]
    async fn duplicate_subscriber_is_rejected_case_insensitively() {
        let storage = storage().await;
        let new = NewSubscriber {
            email: "fan@example.com".to_string(),
        };
        let created = storage.insert_subscriber(&new).await.unwrap();
        assert_eq!(created.email, "fan@example.com");

        let upper = NewSubscriber {
            email: "FAN@example.com".to_string(),
        };
        match storage.insert_subscriber(&upper).await {
            Err(CadenceError::DuplicateKey { field }) => assert_eq!(field, "email"),
            other => panic!("expected DuplicateKey, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rolled_back_subscriber_frees_the_email() {
        let storage = storage().await;
        let new = NewSubscriber {
            email: "rollback@example.com".to_string(),
        };

        let mut tx = storage.pool().begin().await.unwrap();
        insert_subscriber_with(&mut *tx, &new).await.unwrap();
        tx.rollback().await.unwrap();

        let created = storage.insert_subscriber(&new).await.unwrap();
        assert_eq!(created.email, new.email);
    }

    #[tokio::test]
    async fn resources_keep_optional_links() {
        let storage = storage().await;
        let created = storage
            .insert_resource(&NewResource {
                title: "Royalty Guide".to_string(),
                description: "Understand royalties".to_string(),
                image_url: "/img/guide.png".to_string(),
                category: "Guide".to_string(),
                date: "March 2024".to_string(),
                download_link: Some("/files/guide.pdf".to_string()),
                access_link: None,
            })
            .await
            .unwrap();
        assert_eq!(created.download_link.as_deref(), Some("/files/guide.pdf"));
        assert_eq!(created.access_link, None);
        assert_eq!(storage.list_resources().await.unwrap(), vec![created]);
    }
}
