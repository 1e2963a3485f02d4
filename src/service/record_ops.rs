use crate::db::models::{ContactMessage, DirectoryEntry, Resource, Subscriber, User};
use crate::db::sqlite::{DirectoryStorage, connect};
use crate::error::CadenceError;
use crate::service::password::{dummy_hash, hash_password, verify_password};
use crate::service::validation::{
    validate_contact_message, validate_directory_entry, validate_resource, validate_subscriber,
    validate_user,
};
use crate::types::directory::EntryType;
use crate::types::records::{NewUser, ValidRecordInput};
use serde_json::Value;
use tracing::{debug, info};

// Argon2 is deliberately slow; keep it off the async workers.
async fn hash_off_runtime(password: String) -> Result<String, CadenceError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

async fn verify_off_runtime(password: String, stored_hash: String) -> Result<bool, CadenceError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await?
}

async fn verify_dummy_off_runtime(password: String) -> Result<bool, CadenceError> {
    tokio::task::spawn_blocking(move || verify_password(&password, dummy_hash())).await?
}

/// Query and insert surface over the five record collections.
///
/// Inserts take the raw request payload, validate it, and return the
/// stored record with its assigned id (and timestamp where the kind has
/// one). Nothing is written when validation fails.
#[derive(Clone)]
pub struct RecordOps {
    storage: DirectoryStorage,
}

impl RecordOps {
    pub fn new(storage: DirectoryStorage) -> Self {
        Self { storage }
    }

    /// Open the database and make sure the schema exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, CadenceError> {
        let pool = connect(database_url, max_connections).await?;
        let storage = DirectoryStorage::new(pool);
        storage.init_schema().await?;
        Ok(Self::new(storage))
    }

    pub fn storage(&self) -> &DirectoryStorage {
        &self.storage
    }

    pub async fn list_directory_entries(&self) -> Result<Vec<DirectoryEntry>, CadenceError> {
        self.storage.list_directory_entries().await
    }

    /// Entries of one directory sub-page, addressed by its slug.
    pub async fn list_directory_category(
        &self,
        slug: &str,
    ) -> Result<Vec<DirectoryEntry>, CadenceError> {
        let entry_type =
            EntryType::from_slug(slug).ok_or(CadenceError::NotFound("directory category"))?;
        self.storage.list_directory_entries_by_type(entry_type).await
    }

    pub async fn list_resources(&self) -> Result<Vec<Resource>, CadenceError> {
        self.storage.list_resources().await
    }

    pub async fn insert_subscriber(&self, payload: &Value) -> Result<Subscriber, CadenceError> {
        let new = validate_subscriber(payload)?;
        let subscriber = self.storage.insert_subscriber(&new).await?;
        info!(id = subscriber.id, "newsletter subscriber added");
        Ok(subscriber)
    }

    pub async fn insert_contact_message(
        &self,
        payload: &Value,
    ) -> Result<ContactMessage, CadenceError> {
        let new = validate_contact_message(payload)?;
        let message = self.storage.insert_contact_message(&new).await?;
        info!(id = message.id, subject = %message.subject, "contact message received");
        Ok(message)
    }

    pub async fn insert_resource(&self, payload: &Value) -> Result<Resource, CadenceError> {
        let new = validate_resource(payload)?;
        let resource = self.storage.insert_resource(&new).await?;
        info!(id = resource.id, category = %resource.category, "resource added");
        Ok(resource)
    }

    pub async fn insert_directory_entry(
        &self,
        payload: &Value,
    ) -> Result<DirectoryEntry, CadenceError> {
        let new = validate_directory_entry(payload)?;
        let entry = self.storage.insert_directory_entry(&new).await?;
        info!(id = entry.id, entry_type = %entry.entry_type, "directory entry added");
        Ok(entry)
    }

    pub async fn register_user(&self, payload: &Value) -> Result<User, CadenceError> {
        let new = validate_user(payload)?;
        self.store_user(&new).await
    }

    async fn store_user(&self, new: &NewUser) -> Result<User, CadenceError> {
        let password_hash = hash_off_runtime(new.password.clone()).await?;
        let user = self.storage.insert_user(new, &password_hash).await?;
        info!(id = user.id, user_type = %user.user_type, "user registered");
        Ok(user)
    }

    /// Store an input that already passed `validate_insert` and return the
    /// assigned id. User passwords are hashed on the way in.
    pub async fn store_validated(&self, input: ValidRecordInput) -> Result<i64, CadenceError> {
        let kind = input.kind();
        let id = match input {
            ValidRecordInput::User(new) => self.store_user(&new).await?.id,
            ValidRecordInput::Subscriber(new) => self.storage.insert_subscriber(&new).await?.id,
            ValidRecordInput::Resource(new) => self.storage.insert_resource(&new).await?.id,
            ValidRecordInput::DirectoryEntry(new) => {
                self.storage.insert_directory_entry(&new).await?.id
            }
            ValidRecordInput::ContactMessage(new) => {
                self.storage.insert_contact_message(&new).await?.id
            }
        };
        debug!(?kind, id, "record stored");
        Ok(id)
    }

    pub async fn get_user(&self, id: i64) -> Result<User, CadenceError> {
        self.storage
            .get_user_by_id(id)
            .await?
            .ok_or(CadenceError::NotFound("user"))
    }

    /// Look up the user of `user_type` whose email and password match.
    /// Unknown email and wrong password are both `NotFound`, and both pay
    /// for one hash verification.
    pub async fn get_user_by_credentials(
        &self,
        email: &str,
        password: &str,
        user_type: &str,
    ) -> Result<User, CadenceError> {
        let Some(user) = self.storage.find_user_by_email(email, user_type).await? else {
            let _ = verify_dummy_off_runtime(password.to_string()).await;
            debug!(user_type, "login for unknown email");
            return Err(CadenceError::NotFound("user"));
        };
        if verify_off_runtime(password.to_string(), user.password_hash.clone()).await? {
            Ok(user)
        } else {
            debug!(id = user.id, "login with wrong password");
            Err(CadenceError::NotFound("user"))
        }
    }
}
