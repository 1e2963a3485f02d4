//! Insertable shapes of the five record kinds.
//!
//! These hold exactly the fields a caller may supply; `id` and `createdAt`
//! are always assigned by storage.

use super::directory::{BgColor, EntryType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    User,
    Subscriber,
    Resource,
    DirectoryEntry,
    ContactMessage,
}

/// Registration fields. `password` is plaintext until hashed by the auth
/// service and never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub user_type: String,
    pub country: String,
    pub genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscriber {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResource {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub category: String,
    pub date: String,
    pub download_link: Option<String>,
    pub access_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDirectoryEntry {
    pub name: String,
    pub entry_type: EntryType,
    pub location: String,
    pub tags: Vec<String>,
    pub initials: String,
    pub bg_color: BgColor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Login form fields. Checked for shape only; matching happens in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
    pub user_type: String,
}

/// A validated insert payload, tagged by record kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidRecordInput {
    User(NewUser),
    Subscriber(NewSubscriber),
    Resource(NewResource),
    DirectoryEntry(NewDirectoryEntry),
    ContactMessage(NewContactMessage),
}

impl ValidRecordInput {
    pub fn kind(&self) -> RecordKind {
        match self {
            ValidRecordInput::User(_) => RecordKind::User,
            ValidRecordInput::Subscriber(_) => RecordKind::Subscriber,
            ValidRecordInput::Resource(_) => RecordKind::Resource,
            ValidRecordInput::DirectoryEntry(_) => RecordKind::DirectoryEntry,
            ValidRecordInput::ContactMessage(_) => RecordKind::ContactMessage,
        }
    }
}
