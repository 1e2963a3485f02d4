pub mod directory;
pub mod records;

pub use directory::{BgColor, EntryType, ResourceTab};
pub use records::{
    LoginCredentials, NewContactMessage, NewDirectoryEntry, NewResource, NewSubscriber, NewUser, RecordKind,
    ValidRecordInput,
};
