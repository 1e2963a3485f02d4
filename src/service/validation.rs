use crate::error::{FieldViolation, ValidationError, ViolationKind};
use crate::types::directory::{BgColor, EntryType};
use crate::types::records::{
    LoginCredentials, NewContactMessage, NewDirectoryEntry, NewResource, NewSubscriber, NewUser,
    RecordKind, ValidRecordInput,
};
use regex::Regex;
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::LazyLock;

/// Field name reported when the payload itself is not a JSON object.
pub const PAYLOAD_FIELD: &str = "$";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex must compile")
});

pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_RE.is_match(candidate)
}

/// Check an untyped insert payload against the shape of `kind`.
///
/// Every violated field is reported, not only the first one. `id`,
/// `createdAt` and any unknown keys are ignored. Callers that only know the
/// kind at runtime (seeding) come in here; request handlers know theirs and
/// use the typed `validate_*` helpers below, which apply the same readers.
pub fn validate_insert(kind: RecordKind, payload: &Value) -> Result<ValidRecordInput, ValidationError> {
    let obj = as_object(payload)?;

    match kind {
        RecordKind::User => read_with(obj, read_user).map(ValidRecordInput::User),
        RecordKind::Subscriber => read_with(obj, read_subscriber).map(ValidRecordInput::Subscriber),
        RecordKind::Resource => read_with(obj, read_resource).map(ValidRecordInput::Resource),
        RecordKind::DirectoryEntry => {
            read_with(obj, read_directory_entry).map(ValidRecordInput::DirectoryEntry)
        }
        RecordKind::ContactMessage => {
            read_with(obj, read_contact_message).map(ValidRecordInput::ContactMessage)
        }
    }
}

pub fn validate_user(payload: &Value) -> Result<NewUser, ValidationError> {
    read_with(as_object(payload)?, read_user)
}

pub fn validate_subscriber(payload: &Value) -> Result<NewSubscriber, ValidationError> {
    read_with(as_object(payload)?, read_subscriber)
}

pub fn validate_resource(payload: &Value) -> Result<NewResource, ValidationError> {
    read_with(as_object(payload)?, read_resource)
}

pub fn validate_directory_entry(payload: &Value) -> Result<NewDirectoryEntry, ValidationError> {
    read_with(as_object(payload)?, read_directory_entry)
}

pub fn validate_contact_message(payload: &Value) -> Result<NewContactMessage, ValidationError> {
    read_with(as_object(payload)?, read_contact_message)
}

/// Shape check for a login body; email syntax is not enforced here since an
/// unknown address simply fails the lookup.
pub fn validate_login(payload: &Value) -> Result<LoginCredentials, ValidationError> {
    read_with(as_object(payload)?, read_login)
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, ValidationError> {
    payload.as_object().ok_or_else(|| ValidationError {
        violations: vec![FieldViolation::new(PAYLOAD_FIELD, ViolationKind::NotAnObject)],
    })
}

fn read_with<T>(
    obj: &Map<String, Value>,
    read: fn(&mut FieldReader<'_>) -> Option<T>,
) -> Result<T, ValidationError> {
    let mut reader = FieldReader::new(obj);
    let built = read(&mut reader);
    match (built, reader.violations) {
        (Some(record), violations) if violations.is_empty() => Ok(record),
        (_, violations) => Err(ValidationError { violations }),
    }
}

// Each reader pulls every field before combining, so all violations are
// collected even when an earlier field already failed.

fn read_user(r: &mut FieldReader<'_>) -> Option<NewUser> {
    let username = r.required_str("username");
    let email = r.email("email");
    let password = r.required_str("password");
    let name = r.required_str("name");
    let user_type = r.required_str("userType");
    let country = r.required_str("country");
    let genre = r.optional_str("genre");
    Some(NewUser {
        username: username?,
        email: email?,
        password: password?,
        name: name?,
        user_type: user_type?,
        country: country?,
        genre: genre?,
    })
}

fn read_subscriber(r: &mut FieldReader<'_>) -> Option<NewSubscriber> {
    let email = r.email("email");
    Some(NewSubscriber { email: email? })
}

fn read_resource(r: &mut FieldReader<'_>) -> Option<NewResource> {
    let title = r.required_str("title");
    let description = r.required_str("description");
    let image_url = r.required_str("imageUrl");
    let category = r.required_str("category");
    let date = r.required_str("date");
    let download_link = r.optional_str("downloadLink");
    let access_link = r.optional_str("accessLink");
    Some(NewResource {
        title: title?,
        description: description?,
        image_url: image_url?,
        category: category?,
        date: date?,
        download_link: download_link?,
        access_link: access_link?,
    })
}

fn read_directory_entry(r: &mut FieldReader<'_>) -> Option<NewDirectoryEntry> {
    let name = r.required_str("name");
    let entry_type = r.variant::<EntryType>("type");
    let location = r.required_str("location");
    let tags = r.string_list("tags");
    let initials = r.required_str("initials");
    let bg_color = r.variant::<BgColor>("bgColor");
    Some(NewDirectoryEntry {
        name: name?,
        entry_type: entry_type?,
        location: location?,
        tags: tags?,
        initials: initials?,
        bg_color: bg_color?,
    })
}

fn read_contact_message(r: &mut FieldReader<'_>) -> Option<NewContactMessage> {
    let name = r.required_str("name");
    let email = r.email("email");
    let subject = r.required_str("subject");
    let message = r.required_str("message");
    Some(NewContactMessage {
        name: name?,
        email: email?,
        subject: subject?,
        message: message?,
    })
}

fn read_login(r: &mut FieldReader<'_>) -> Option<LoginCredentials> {
    let email = r.required_str("email");
    let password = r.required_str("password");
    let user_type = r.required_str("userType");
    Some(LoginCredentials {
        email: email?,
        password: password?,
        user_type: user_type?,
    })
}

/// Reads typed fields out of a JSON object, recording a violation for each
/// field that does not fit instead of stopping at the first.
struct FieldReader<'a> {
    payload: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    fn new(payload: &'a Map<String, Value>) -> Self {
        Self {
            payload,
            violations: Vec::new(),
        }
    }

    fn reject(&mut self, field: &str, reason: ViolationKind) {
        self.violations.push(FieldViolation::new(field, reason));
    }

    fn required_str(&mut self, field: &str) -> Option<String> {
        match self.payload.get(field) {
            None | Some(Value::Null) => {
                self.reject(field, ViolationKind::Missing);
                None
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.reject(field, ViolationKind::Blank);
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.reject(field, ViolationKind::WrongType);
                None
            }
        }
    }

    /// `Some(None)` for absent, null or blank; `None` on a type violation.
    fn optional_str(&mut self, field: &str) -> Option<Option<String>> {
        match self.payload.get(field) {
            None | Some(Value::Null) => Some(None),
            Some(Value::String(s)) if s.trim().is_empty() => Some(None),
            Some(Value::String(s)) => Some(Some(s.clone())),
            Some(_) => {
                self.reject(field, ViolationKind::WrongType);
                None
            }
        }
    }

    fn email(&mut self, field: &str) -> Option<String> {
        let value = self.required_str(field)?;
        if is_valid_email(&value) {
            Some(value)
        } else {
            self.reject(field, ViolationKind::InvalidEmail);
            None
        }
    }

    fn variant<T: FromStr>(&mut self, field: &str) -> Option<T> {
        let value = self.required_str(field)?;
        match value.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                self.reject(field, ViolationKind::UnknownVariant);
                None
            }
        }
    }

    fn string_list(&mut self, field: &str) -> Option<Vec<String>> {
        match self.payload.get(field) {
            None | Some(Value::Null) => {
                self.reject(field, ViolationKind::Missing);
                None
            }
            Some(Value::Array(items)) => {
                let strings: Option<Vec<String>> = items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect();
                if strings.is_none() {
                    self.reject(field, ViolationKind::WrongType);
                }
                strings
            }
            Some(_) => {
                self.reject(field, ViolationKind::WrongType);
                None
            }
        }
    }
}
