// File: maskbot-common/src/models/system.rs

use chrono::{DateTime, Utc};
use twilight_model::id::Id;
use twilight_model::id::marker::UserMarker;

use crate::models::privacy::Privacy;

/// A system row from the database.
#[derive(Debug, Clone)]
pub struct System {
    pub id: i32,
    pub hid: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Appended to proxied usernames when set.
    pub tag: Option<String>,
    pub avatar_url: Option<String>,
    pub created: DateTime<Utc>,

    pub description_privacy: Privacy,
    pub list_privacy: Privacy,

    // Additional info that not every query returns.
    pub accounts: Vec<Id<UserMarker>>,
    pub member_count: Option<i64>,
}

impl System {
    /// Description if the system's description is public, `None` otherwise.
    pub fn public_description(&self) -> Option<&str> {
        if self.description_privacy == Privacy::Public {
            self.description.as_deref()
        } else {
            None
        }
    }
}
