// File: src/services/guards.rs
//
// Precondition checks a command layer runs before an operation. Plain
// functions; the caller composes them and renders the error however it
// likes.

use twilight_model::id::Id;
use twilight_model::id::marker::UserMarker;

use maskbot_common::error::Error;
use maskbot_common::traits::repository_traits::SystemRepository;

/// Fails with `Error::NoSystem` unless the account has a system.
pub async fn require_system(
    systems: &dyn SystemRepository,
    user_id: Id<UserMarker>,
) -> Result<(), Error> {
    if systems.has_system(user_id).await? {
        Ok(())
    } else {
        Err(Error::NoSystem)
    }
}

/// Fails with `Error::SystemExists` if the account already has one, e.g.
/// before registering a new system.
pub async fn require_no_system(
    systems: &dyn SystemRepository,
    user_id: Id<UserMarker>,
) -> Result<(), Error> {
    if systems.has_system(user_id).await? {
        Err(Error::SystemExists)
    } else {
        Ok(())
    }
}
