//! Customer profiles.

use forkful_core::order::NewProfile;
use forkful_core::{Profile, UserId};

use crate::{BackendClient, BackendError, Query, Table};

/// Repository for customer profiles.
pub struct ProfileRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> ProfileRepository<'a> {
    #[must_use]
    pub const fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Create the profile for this phone, or update its name if it exists.
    ///
    /// Relies on a unique constraint on `profiles.phone`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    pub async fn upsert_by_phone(&self, profile: &NewProfile) -> Result<Profile, BackendError> {
        self.client
            .upsert::<_, Profile>(Table::Profiles, profile, "phone")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(Table::Profiles.to_string()))
    }

    /// Look up a profile by id.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] if no profile has this id.
    pub async fn get(&self, id: UserId) -> Result<Profile, BackendError> {
        self.client
            .select_one(Table::Profiles, Query::new().eq("id", id))
            .await
    }
}
