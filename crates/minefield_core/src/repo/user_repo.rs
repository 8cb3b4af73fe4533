//! User repository and row mapper.

use super::degrade::or_sentinel;
use super::{map_rows, RepoError, RepoResult};
use crate::client::{FindMany, MutableTableClient, Table, UserField, UserRow, UserUpdate, Users};
use crate::model::ids::UserId;
use crate::model::user::{validate_email, User};
use crate::model::validation::ValidationError;

/// Persistence facade for the `users` table.
#[derive(Clone)]
pub struct UserRepository<C> {
    client: C,
}

impl<C: MutableTableClient<Users>> UserRepository<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Inserts `user` or refreshes its profile fields; `None` on failure.
    pub async fn save(&self, user: &User) -> Option<User> {
        or_sentinel("user_save", self.try_save(user).await.map(Some))
    }

    pub async fn try_save(&self, user: &User) -> RepoResult<User> {
        user.validate().map_err(RepoError::invalid_input("user"))?;
        let create = UserRow {
            id: user.id.to_string(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            photo_url: user.photo_url.clone(),
        };
        let update = UserUpdate {
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            photo_url: user.photo_url.clone(),
        };
        let stored = self
            .client
            .upsert(user.id.to_string(), update, create)
            .await?;
        User::try_from(stored).map_err(RepoError::invalid_row(Users::NAME))
    }

    pub async fn find(&self, id: &UserId) -> Option<User> {
        or_sentinel("user_find", self.try_find(id).await)
    }

    pub async fn try_find(&self, id: &UserId) -> RepoResult<Option<User>> {
        match self.client.find_unique(id.to_string()).await? {
            Some(row) => User::try_from(row)
                .map(Some)
                .map_err(RepoError::invalid_row(Users::NAME)),
            None => Ok(None),
        }
    }

    /// All users ordered by email.
    pub async fn find_all(&self) -> Vec<User> {
        or_sentinel("user_find_all", self.try_find_all().await)
    }

    pub async fn try_find_all(&self) -> RepoResult<Vec<User>> {
        let query = FindMany::<Users>::all()
            .asc(UserField::Email)
            .asc(UserField::Id);
        let rows = self.client.find_many(query).await?;
        map_rows(Users::NAME, rows, User::try_from)
    }
}

impl TryFrom<UserRow> for User {
    type Error = ValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        validate_email(&row.email)?;
        Ok(Self {
            id: UserId::parse(row.id)?,
            email: row.email,
            display_name: row.display_name,
            photo_url: row.photo_url,
        })
    }
}
