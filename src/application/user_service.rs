use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{ProfileChanges, Registration, User};

pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub fn register(&self, registration: Registration) -> Result<User, DomainError> {
        let user = self.repo.create(registration.validate()?)?;
        log::info!("registered user {} ({})", user.id, user.username);
        Ok(user)
    }

    /// Resolves a claimed identity to a registered user.
    pub fn authenticate(&self, user_id: Option<Uuid>) -> Result<User, DomainError> {
        let id = user_id.ok_or(DomainError::Unauthenticated)?;
        self.repo
            .find_by_id(id)?
            .ok_or(DomainError::Unauthenticated)
    }

    pub fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<User, DomainError> {
        self.repo.update_profile(user_id, changes.validate()?)
    }
}
