//! Role service: use-cases for managing named roles.

use pawhub_domain::error::{PawHubError, ValidationError};
use pawhub_domain::id::RoleId;
use pawhub_domain::permission::{Actor, Permission};
use pawhub_domain::role::Role;
use pawhub_domain::user::UserRole;

use super::found;
use crate::ports::{PageRequest, Paged, RoleRepository};

/// Application service for role CRUD operations.
pub struct RoleService<R> {
    repo: R,
}

impl<R: RoleRepository> RoleService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Get-or-create one role per [`UserRole`]. Safe to call on every start.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn ensure_defaults(&self) -> Result<Vec<Role>, PawHubError> {
        let mut roles = Vec::with_capacity(UserRole::ALL.len());
        for user_role in UserRole::ALL {
            let seed = Role::default_for(*user_role);
            let role = match self.repo.find_by_name(&seed.name).await? {
                Some(existing) => existing,
                None => {
                    tracing::info!(name = %seed.name, "seeding default role");
                    self.repo.create(seed).await?
                }
            };
            roles.push(role);
        }
        Ok(roles)
    }

    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] when no role with `id` exists.
    pub async fn get_role(&self, id: RoleId) -> Result<Role, PawHubError> {
        found(self.repo.get_by_id(id).await?, "Role", id)
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_roles(&self, page: PageRequest) -> Result<Paged<Role>, PawHubError> {
        self.repo.get_all(page).await
    }

    /// Create a role (administrators only).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for non-admins and
    /// [`PawHubError::Validation`] for a blank or taken name.
    #[tracing::instrument(skip(self, actor, description))]
    pub async fn create_role(
        &self,
        actor: &Actor,
        name: &str,
        description: String,
    ) -> Result<Role, PawHubError> {
        Permission::ADMIN.check(Some(actor))?;
        let role = Role::new(name, description)?;
        self.ensure_unique(&role).await?;
        self.repo.create(role).await
    }

    /// Rename or re-describe a role (administrators only).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for non-admins,
    /// [`PawHubError::NotFound`] for an unknown id, and
    /// [`PawHubError::Validation`] for a blank or taken name.
    #[tracing::instrument(skip(self, actor, description))]
    pub async fn update_role(
        &self,
        actor: &Actor,
        id: RoleId,
        name: Option<&str>,
        description: Option<String>,
    ) -> Result<Role, PawHubError> {
        Permission::ADMIN.check(Some(actor))?;
        let mut role = self.get_role(id).await?;
        if let Some(name) = name {
            role.name = name.trim().to_lowercase();
        }
        if let Some(description) = description {
            role.description = description;
        }
        role.validate()?;
        self.ensure_unique(&role).await?;
        self.repo.update(role).await
    }

    /// Delete a role (administrators only).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for non-admins and
    /// [`PawHubError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete_role(&self, actor: &Actor, id: RoleId) -> Result<(), PawHubError> {
        Permission::ADMIN.check(Some(actor))?;
        self.get_role(id).await?;
        self.repo.delete(id).await
    }

    async fn ensure_unique(&self, role: &Role) -> Result<(), PawHubError> {
        match self.repo.find_by_name(&role.name).await? {
            Some(other) if other.id != role.id => {
                Err(ValidationError::Duplicate { field: "name" }.into())
            }
            _ => Ok(()),
        }
    }
}
