//! User service: signup, login, token refresh, and account administration.

use pawhub_domain::error::{AuthError, PawHubError, ValidationError};
use pawhub_domain::id::UserId;
use pawhub_domain::permission::{Actor, Permission};
use pawhub_domain::user::{User, UserRole, UserStatus};

use super::found;
use crate::ports::{Authenticator, PageRequest, Paged, TokenKind, TokenPair, UserRepository};

/// Input for creating an account.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

/// Fields an administrator may change on an account. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

/// Application service for user accounts and authentication.
pub struct UserService<R, A> {
    repo: R,
    auth: A,
}

impl<R: UserRepository, A: Authenticator> UserService<R, A> {
    /// Create a new service backed by the given repository and authenticator.
    pub fn new(repo: R, auth: A) -> Self {
        Self { repo, auth }
    }

    /// Create an account.
    ///
    /// Anyone may sign up as an adopter or volunteer; creating an
    /// administrator requires an administrator `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Validation`] for a blank password, malformed
    /// fields, or a taken username/email, and [`PawHubError::Forbidden`]
    /// when a non-admin asks for the admin role.
    #[tracing::instrument(skip(self, actor, new), fields(username = %new.username))]
    pub async fn register(&self, actor: Option<&Actor>, new: NewUser) -> Result<User, PawHubError> {
        let role = new.role.unwrap_or_default();
        if role == UserRole::Admin {
            Permission::ADMIN.check(actor)?;
        }
        if new.password.is_empty() {
            return Err(ValidationError::Empty { field: "password" }.into());
        }

        let user = User::builder()
            .username(new.username)
            .email(new.email)
            .first_name(new.first_name)
            .last_name(new.last_name)
            .role(role)
            .status(new.status.unwrap_or_default())
            .build()?;
        self.ensure_unique(&user).await?;

        let user = User {
            password_hash: self.auth.hash_password(&new.password).await?,
            ..user
        };
        let created = self.repo.create(user).await?;
        tracing::info!(user_id = %created.id, role = %created.role, "user registered");
        Ok(created)
    }

    async fn ensure_unique(&self, user: &User) -> Result<(), PawHubError> {
        if let Some(other) = self.repo.find_by_username(&user.username).await?
            && other.id != user.id
        {
            return Err(ValidationError::Duplicate { field: "username" }.into());
        }
        if let Some(other) = self.repo.find_by_email(&user.email).await?
            && other.id != user.id
        {
            return Err(ValidationError::Duplicate { field: "email" }.into());
        }
        Ok(())
    }

    /// Look up a user by id without a role gate.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::NotFound`] when no user with `id` exists.
    pub async fn find_user(&self, id: UserId) -> Result<User, PawHubError> {
        found(self.repo.get_by_id(id).await?, "User", id)
    }

    /// Look up a user by id (administrators only).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for non-admins and
    /// [`PawHubError::NotFound`] when the user does not exist.
    pub async fn get_user(&self, actor: &Actor, id: UserId) -> Result<User, PawHubError> {
        Permission::ADMIN.check(Some(actor))?;
        self.find_user(id).await
    }

    /// List users visible to `actor`: everyone for admins, adopters only for
    /// volunteers.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for adopters, or a storage error.
    pub async fn list_users(
        &self,
        actor: &Actor,
        page: PageRequest,
    ) -> Result<Paged<User>, PawHubError> {
        Permission::STAFF.check(Some(actor))?;
        if actor.role == UserRole::Volunteer {
            return self.repo.find_by_role(UserRole::Adopter, page).await;
        }
        self.repo.get_all(page).await
    }

    /// Apply `changes` to an account (administrators only).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for non-admins,
    /// [`PawHubError::NotFound`] for an unknown id, and
    /// [`PawHubError::Validation`] when the result is invalid or collides.
    #[tracing::instrument(skip(self, actor, changes))]
    pub async fn update_user(
        &self,
        actor: &Actor,
        id: UserId,
        changes: UserChanges,
    ) -> Result<User, PawHubError> {
        Permission::ADMIN.check(Some(actor))?;
        let mut user = self.find_user(id).await?;

        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(status) = changes.status {
            user.status = status;
        }
        user.validate()?;
        self.ensure_unique(&user).await?;

        if let Some(password) = changes.password {
            if password.is_empty() {
                return Err(ValidationError::Empty { field: "password" }.into());
            }
            user.password_hash = self.auth.hash_password(&password).await?;
        }
        self.repo.update(user).await
    }

    /// Delete an account (administrators only).
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Forbidden`] for non-admins and
    /// [`PawHubError::NotFound`] for an unknown id.
    #[tracing::instrument(skip(self, actor))]
    pub async fn delete_user(&self, actor: &Actor, id: UserId) -> Result<(), PawHubError> {
        Permission::ADMIN.check(Some(actor))?;
        self.find_user(id).await?;
        self.repo.delete(id).await
    }

    /// Check a username/password pair and return the matching active user.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Unauthorized`] when the credentials do not
    /// match or the account is inactive.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, PawHubError> {
        let user = self
            .repo
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !self.auth.verify_password(password, &user.password_hash).await {
            return Err(AuthError::InvalidCredentials.into());
        }
        if !user.is_active() {
            return Err(AuthError::InactiveUser.into());
        }
        Ok(user)
    }

    /// Authenticate and hand out an access/refresh token pair.
    ///
    /// # Errors
    ///
    /// See [`Self::authenticate`].
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, PawHubError> {
        let user = self.authenticate(username, password).await?;
        Ok(TokenPair {
            access: self.auth.issue_token(&user, TokenKind::Access)?,
            refresh: self.auth.issue_token(&user, TokenKind::Refresh)?,
        })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Unauthorized`] when the token is invalid or the
    /// account is gone or inactive.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, PawHubError> {
        let user = self.user_for_token(refresh_token, TokenKind::Refresh).await?;
        self.auth.issue_token(&user, TokenKind::Access)
    }

    /// Resolve a bearer access token to the active user it belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`PawHubError::Unauthorized`] when the token is invalid or the
    /// account is gone or inactive.
    pub async fn resolve_access_token(&self, token: &str) -> Result<User, PawHubError> {
        self.user_for_token(token, TokenKind::Access).await
    }

    async fn user_for_token(&self, token: &str, kind: TokenKind) -> Result<User, PawHubError> {
        let id = self.auth.verify_token(token, kind)?;
        let user = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        if !user.is_active() {
            return Err(AuthError::InactiveUser.into());
        }
        Ok(user)
    }
}
