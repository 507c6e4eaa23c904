use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use primapos_core::{DomainError, DomainResult, Page, PageRequest, UserId};

use crate::user::{Role, User, UserDraft};

const SEED_USERS: &str = include_str!("../data/users.json");

/// Filters applied by the users table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuery {
    /// Case-insensitive substring of name or e-mail.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl UserQuery {
    pub fn matches(&self, user: &User) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || user.name.to_lowercase().contains(&needle)
            || user.email.to_lowercase().contains(&needle);
        matches_search && self.role.is_none_or(|r| r == user.role)
    }
}

/// Read access to staff users.
pub trait UserDirectory: Send + Sync {
    fn find_user_by_id(&self, id: UserId) -> Option<User>;

    /// All users in id order.
    fn list_users(&self) -> Vec<User>;

    fn search_users(&self, query: &UserQuery, page: PageRequest) -> Page<User> {
        let users = self.list_users().into_iter().filter(|u| query.matches(u)).collect();
        Page::paginate(users, page)
    }

    /// Users with the mechanic role, in id order.
    fn mechanics(&self) -> Vec<User> {
        self.list_users().into_iter().filter(User::is_mechanic).collect()
    }

    /// Mechanic whose name matches exactly (ignoring case and surrounding space).
    fn find_mechanic_by_name(&self, name: &str) -> Option<User> {
        let name = name.trim();
        self.mechanics().into_iter().find(|u| u.name.eq_ignore_ascii_case(name))
    }
}

impl<S> UserDirectory for Arc<S>
where
    S: UserDirectory + ?Sized,
{
    fn find_user_by_id(&self, id: UserId) -> Option<User> {
        (**self).find_user_by_id(id)
    }

    fn list_users(&self) -> Vec<User> {
        (**self).list_users()
    }
}

/// In-memory user directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    inner: RwLock<BTreeMap<UserId, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            inner: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }

    /// Directory pre-loaded with the shop's demo staff.
    pub fn seeded() -> DomainResult<Self> {
        let users: Vec<User> = serde_json::from_str(SEED_USERS)
            .map_err(|e| DomainError::invariant(format!("seed users are malformed: {e}")))?;
        tracing::debug!(count = users.len(), "seeded user directory");
        Ok(Self::with_users(users))
    }

    pub fn create_user(&self, draft: UserDraft) -> DomainResult<User> {
        draft.validate()?;
        let mut map = self.write()?;
        ensure_unique_email(&map, &draft.email, None)?;

        let id = map.keys().next_back().map_or(UserId::new(1), |id| id.next());
        let user = User {
            id,
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            role: draft.role,
            status: draft.status,
            last_login: None,
        };

        tracing::info!(user_id = %id, role = %user.role, "user created");
        map.insert(id, user.clone());
        Ok(user)
    }

    pub fn update_user(&self, id: UserId, draft: UserDraft) -> DomainResult<User> {
        draft.validate()?;
        let mut map = self.write()?;
        ensure_unique_email(&map, &draft.email, Some(id))?;

        let user = map
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("user {id}")))?;
        user.name = draft.name.trim().to_string();
        user.email = draft.email.trim().to_string();
        user.role = draft.role;
        user.status = draft.status;

        tracing::info!(user_id = %id, "user updated");
        Ok(user.clone())
    }

    pub fn delete_user(&self, id: UserId) -> DomainResult<User> {
        let mut map = self.write()?;
        let removed = map
            .remove(&id)
            .ok_or_else(|| DomainError::not_found(format!("user {id}")))?;
        tracing::info!(user_id = %id, "user deleted");
        Ok(removed)
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, BTreeMap<UserId, User>>> {
        self.inner
            .write()
            .map_err(|_| DomainError::invariant("user directory lock poisoned"))
    }
}

fn ensure_unique_email(map: &BTreeMap<UserId, User>, email: &str, except: Option<UserId>) -> DomainResult<()> {
    let email = email.trim();
    if map
        .values()
        .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
    {
        return Err(DomainError::conflict(format!("e-mail {email} already registered")));
    }
    Ok(())
}

impl UserDirectory for InMemoryUserDirectory {
    fn find_user_by_id(&self, id: UserId) -> Option<User> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn list_users(&self) -> Vec<User> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }
}
