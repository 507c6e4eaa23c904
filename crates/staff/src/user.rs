use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use primapos_core::{DomainError, DomainResult, Entity, UserId};

// ─────────────────────────────────────────────────────────────────────────────
// Role / Status
// ─────────────────────────────────────────────────────────────────────────────

/// Staff role. Serialized with the labels used on the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Admin")]
    Admin,
    #[serde(rename = "Mekanik")]
    Mechanic,
    #[serde(rename = "Kasir")]
    Cashier,
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Mechanic => write!(f, "Mekanik"),
            Role::Cashier => write!(f, "Kasir"),
        }
    }
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UserStatus {
    #[default]
    #[serde(rename = "Aktif")]
    Active,
    #[serde(rename = "Inactive")]
    Inactive,
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub last_login: Option<NaiveDateTime>,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl User {
    pub fn initials(&self) -> String {
        initials(&self.name)
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn is_mechanic(&self) -> bool {
        self.role == Role::Mechanic
    }
}

/// First letter of the first two words, uppercased ("Budi Santoso" → "BS").
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Editable fields of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
}

impl UserDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("user name must not be empty"));
        }
        let email = self.email.trim();
        let well_formed = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !well_formed {
            return Err(DomainError::validation(format!("invalid e-mail address: {email}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(initials("Budi Santoso"), "BS");
        assert_eq!(initials("PT Astra Honda Motor"), "PA");
        assert_eq!(initials("admin"), "A");
        assert_eq!(initials("  "), "");
    }

    #[test]
    fn role_labels_match_settings_screen() {
        assert_eq!(serde_json::to_string(&Role::Mechanic).unwrap(), "\"Mekanik\"");
        assert_eq!(Role::Cashier.to_string(), "Kasir");
        assert_eq!(serde_json::to_string(&UserStatus::Active).unwrap(), "\"Aktif\"");
    }

    #[test]
    fn draft_requires_name_and_email() {
        let draft = UserDraft {
            name: "Siti Aminah".to_string(),
            email: "siti.kasir@primamotor.com".to_string(),
            role: Role::Cashier,
            status: UserStatus::Active,
        };
        assert!(draft.validate().is_ok());

        let mut bad = draft.clone();
        bad.email = "siti.kasir".to_string();
        assert!(matches!(bad.validate(), Err(DomainError::Validation(_))));

        let mut bad = draft;
        bad.name = String::new();
        assert!(matches!(bad.validate(), Err(DomainError::Validation(_))));
    }
}
