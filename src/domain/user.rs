use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::{check_email, check_text, DomainError, ValidationErrors};

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub phone: String,
    pub address: String,
}

impl Registration {
    pub fn validate(self) -> Result<Registration, DomainError> {
        let reg = Registration {
            email: self.email.trim().to_lowercase(),
            username: self.username.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
        };

        let mut errors = ValidationErrors::new("Invalid registration");
        check_text(&mut errors, "email", &reg.email, true, 254);
        check_email(&mut errors, "email", &reg.email);
        check_text(&mut errors, "username", &reg.username, true, 150);
        check_text(&mut errors, "phone", &reg.phone, false, 20);
        errors.into_result()?;

        Ok(reg)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ProfileChanges {
    pub fn validate(self) -> Result<ProfileChanges, DomainError> {
        let changes = ProfileChanges {
            phone: self.phone.map(|p| p.trim().to_string()),
            address: self.address.map(|a| a.trim().to_string()),
        };

        let mut errors = ValidationErrors::new("Invalid profile");
        if let Some(phone) = &changes.phone {
            check_text(&mut errors, "phone", phone, false, 20);
        }
        errors.into_result()?;

        Ok(changes)
    }
}
