use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A platform user, keyed by their Telegram identity.
///
/// Created lazily on first interaction and mutated field-by-field as
/// onboarding answers arrive. Never hard-deleted; `deleted_at` is a
/// soft-delete marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i64>,
    pub city: Option<String>,
    pub gender: Option<String>,
    pub timezone: Option<String>,
    pub language_code: Option<String>,
    pub onboarding_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// First onboarding field still missing, in fixed question order.
    pub fn next_onboarding_field(&self) -> Option<&'static str> {
        if self.first_name.is_none() {
            Some("name")
        } else if self.age.is_none() {
            Some("age")
        } else if self.city.is_none() {
            Some("city")
        } else if self.gender.is_none() {
            Some("gender")
        } else {
            None
        }
    }
}

/// One onboarding answer: which field, and the raw value
#[derive(Debug, Deserialize)]
pub struct OnboardingAnswer {
    pub field: String,
    pub value: String,
}

/// Partial user update with dynamic fields
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub age: Option<i64>,
    pub city: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub telegram_id: i64,
    pub first_name: Option<String>,
    pub age: Option<i64>,
    pub city: Option<String>,
    pub gender: Option<String>,
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        ProfileResponse {
            telegram_id: user.telegram_id,
            first_name: user.first_name.clone(),
            age: user.age,
            city: user.city.clone(),
            gender: user.gender.clone(),
        }
    }
}
