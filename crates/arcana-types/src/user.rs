//! User domain types for Arcana.
//!
//! Users come in two roles modelled as a tagged variant: app users (the
//! people getting readings, who hold points) and admin users (who manage
//! topics). Each role has its own constructor, chosen by matching on
//! [`NewUser`].

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::UserError;

/// Required phone length, including the `+84` country prefix.
pub const PHONE_LENGTH: usize = 12;

/// Minimum admin password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("invalid gender: '{other}'")),
        }
    }
}

/// How an app user signed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    Phone,
    Facebook,
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthType::Phone => write!(f, "phone"),
            AuthType::Facebook => write!(f, "facebook"),
        }
    }
}

impl FromStr for AuthType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "phone" => Ok(AuthType::Phone),
            "facebook" => Ok(AuthType::Facebook),
            other => Err(format!("invalid auth type: '{other}'")),
        }
    }
}

/// Western (tropical) zodiac sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zodiac {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Zodiac {
    /// Sign for a birth date, using the conventional cusp days.
    pub fn from_birth_date(date: NaiveDate) -> Self {
        let (month, day) = (date.month(), date.day());
        match (month, day) {
            (3, 21..) | (4, ..=19) => Zodiac::Aries,
            (4, _) | (5, ..=20) => Zodiac::Taurus,
            (5, _) | (6, ..=20) => Zodiac::Gemini,
            (6, _) | (7, ..=22) => Zodiac::Cancer,
            (7, _) | (8, ..=22) => Zodiac::Leo,
            (8, _) | (9, ..=22) => Zodiac::Virgo,
            (9, _) | (10, ..=22) => Zodiac::Libra,
            (10, _) | (11, ..=21) => Zodiac::Scorpio,
            (11, _) | (12, ..=21) => Zodiac::Sagittarius,
            (12, _) | (1, ..=19) => Zodiac::Capricorn,
            (1, _) | (2, ..=18) => Zodiac::Aquarius,
            _ => Zodiac::Pisces,
        }
    }
}

impl fmt::Display for Zodiac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Zodiac::Aries => "aries",
            Zodiac::Taurus => "taurus",
            Zodiac::Gemini => "gemini",
            Zodiac::Cancer => "cancer",
            Zodiac::Leo => "leo",
            Zodiac::Virgo => "virgo",
            Zodiac::Libra => "libra",
            Zodiac::Scorpio => "scorpio",
            Zodiac::Sagittarius => "sagittarius",
            Zodiac::Capricorn => "capricorn",
            Zodiac::Aquarius => "aquarius",
            Zodiac::Pisces => "pisces",
        };
        f.write_str(name)
    }
}

/// Fields only app users have.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUserProfile {
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub auth_type: AuthType,
    pub avatar: Option<String>,
    pub points: i64,
}

/// Fields only admin users have.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserProfile {
    pub email: String,
    /// PHC-format password hash. Never serialized out.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// Role of a user, carrying the role-specific fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum UserRole {
    #[serde(rename = "user")]
    App(AppUserProfile),
    Admin(AdminUserProfile),
}

impl UserRole {
    /// The discriminator stored alongside the row (`user` or `admin`).
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::App(_) => "user",
            UserRole::Admin(_) => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub active: bool,
    #[serde(flatten)]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a user, one variant per role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum NewUser {
    #[serde(rename = "user")]
    App {
        name: String,
        phone: String,
        birth_date: NaiveDate,
        gender: Gender,
        auth_type: AuthType,
        #[serde(default)]
        avatar: Option<String>,
    },
    Admin {
        name: String,
        phone: String,
        email: String,
        /// Already-hashed password; hashing happens before this is built.
        password_hash: String,
    },
}

impl User {
    /// Build a user from a creation request, dispatching on the role.
    pub fn from_request(request: NewUser, today: NaiveDate) -> Result<Self, UserError> {
        match request {
            NewUser::App {
                name,
                phone,
                birth_date,
                gender,
                auth_type,
                avatar,
            } => Self::new_app(name, phone, birth_date, gender, auth_type, avatar, today),
            NewUser::Admin {
                name,
                phone,
                email,
                password_hash,
            } => Self::new_admin(name, phone, email, password_hash),
        }
    }

    /// Construct an app user with zero points.
    pub fn new_app(
        name: String,
        phone: String,
        birth_date: NaiveDate,
        gender: Gender,
        auth_type: AuthType,
        avatar: Option<String>,
        today: NaiveDate,
    ) -> Result<Self, UserError> {
        let name = validate_name(&name)?;
        validate_phone(&phone)?;
        if birth_date >= today {
            return Err(UserError::Invalid(
                "birth date should be in the past".to_string(),
            ));
        }

        Ok(Self::assemble(
            name,
            phone,
            UserRole::App(AppUserProfile {
                birth_date,
                gender,
                auth_type,
                avatar,
                points: 0,
            }),
        ))
    }

    /// Construct an admin user from an already-hashed password.
    pub fn new_admin(
        name: String,
        phone: String,
        email: String,
        password_hash: String,
    ) -> Result<Self, UserError> {
        let name = validate_name(&name)?;
        validate_phone(&phone)?;
        validate_email(&email)?;
        if password_hash.is_empty() {
            return Err(UserError::Invalid("password hash is empty".to_string()));
        }

        Ok(Self::assemble(
            name,
            phone,
            UserRole::Admin(AdminUserProfile {
                email,
                password_hash,
            }),
        ))
    }

    fn assemble(name: String, phone: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            phone,
            active: true,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin(_))
    }

    /// Reader-facing profile for an app user. Admins have none.
    pub fn reader_profile(&self) -> Option<ReaderProfile> {
        match &self.role {
            UserRole::App(profile) => Some(ReaderProfile {
                name: self.name.clone(),
                gender: profile.gender,
                birth_date: profile.birth_date,
                zodiac: Zodiac::from_birth_date(profile.birth_date),
            }),
            UserRole::Admin(_) => None,
        }
    }

    /// Current point balance. Admins hold no points.
    pub fn points(&self) -> Option<i64> {
        match &self.role {
            UserRole::App(profile) => Some(profile.points),
            UserRole::Admin(_) => None,
        }
    }
}

/// What the reader knows about the person asking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderProfile {
    pub name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub zodiac: Zodiac,
}

fn validate_name(name: &str) -> Result<String, UserError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(UserError::Invalid("name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}

/// Phone numbers are stored with the country prefix, e.g. `+84901234567`.
pub fn validate_phone(phone: &str) -> Result<(), UserError> {
    if phone.chars().count() != PHONE_LENGTH {
        return Err(UserError::Invalid(format!(
            "phone should be exactly {PHONE_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), UserError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    };
    if !valid {
        return Err(UserError::Invalid(format!(
            "{email} is not a valid email address"
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), UserError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserError::Invalid(format!(
            "password should be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}
