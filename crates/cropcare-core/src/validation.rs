//! Pure input checks that gate the register form and the image upload.
//!
//! Nothing here touches the network or any UI; callers recompute the results
//! on every keystroke or file selection.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::upload::ImageFile;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Largest accepted upload, in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// MIME types the backend can classify.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

static SPECIAL_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").unwrap());

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("Please select a valid image file (JPG, PNG)")]
    UnsupportedType { mime: String },
    #[error("File size must be less than 10MB")]
    TooLarge { size: u64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Passwords do not match.")]
    Mismatch,
    #[error(
        "Password should contain min 8 characters, one capital letter, one special character, and one number."
    )]
    TooWeak,
}

/// The five password criteria, derived from the current input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PasswordRequirements {
    pub min_length: bool,
    pub has_upper: bool,
    pub has_lower: bool,
    pub has_digit: bool,
    pub has_special: bool,
}

impl PasswordRequirements {
    pub fn all(&self) -> bool {
        self.min_length && self.has_upper && self.has_lower && self.has_digit && self.has_special
    }

    /// Checklist rows in display order: (label, satisfied).
    pub fn checklist(&self) -> [(&'static str, bool); 5] {
        [
            ("At least 8 characters", self.min_length),
            ("One uppercase letter", self.has_upper),
            ("One lowercase letter", self.has_lower),
            ("One number", self.has_digit),
            ("One special character", self.has_special),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    pub criteria: PasswordRequirements,
    pub satisfied: bool,
}

impl PasswordStrength {
    /// Unmet requirements, phrased for the inline hint.
    pub fn missing(&self) -> Vec<&'static str> {
        let c = &self.criteria;
        let mut missing = Vec::new();
        if !c.min_length {
            missing.push("min 8 characters");
        }
        if !c.has_upper {
            missing.push("one capital letter");
        }
        if !c.has_lower {
            missing.push("one lowercase letter");
        }
        if !c.has_special {
            missing.push("one special character");
        }
        if !c.has_digit {
            missing.push("one number");
        }
        missing
    }

    pub fn message(&self) -> String {
        let missing = self.missing();
        if missing.is_empty() {
            "Password meets requirements".to_string()
        } else {
            format!("Password should contain {}", missing.join(", "))
        }
    }
}

pub fn evaluate_password_strength(password: &str) -> PasswordStrength {
    let criteria = PasswordRequirements {
        min_length: password.chars().count() >= MIN_PASSWORD_LEN,
        has_upper: password.chars().any(|c| c.is_ascii_uppercase()),
        has_lower: password.chars().any(|c| c.is_ascii_lowercase()),
        has_digit: password.chars().any(|c| c.is_ascii_digit()),
        has_special: SPECIAL_CHAR.is_match(password),
    };
    PasswordStrength {
        criteria,
        satisfied: criteria.all(),
    }
}

/// Inline state of the "confirm password" hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// Nothing typed into the confirmation yet.
    Neutral,
    Match,
    Mismatch,
}

impl MatchState {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Neutral => "",
            Self::Match => "Passwords match",
            Self::Mismatch => "Passwords do not match",
        }
    }
}

pub fn passwords_match(a: &str, b: &str) -> bool {
    a == b
}

pub fn match_state(password: &str, confirm: &str) -> MatchState {
    if confirm.is_empty() {
        MatchState::Neutral
    } else if passwords_match(password, confirm) {
        MatchState::Match
    } else {
        MatchState::Mismatch
    }
}

/// Whether the register button should be enabled.
pub fn is_form_submittable(username: &str, password: &str, confirm: &str) -> bool {
    !username.is_empty()
        && !password.is_empty()
        && !confirm.is_empty()
        && passwords_match(password, confirm)
        && evaluate_password_strength(password).satisfied
}

/// Re-check a registration before it is sent.
pub fn check_registration(password: &str, confirm: &str) -> Result<(), PasswordError> {
    if !passwords_match(password, confirm) {
        return Err(PasswordError::Mismatch);
    }
    if !evaluate_password_strength(password).satisfied {
        return Err(PasswordError::TooWeak);
    }
    Ok(())
}

pub fn validate_upload(mime: &str, size: u64) -> Result<(), FileError> {
    if !ACCEPTED_MIME_TYPES.contains(&mime) {
        return Err(FileError::UnsupportedType {
            mime: mime.to_string(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(FileError::TooLarge { size });
    }
    Ok(())
}

pub fn validate_upload_file(file: &ImageFile) -> Result<(), FileError> {
    validate_upload(&file.mime, file.size())
}

/// Human-readable byte count: `0 Bytes`, `11 Bytes`, `1.5 KB`, `10 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut exp = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && exp < UNITS.len() - 1 {
        scaled /= 1024;
        exp += 1;
    }
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[exp])
}
