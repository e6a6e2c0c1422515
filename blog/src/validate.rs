//! Client-side field checks run before any request is sent.
//!
//! A failed check never reaches the network. Each failing field contributes
//! one user-facing notice; forms show all of them at once.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use std::fmt;

use crate::article::ArticleDraft;

pub const PASSWORD_LEN: (usize, usize) = (8, 20);
pub const USERNAME_LEN: (usize, usize) = (3, 20);
pub const TITLE_LEN: (usize, usize) = (10, 150);
pub const BODY_LEN: (usize, usize) = (300, 20_000);
pub const SHORT_DESCRIPTION_LEN: (usize, usize) = (150, 250);

/// A single failing field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldError {
    Credentials,
    Username,
    Email,
    Password,
    Title,
    Body,
    ShortDescription,
    Category,
    Image,
}

impl FieldError {
    /// Notice shown to the user for this field.
    #[must_use]
    pub fn notice(self) -> &'static str {
        match self {
            Self::Credentials => "Invalid user credentials",
            Self::Username => "Username should be between 3 and 20 characters.",
            Self::Email => "Enter a valid email address.",
            Self::Password => "Password should be between 8 and 20 characters.",
            Self::Title => "Title should be minimum 10 and maximum 150 characters.",
            Self::Body => "Body should be minimum 300 characters.",
            Self::ShortDescription => "Short Description should be minimum 150 characters.",
            Self::Category => "Category should be selected.",
            Self::Image => "Choose an image for the article.",
        }
    }
}

/// One or more fields failed their checks.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub struct ValidationFailure {
    pub fields: Vec<FieldError>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notices: Vec<&str> = self.notices().collect();
        write!(f, "validation failed: {}", notices.join(" "))
    }
}

impl ValidationFailure {
    pub fn notices(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.notice())
    }

    fn check(fields: Vec<FieldError>) -> Result<(), Self> {
        if fields.is_empty() { Ok(()) } else { Err(Self { fields }) }
    }
}

/// `true` when `text` has between `min` and `max` characters, inclusive.
#[must_use]
pub fn check_text(text: &str, min: usize, max: usize) -> bool {
    let len = text.chars().count();
    len >= min && len <= max
}

fn check_range(text: &str, (min, max): (usize, usize)) -> bool {
    check_text(text, min, max)
}

/// Loose structural email check: `local@domain.tld`, no whitespace.
#[must_use]
pub fn check_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.starts_with('.'),
        None => false,
    }
}

/// Login form: any bad field yields the single generic credentials notice.
///
/// # Errors
///
/// Returns [`ValidationFailure`] with [`FieldError::Credentials`].
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationFailure> {
    if check_email(email.trim()) && check_range(password, PASSWORD_LEN) {
        Ok(())
    } else {
        Err(ValidationFailure { fields: vec![FieldError::Credentials] })
    }
}

/// Signup form.
///
/// # Errors
///
/// Returns [`ValidationFailure`] listing every failing field.
pub fn validate_signup(username: &str, email: &str, password: &str) -> Result<(), ValidationFailure> {
    let mut fields = Vec::new();
    if !check_range(username.trim(), USERNAME_LEN) {
        fields.push(FieldError::Username);
    }
    if !check_email(email.trim()) {
        fields.push(FieldError::Email);
    }
    if !check_range(password, PASSWORD_LEN) {
        fields.push(FieldError::Password);
    }
    ValidationFailure::check(fields)
}

/// Article compose form.
///
/// # Errors
///
/// Returns [`ValidationFailure`] listing every failing field.
pub fn validate_draft(draft: &ArticleDraft, has_image: bool) -> Result<(), ValidationFailure> {
    let mut fields = Vec::new();
    if !has_image {
        fields.push(FieldError::Image);
    }
    if !check_range(&draft.title, TITLE_LEN) {
        fields.push(FieldError::Title);
    }
    if !check_range(&draft.short_description, SHORT_DESCRIPTION_LEN) {
        fields.push(FieldError::ShortDescription);
    }
    if !check_range(&draft.body, BODY_LEN) {
        fields.push(FieldError::Body);
    }
    if draft.category.is_none() {
        fields.push(FieldError::Category);
    }
    ValidationFailure::check(fields)
}
