use crate::error::EngineError;

/// Core validation trait shared by the engine and the front-end.
///
/// # Type Parameters
///
/// * `T` - The type of data being validated (can be unsized like `str`)
///
/// # Examples
///
/// ```
/// use engine::validation::{ThemeIdValidator, Validator};
///
/// assert!(ThemeIdValidator.validate("base16-ocean").is_ok());
/// assert!(ThemeIdValidator.validate("../escape").is_err());
/// ```
pub trait Validator<T: ?Sized> {
    type Error;

    /// Validate the input and return Ok(()) if valid, or Err with validation error
    fn validate(&self, input: &T) -> Result<(), Self::Error>;
}

/// Maximum identifier length accepted for a theme file stem
pub const MAX_THEME_ID_LEN: usize = 100;

/// Validation errors specific to theme identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeIdError {
    Empty,
    TooLong { len: usize },
    InvalidCharacter { ch: char },
    LeadingDot,
}

impl ThemeIdError {
    pub fn reason(&self) -> String {
        match self {
            ThemeIdError::Empty => "Identifier cannot be empty".to_string(),
            ThemeIdError::TooLong { len } => {
                format!("Identifier too long ({len} characters, max {MAX_THEME_ID_LEN})")
            }
            ThemeIdError::InvalidCharacter { ch } => format!(
                "Identifier contains invalid character '{ch}' (only alphanumeric, '-', '_' and '.' allowed)"
            ),
            ThemeIdError::LeadingDot => "Identifier cannot start with '.'".to_string(),
        }
    }
}

/// Validator for theme identifiers.
///
/// Identifiers double as file stems inside the activation directory, so
/// anything that could escape it or produce a hidden file is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeIdValidator;

impl Validator<str> for ThemeIdValidator {
    type Error = ThemeIdError;

    fn validate(&self, input: &str) -> Result<(), Self::Error> {
        if input.is_empty() {
            return Err(ThemeIdError::Empty);
        }

        if input.len() > MAX_THEME_ID_LEN {
            return Err(ThemeIdError::TooLong { len: input.len() });
        }

        if let Some(ch) = input
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(ThemeIdError::InvalidCharacter { ch });
        }

        if input.starts_with('.') {
            return Err(ThemeIdError::LeadingDot);
        }

        Ok(())
    }
}

impl ThemeIdValidator {
    /// Validate and convert the failure into an engine error naming the identifier
    pub fn check(&self, input: &str) -> Result<(), EngineError> {
        self.validate(input)
            .map_err(|e| EngineError::InvalidThemeId {
                id: input.to_string(),
                reason: e.reason(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_id_validator() {
        let validator = ThemeIdValidator;

        // Valid identifiers
        assert!(validator.validate("base16-ocean").is_ok());
        assert!(validator.validate("base16_gruvbox-dark-hard").is_ok());
        assert!(validator.validate("tomorrow.night").is_ok());

        // Invalid identifiers
        assert_eq!(validator.validate(""), Err(ThemeIdError::Empty));
        assert_eq!(validator.validate(".hidden"), Err(ThemeIdError::LeadingDot));
        assert_eq!(validator.validate("..theme"), Err(ThemeIdError::LeadingDot));
        assert_eq!(
            validator.validate("../etc"),
            Err(ThemeIdError::InvalidCharacter { ch: '/' })
        );
        assert_eq!(
            validator.validate("a/b"),
            Err(ThemeIdError::InvalidCharacter { ch: '/' })
        );
        assert!(validator.validate("with space").is_err());
        assert!(validator.validate(&"a".repeat(MAX_THEME_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_check_wraps_reason() {
        let error = ThemeIdValidator.check("bad id").unwrap_err();
        match error {
            EngineError::InvalidThemeId { id, reason } => {
                assert_eq!(id, "bad id");
                assert!(reason.contains("' '"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
