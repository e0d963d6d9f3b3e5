//! Validation helpers for inbound message fields.

use validator::ValidationError;

const MAX_NAME_LENGTH: usize = 64;

/// Validates that a player handle is non-blank and at most 64 characters.
pub fn validate_handle(handle: &str) -> Result<(), ValidationError> {
    validate_name("handle", handle)
}

/// Validates that a room key is non-blank and at most 64 characters.
pub fn validate_room_key(room: &str) -> Result<(), ValidationError> {
    validate_name("room", room)
}

fn validate_name(kind: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(format!("{kind} must not be blank").into());
        return Err(err);
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("too_long");
        err.message =
            Some(format!("{kind} must be at most {MAX_NAME_LENGTH} characters").into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        assert!(validate_handle("alice").is_ok());
        assert!(validate_room_key("r1").is_ok());
        assert!(validate_handle("player 2").is_ok());
    }

    #[test]
    fn rejects_blank_names() {
        assert!(validate_handle("").is_err());
        assert!(validate_handle("   ").is_err());
        assert!(validate_room_key("").is_err());
    }

    #[test]
    fn rejects_oversized_names() {
        let long = "x".repeat(65);
        assert!(validate_handle(&long).is_err());
        assert!(validate_room_key(&long).is_err());
        assert!(validate_handle(&"x".repeat(64)).is_ok());
    }
}
