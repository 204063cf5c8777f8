//! Token generation utilities.

use uuid::Uuid;

/// Generate a cryptographically secure random CSRF token.
///
/// The token is bound to a session at login and must be echoed back by
/// the client on every mutating request.
#[must_use]
pub fn generate_csrf_token() -> String {
    // Use UUID v4 for tokens (no time component for security)
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_csrf_token() {
        let token = generate_csrf_token();

        assert_eq!(token.len(), 32); // Simple UUID without hyphens
        assert_ne!(token, generate_csrf_token());
    }
}
