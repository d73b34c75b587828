use crate::models::Claims;
use jsonwebtoken::{DecodingKey, Validation, decode};

/// Tokens are issued by the identity service; this side only verifies them.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::models::TokenType;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};
    use uuid::Uuid;

    pub fn issue(role: u8, employee_id: Option<Uuid>, token_type: TokenType, secret: &str) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize;
        let claims = Claims {
            user_id: 7,
            sub: "mona".to_string(),
            role,
            exp: now + 900,
            jti: Uuid::new_v4().to_string(),
            token_type,
            employee_id,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn verifies_tokens_signed_with_the_same_secret() {
        let employee_id = Uuid::new_v4();
        let token = issue(3, Some(employee_id), TokenType::Access, "secret");

        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.role, 3);
        assert_eq!(claims.employee_id, Some(employee_id));
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let token = issue(1, None, TokenType::Access, "secret");
        assert!(verify_token(&token, "other").is_err());
    }
}
