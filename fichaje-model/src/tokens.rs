//! Bearer token pair and authentication response bodies.

use serde::{Deserialize, Serialize};

use crate::usuario::Usuario;

/// Opaque access/refresh token pair issued on login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Response body of the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub tokens: TokenPair,
    pub usuario: Usuario,
}

/// Response body of the refresh endpoint; only the access token rotates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_round_trips() {
        let json = r#"{
            "tokens": {"access": "A1", "refresh": "R1"},
            "usuario": {
                "id": 1,
                "email": "admin@example.com",
                "nombre": "Root",
                "apellido": "Admin",
                "rol": "administrador",
                "activo": true
            }
        }"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.tokens.access, "A1");
        assert_eq!(resp.tokens.refresh, "R1");
        assert!(resp.usuario.rol.is_admin());
    }
}
