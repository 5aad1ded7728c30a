//! User profile and user-management request bodies.
//!
//! Field names mirror the wire format of the attendance API, which speaks
//! Spanish (`nombre`, `apellido`, `rol`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned to a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    Empleado,
    Administrador,
}

impl Rol {
    pub fn is_admin(&self) -> bool {
        matches!(self, Rol::Administrador)
    }
}

impl Default for Rol {
    fn default() -> Self {
        Rol::Empleado
    }
}

/// A user profile as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub email: String,
    pub nombre: String,
    pub apellido: String,
    pub rol: Rol,
    pub activo: bool,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

impl Usuario {
    /// Full display name, first name first
    pub fn nombre_completo(&self) -> String {
        format!("{} {}", self.nombre, self.apellido)
    }
}

/// Request body for creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NuevoUsuario {
    pub email: String,
    pub password: String,
    pub nombre: String,
    pub apellido: String,
    pub rol: Rol,
}

/// Partial update request body; absent fields are left untouched server-side
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActualizarUsuario {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apellido: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rol: Option<Rol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activo: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rol_uses_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&Rol::Administrador).unwrap(),
            "\"administrador\""
        );
        let rol: Rol = serde_json::from_str("\"empleado\"").unwrap();
        assert_eq!(rol, Rol::Empleado);
    }

    #[test]
    fn usuario_tolerates_missing_timestamps() {
        let json = r#"{
            "id": 7,
            "email": "ana@example.com",
            "nombre": "Ana",
            "apellido": "Lopez",
            "rol": "empleado",
            "activo": true
        }"#;
        let usuario: Usuario = serde_json::from_str(json).unwrap();
        assert!(usuario.date_joined.is_none());
        assert!(usuario.last_login.is_none());
        assert_eq!(usuario.nombre_completo(), "Ana Lopez");
    }

    #[test]
    fn partial_update_omits_unset_fields() {
        let update = ActualizarUsuario {
            activo: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"activo":false}"#);
    }
}
