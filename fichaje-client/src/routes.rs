//! Route definitions for the attendance API.
//!
//! Paths are relative to the configured base URL and keep their trailing
//! slashes; the server treats `/usuarios` and `/usuarios/` as different
//! resources.

macro_rules! usuarios_path {
    ($path:literal) => {
        concat!("/usuarios", $path)
    };
}

macro_rules! asistencia_path {
    ($path:literal) => {
        concat!("/asistencia", $path)
    };
}

pub mod usuarios {
    pub const COLLECTION: &str = usuarios_path!("/");

    /// Path of a single user resource
    pub fn item(id: i64) -> String {
        format!("/usuarios/{id}/")
    }

    pub mod auth {
        pub const LOGIN: &str = usuarios_path!("/auth/login/");
        pub const REFRESH: &str = usuarios_path!("/auth/refresh/");
        pub const LOGOUT: &str = usuarios_path!("/auth/logout/");
        pub const CHECK: &str = usuarios_path!("/auth/check/");
    }
}

pub mod asistencia {
    pub const MARCAR_ENTRADA: &str = asistencia_path!("/marcar-entrada/");
    pub const MARCAR_SALIDA: &str = asistencia_path!("/marcar-salida/");
    pub const TODOS_REGISTROS: &str = asistencia_path!("/todos-registros/");
    pub const REGISTROS: &str = asistencia_path!("/registros/");

    pub mod reportes {
        pub const ATRASOS: &str = asistencia_path!("/reportes/atrasos/");
        pub const INASISTENCIAS: &str =
            asistencia_path!("/reportes/inasistencias/");
        pub const SALIDAS_ANTICIPADAS: &str =
            asistencia_path!("/reportes/salidas-anticipadas/");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_keep_trailing_slashes() {
        assert_eq!(usuarios::auth::LOGIN, "/usuarios/auth/login/");
        assert_eq!(usuarios::item(42), "/usuarios/42/");
        assert_eq!(
            asistencia::reportes::SALIDAS_ANTICIPADAS,
            "/asistencia/reportes/salidas-anticipadas/"
        );
    }
}
