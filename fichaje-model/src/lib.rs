//! Core data model definitions shared across Fichaje crates.
#![allow(missing_docs)]

pub mod asistencia;
pub mod prelude;
pub mod reportes;
pub mod tokens;
pub mod usuario;

// Intentionally curated re-exports for downstream consumers.
pub use asistencia::{
    MarcarResponse, RegistroAsistencia, ReporteAtrasos, ReporteInasistencias,
    ReporteSalidasAnticipadas, ResumenUsuario, TipoRegistro, TodosLosRegistros,
};
pub use reportes::{
    HORA_ENTRADA, HORA_SALIDA, minutos_de_anticipo, minutos_de_atraso,
};
pub use tokens::{LoginResponse, RefreshResponse, TokenPair};
pub use usuario::{ActualizarUsuario, NuevoUsuario, Rol, Usuario};
