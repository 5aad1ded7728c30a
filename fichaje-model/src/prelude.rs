//! Snapshot of the types surface for client and presentation layers.
//! Prefer importing from this module instead of individual tree nodes.

pub use super::asistencia::{
    MarcarResponse, RegistroAsistencia, ReporteAtrasos, ReporteInasistencias,
    ReporteSalidasAnticipadas, ResumenUsuario, TipoRegistro, TodosLosRegistros,
};
pub use super::reportes::{
    HORA_ENTRADA, HORA_SALIDA, minutos_de_anticipo, minutos_de_atraso,
};
pub use super::tokens::{LoginResponse, RefreshResponse, TokenPair};
pub use super::usuario::{ActualizarUsuario, NuevoUsuario, Rol, Usuario};
