//! Attendance records and report envelopes.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::usuario::Usuario;

/// Kind of an attendance mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoRegistro {
    Entrada,
    Salida,
}

/// User subset embedded in attendance records as `usuario_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumenUsuario {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
}

/// A single clock-in or clock-out record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistroAsistencia {
    pub id: i64,
    pub fecha: NaiveDate,
    pub hora: NaiveTime,
    #[serde(default)]
    pub tipo_registro: Option<TipoRegistro>,
    pub usuario_info: ResumenUsuario,
}

/// Response body of the clock-in/clock-out endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarcarResponse {
    pub mensaje: String,
}

/// Envelope of the late-arrivals report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReporteAtrasos {
    #[serde(default)]
    pub reportes: Vec<RegistroAsistencia>,
}

/// Envelope of the absences report; entries are whole user profiles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReporteInasistencias {
    #[serde(default)]
    pub usuarios_inasistentes: Vec<Usuario>,
}

/// Envelope of the early-departures report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReporteSalidasAnticipadas {
    #[serde(default)]
    pub reportes: Vec<RegistroAsistencia>,
}

/// Envelope of the full attendance log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodosLosRegistros {
    #[serde(default)]
    pub registros: Vec<RegistroAsistencia>,
}
