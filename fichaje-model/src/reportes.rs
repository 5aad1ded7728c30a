//! Derivation of lateness and early-departure minutes from raw mark times.
//!
//! The API reports raw timestamps only; how many minutes late an arrival was
//! is derived client-side against the fixed workday bounds.

use chrono::NaiveTime;

/// Start of the workday; entries after this count as late
pub const HORA_ENTRADA: NaiveTime = match NaiveTime::from_hms_opt(9, 30, 0) {
    Some(t) => t,
    None => unreachable!(),
};

/// End of the workday; exits before this count as early departures
pub const HORA_SALIDA: NaiveTime = match NaiveTime::from_hms_opt(17, 30, 0) {
    Some(t) => t,
    None => unreachable!(),
};

/// Whole minutes of lateness for a clock-in time.
///
/// Negative when the entry was on time or early.
pub fn minutos_de_atraso(hora: NaiveTime) -> i64 {
    hora.signed_duration_since(HORA_ENTRADA).num_minutes()
}

/// Whole minutes left on the workday for a clock-out time.
///
/// Negative when the exit happened at or after the regular end of day.
pub fn minutos_de_anticipo(hora: NaiveTime) -> i64 {
    HORA_SALIDA.signed_duration_since(hora).num_minutes()
}
