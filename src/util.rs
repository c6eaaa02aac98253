//! util.rs
//! Normalización de valores que vienen como texto de la planilla.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

/// Año de 4 dígitos primero; `%y` (dd/mm/aa) sólo si ninguno encaja.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d/%m/%y", "%d-%m-%y",
];

/// `%Y` de chrono también acepta "27"; esos años se descartan.
const MIN_FOUR_DIGIT_YEAR: i32 = 1000;
const TIME_SUFFIXES: &[&str] = &[" %H:%M:%S", " %H:%M", "T%H:%M:%S"];

/// Sólo los dígitos de un teléfono ("(85) 99999-0001" -> "85999990001").
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Número de una celda. Con coma decimal ("1.234,5") los puntos son miles.
/// Blanco o inválido -> 0.
pub fn parse_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    let normalized = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else {
        s.to_string()
    };
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Cantidad entera (trunca "3.0" -> 3). Negativos o inválidos -> 0.
pub fn parse_quantity(raw: &str) -> usize {
    let v = parse_number(raw);
    if v <= 0.0 {
        0
    } else {
        v.trunc() as usize
    }
}

/// Fecha en cualquiera de los formatos que usa la planilla (día primero).
/// Blanco o inválido -> None.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Some(d) = parse_with(s, fmt) {
            return Some(d);
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

fn parse_with(s: &str, fmt: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(s, fmt).ok().or_else(|| {
        TIME_SUFFIXES.iter().find_map(|suffix| {
            NaiveDateTime::parse_from_str(s, &format!("{}{}", fmt, suffix))
                .ok()
                .map(|dt| dt.date())
        })
    })?;
    (date.year() >= MIN_FOUR_DIGIT_YEAR).then_some(date)
}

pub fn parse_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_uppercase().as_str(),
        "SIM" | "S" | "TRUE" | "VERDADEIRO" | "1"
    )
}

/// Letra de columna A1 para un índice 0-based (0 -> A, 26 -> AA).
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    out.iter().rev().collect()
}
