//! Períodos `YYYY-MM`: validación y etiqueta legible para el nombre del ZIP.

use chrono::{Datelike, NaiveDate};

use crate::error::{ArancelesError, Resultado};

/// Primer año aceptado.
pub const ANIO_MINIMO: i32 = 2020;

/// Valida un período `YYYY-MM`: año de 4 dígitos entre 2020 y
/// `anio_actual + 2`, mes de 2 dígitos entre 01 y 12.
pub fn validar_periodo(periodo: &str, anio_actual: i32) -> Resultado<()> {
    let invalido = |motivo: String| ArancelesError::PeriodoInvalido {
        periodo: periodo.to_string(),
        motivo,
    };
    let formato = || invalido("el formato debe ser YYYY-MM (ej: 2025-09)".to_string());

    let mut partes = periodo.split('-');
    let (Some(anio), Some(mes), None) = (partes.next(), partes.next(), partes.next()) else {
        return Err(formato());
    };
    if anio.len() != 4 || mes.len() != 2 {
        return Err(formato());
    }
    let (Ok(anio), Ok(mes)) = (anio.parse::<i32>(), mes.parse::<u32>()) else {
        return Err(formato());
    };

    if !(1..=12).contains(&mes) {
        return Err(invalido("el mes debe estar entre 01 y 12".to_string()));
    }
    if anio > anio_actual + 2 {
        return Err(invalido(format!("el año no puede ser mayor a {}", anio_actual + 2)));
    }
    if anio < ANIO_MINIMO {
        return Err(invalido(format!("el año debe ser {ANIO_MINIMO} o posterior")));
    }
    Ok(())
}

/// Etiqueta "año mes" para nombrar el ZIP (`2025-09` → `2025 September`).
/// `None` si el período no se puede interpretar como fecha.
pub fn etiqueta_periodo(periodo: &str) -> Option<String> {
    let fecha = NaiveDate::parse_from_str(&format!("{}-01", periodo.trim()), "%Y-%m-%d").ok()?;
    Some(format!("{} {}", fecha.year(), fecha.format("%B")))
}
