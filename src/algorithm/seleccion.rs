//! Detección de las obras sociales que deben regenerarse.

use std::collections::BTreeSet;
use tracing::info;

use crate::algorithm::extract::ExtraccionPeriodo;
use crate::excel::Tabla;
use crate::models::RegistrosObra;

/// Diferencia máxima de importes considerada igual.
pub const TOLERANCIA_IMPORTE: f64 = 0.01;

/// Dos extracciones de una misma obra difieren si cambian sus claves o si
/// algún importe compartido difiere en más de la tolerancia.
pub fn obra_tiene_cambios(actual: &RegistrosObra, anterior: &RegistrosObra) -> bool {
    if actual.len() != anterior.len() || !actual.keys().all(|k| anterior.contains_key(k)) {
        return true;
    }
    actual.iter().any(|(clave, reg)| {
        anterior
            .get(clave)
            .is_some_and(|prev| (reg.valor - prev.valor).abs() > TOLERANCIA_IMPORTE)
    })
}

/// Devuelve las obras sociales con cambios de valores entre períodos.
///
/// Sin datos del período anterior se devuelven todas (regeneración
/// completa). Una obra ausente del maestro anterior siempre cuenta como
/// cambiada.
pub fn detectar_obras_sociales_con_cambios(
    actual: &ExtraccionPeriodo,
    anterior: Option<(&ExtraccionPeriodo, &Tabla)>,
    obras_cols: &[String],
) -> BTreeSet<String> {
    let todas = || obras_cols.iter().cloned().collect::<BTreeSet<_>>();

    let Some((anterior, tabla_anterior)) = anterior.filter(|(a, _)| !a.total.is_empty()) else {
        info!("sin maestro anterior, se procesan todas las obras sociales");
        return todas();
    };

    let vacio = RegistrosObra::new();
    let mut con_cambios = BTreeSet::new();
    for obra_col in obras_cols {
        if !tabla_anterior.tiene_columna(obra_col) {
            info!(obra = %obra_col, "obra social nueva, se procesará");
            con_cambios.insert(obra_col.clone());
            continue;
        }
        let datos_actual = actual.obra(obra_col).unwrap_or(&vacio);
        let datos_anterior = anterior.obra(obra_col).unwrap_or(&vacio);
        if obra_tiene_cambios(datos_actual, datos_anterior) {
            info!(obra = %obra_col, "cambios detectados en obra social");
            con_cambios.insert(obra_col.clone());
        }
    }

    info!(con_cambios = con_cambios.len(), total = obras_cols.len(), "obras sociales con cambios");
    con_cambios
}
