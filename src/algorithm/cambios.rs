//! Reporte global de cambios entre el maestro anterior y el actual.
//!
//! El reporte registra cambios de asociación código OS ↔ concepto, no de
//! importes: un código cuyo concepto no cambió no aparece aunque su importe
//! sí lo haya hecho (eso lo detecta `seleccion`).

use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::info;

use crate::excel::Tabla;
use crate::models::{CambioGlobal, EstadoCambio, RegistrosObra, ValorCambio};
use crate::normalizar::limpiar_importe;

/// Invierte los registros de un período: código OS → concepto original.
fn codigo_a_concepto(datos: &RegistrosObra) -> BTreeMap<&str, &str> {
    datos
        .values()
        .map(|r| (r.cod_os.as_str(), r.concepto_original.as_str()))
        .collect()
}

/// Importe de la obra `obra_col` en la primera fila del maestro actual con
/// ese código y concepto.
fn valor_en_maestro(tabla: &Tabla, obra_col: &str, cod_os: &str, concepto: &str) -> ValorCambio {
    let Some(col) = tabla.columna(obra_col) else {
        return ValorCambio::Vacio;
    };
    (0..tabla.filas.len())
        .find(|&i| tabla.celda(i, 0).trim() == cod_os && tabla.celda(i, 1).trim() == concepto)
        .map(|i| ValorCambio::Importe(limpiar_importe(tabla.celda(i, col))))
        .unwrap_or(ValorCambio::Vacio)
}

/// Compara los registros (unión de todas las obras) de ambos períodos y
/// arma una fila por código OS nuevo, eliminado o con concepto modificado,
/// en orden de código.
pub fn comparar_maestros_global(
    datos_actual: &RegistrosObra,
    datos_anterior: &RegistrosObra,
    obras_cols: &[String],
    tabla_actual: &Tabla,
) -> Vec<CambioGlobal> {
    let antes = codigo_a_concepto(datos_anterior);
    let ahora = codigo_a_concepto(datos_actual);
    let codigos: BTreeSet<&str> = antes.keys().chain(ahora.keys()).copied().collect();
    info!(codigos = codigos.len(), "comparando maestros");

    let mut cambios: Vec<CambioGlobal> = Vec::new();
    for cod_os in codigos {
        let concepto_antes = antes.get(cod_os).copied().filter(|c| !c.is_empty());
        let concepto_actual = ahora.get(cod_os).copied().filter(|c| !c.is_empty());

        let estado = match (concepto_antes, concepto_actual) {
            (Some(a), Some(b)) if a == b => continue,
            (Some(_), Some(_)) => EstadoCambio::Modificado,
            (Some(_), None) => EstadoCambio::Eliminado,
            (None, Some(_)) => EstadoCambio::Nuevo,
            (None, None) => continue,
        };

        let valores = obras_cols
            .iter()
            .map(|obra_col| match concepto_actual {
                Some(concepto) => valor_en_maestro(tabla_actual, obra_col, cod_os, concepto),
                None => ValorCambio::Eliminado,
            })
            .collect();

        cambios.push(CambioGlobal {
            cod_os_antes: concepto_antes.map(|_| cod_os.to_string()).unwrap_or_default(),
            cod_os_actual: concepto_actual.map(|_| cod_os.to_string()).unwrap_or_default(),
            concepto_antes: concepto_antes.unwrap_or_default().to_string(),
            concepto_actual: concepto_actual.unwrap_or_default().to_string(),
            estado,
            valores,
            repetido: false,
        });
    }

    marcar_repetidos(&mut cambios);
    info!(cambios = cambios.len(), "cambios detectados");
    cambios
}

/// Marca todas las filas que comparten el par (código actual, concepto
/// actual) con alguna otra.
fn marcar_repetidos(cambios: &mut [CambioGlobal]) {
    let mut conteo: HashMap<(String, String), usize> = HashMap::new();
    for c in cambios.iter() {
        *conteo
            .entry((c.cod_os_actual.clone(), c.concepto_actual.clone()))
            .or_default() += 1;
    }
    for c in cambios.iter_mut() {
        c.repetido = conteo[&(c.cod_os_actual.clone(), c.concepto_actual.clone())] > 1;
    }
}
