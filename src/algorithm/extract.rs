//! Extracción de registros por obra social.
//!
//! Recorre el maestro fila a fila: columna 0 = código OS interno, columna 1 =
//! concepto, y la columna de la obra social con el importe. Cada fila con
//! importe positivo y traducción válida produce un `RegistroExtraido`.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::config::ConceptoNoMapeado;
use crate::excel::{Tabla, Traductor};
use crate::models::{RegistroExtraido, RegistrosObra};
use crate::normalizar::{limpiar_importe, normalizar_texto, validar_codigo};

/// Clave de un registro dentro de una obra social.
pub fn clave_registro(concepto: &str, cod_os: &str) -> String {
    format!("{}_{}", normalizar_texto(concepto), cod_os)
}

/// Extrae los registros de la columna `obra_col`.
///
/// Si la columna no existe devuelve un mapa vacío. Las filas sin importe,
/// sin traducción o con rango inválido se omiten; una clave repetida
/// reemplaza al registro anterior.
pub fn procesar_maestro_individual(
    tabla: &Tabla,
    obra_col: &str,
    traductor: &Traductor,
    no_mapeado: ConceptoNoMapeado,
) -> RegistrosObra {
    let mut datos_obra = RegistrosObra::new();

    let Some(col) = tabla.columna(obra_col) else {
        warn!(obra = obra_col, "columna no encontrada en el maestro");
        return datos_obra;
    };

    for i in 0..tabla.filas.len() {
        let cod_os = tabla.celda(i, 0).trim();
        let concepto = tabla.celda(i, 1).trim();

        let valor = limpiar_importe(tabla.celda(i, col));
        if valor <= 0.0 {
            continue;
        }

        let Some(rango) = traductor.buscar(concepto, cod_os) else {
            if no_mapeado == ConceptoNoMapeado::Advertir {
                warn!(obra = obra_col, concepto, cod_os, "concepto sin traducción, fila omitida");
            }
            continue;
        };
        if !validar_codigo(&rango.cod_desde) || !validar_codigo(&rango.cod_hasta) {
            continue;
        }

        datos_obra.insert(
            clave_registro(concepto, cod_os),
            RegistroExtraido {
                concepto_original: concepto.to_string(),
                cod_os: cod_os.to_string(),
                cod_desde: rango.cod_desde.clone(),
                cod_hasta: rango.cod_hasta.clone(),
                valor,
            },
        );
    }

    debug!(obra = obra_col, registros = datos_obra.len(), "obra social extraída");
    datos_obra
}

/// Extracción completa de un período: una vez por obra social, para
/// reutilizar en el reporte de cambios, la selección y la generación.
#[derive(Debug, Clone, Default)]
pub struct ExtraccionPeriodo {
    /// Registros por obra social (sólo columnas presentes en el maestro).
    pub por_obra: HashMap<String, RegistrosObra>,
    /// Unión de todas las obras; ante claves repetidas gana la última obra.
    pub total: RegistrosObra,
}

impl ExtraccionPeriodo {
    pub fn obra(&self, obra_col: &str) -> Option<&RegistrosObra> {
        self.por_obra.get(obra_col)
    }
}

/// Extrae todas las columnas `obras_cols` presentes en `tabla`.
pub fn extraer_periodo(
    tabla: &Tabla,
    obras_cols: &[String],
    traductor: &Traductor,
    no_mapeado: ConceptoNoMapeado,
) -> ExtraccionPeriodo {
    let mut extraccion = ExtraccionPeriodo::default();
    for obra_col in obras_cols {
        if !tabla.tiene_columna(obra_col) {
            continue;
        }
        let datos = procesar_maestro_individual(tabla, obra_col, traductor, no_mapeado);
        extraccion.total.extend(datos.iter().map(|(k, v)| (k.clone(), v.clone())));
        extraccion.por_obra.insert(obra_col.clone(), datos);
    }
    extraccion
}
