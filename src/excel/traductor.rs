//! Carga del traductor: concepto libre / código OS → rango de códigos.
//!
//! El traductor se lee posicionalmente: columna 0 = concepto, 1 = código OS,
//! 2 = código desde, 3 = código hasta. Con dos índices:
//! ```text
//! por_concepto:  CONCEPTO NORMALIZADO -> (cod_os, cod_desde, cod_hasta)
//! por_cod_os:    cod_os               -> (concepto, cod_desde, cod_hasta)
//! ```
//! Si una clave se repite, la última fila gana.

use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{ArancelesError, Resultado};
use crate::excel::io::{leer_tabla, Tabla};
use crate::models::RangoCodigos;
use crate::normalizar::{formatear_codigo, normalizar_texto};

/// Tokens de código OS que no se indexan.
const COD_OS_NULOS: [&str; 4] = ["", "nan", "#N/A", "N/A"];

#[derive(Debug, Clone, PartialEq)]
pub struct EntradaPorConcepto {
    pub cod_os: String,
    pub rango: RangoCodigos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntradaPorCodigo {
    pub concepto: String,
    pub rango: RangoCodigos,
}

#[derive(Debug, Clone, Default)]
pub struct Traductor {
    pub por_concepto: HashMap<String, EntradaPorConcepto>,
    pub por_cod_os: HashMap<String, EntradaPorCodigo>,
}

impl Traductor {
    /// Construye los índices a partir de una tabla ya leída. Las filas con
    /// rango inválido se descartan.
    pub fn desde_tabla(tabla: &Tabla) -> Self {
        let mut traductor = Traductor::default();
        let mut descartadas = 0usize;

        for i in 0..tabla.filas.len() {
            let concepto = normalizar_texto(tabla.celda(i, 0));
            let cod_os = tabla.celda(i, 1).trim().to_string();

            let rango = match (formatear_codigo(tabla.celda(i, 2)), formatear_codigo(tabla.celda(i, 3))) {
                (Some(cod_desde), Some(cod_hasta)) => RangoCodigos { cod_desde, cod_hasta },
                _ => {
                    descartadas += 1;
                    continue;
                }
            };

            if !concepto.is_empty() {
                traductor.por_concepto.insert(
                    concepto.clone(),
                    EntradaPorConcepto { cod_os: cod_os.clone(), rango: rango.clone() },
                );
            }
            if !COD_OS_NULOS.contains(&cod_os.as_str()) {
                traductor.por_cod_os.insert(cod_os, EntradaPorCodigo { concepto, rango });
            }
        }

        if descartadas > 0 {
            warn!(descartadas, "filas del traductor con rango de códigos inválido");
        }
        traductor
    }

    pub fn is_empty(&self) -> bool {
        self.por_concepto.is_empty() && self.por_cod_os.is_empty()
    }

    /// Busca primero por concepto normalizado y, si no está, por código OS.
    pub fn buscar(&self, concepto: &str, cod_os: &str) -> Option<&RangoCodigos> {
        let concepto_norm = normalizar_texto(concepto);
        if let Some(e) = self.por_concepto.get(&concepto_norm) {
            return Some(&e.rango);
        }
        self.por_cod_os.get(cod_os.trim()).map(|e| &e.rango)
    }
}

/// Lee el traductor desde disco.
///
/// - `NoEncontrado` si el archivo no existe.
/// - `Formato` si no es una planilla legible o no tiene filas.
/// - `TraductorVacio` si ninguna fila sobrevivió la validación.
pub fn cargar_traductor<P: AsRef<Path>>(ruta: P, max_filas: Option<usize>) -> Resultado<Traductor> {
    let ruta = ruta.as_ref();
    info!(ruta = %ruta.display(), "cargando traductor");

    let tabla = leer_tabla(ruta, max_filas)?;
    if tabla.is_empty() {
        return Err(ArancelesError::Formato {
            ruta: ruta.to_path_buf(),
            detalle: "el archivo traductor está vacío".to_string(),
        });
    }

    let traductor = Traductor::desde_tabla(&tabla);
    info!(
        conceptos = traductor.por_concepto.len(),
        codigos = traductor.por_cod_os.len(),
        "traductor cargado"
    );
    if traductor.is_empty() {
        return Err(ArancelesError::TraductorVacio(ruta.to_path_buf()));
    }
    Ok(traductor)
}
