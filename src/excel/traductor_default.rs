use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::error::{ArancelesError, Resultado};

/// Filas de ejemplo: (concepto, cod_os, cod_desde, cod_hasta).
const FILAS_EJEMPLO: [(&str, &str, &str, &str); 5] = [
    ("CONSULTA MEDICA", "001", "10010001", "10019999"),
    ("ANALISIS CLINICOS", "002", "20010001", "20019999"),
    ("RADIOGRAFIA", "003", "30010001", "30019999"),
    ("ECOGRAFIA", "004", "42010001", "42019999"),
    ("INTERNACION", "005", "50010001", "50019999"),
];

/// Crea un traductor de ejemplo en la ruta por defecto configurada,
/// reemplazando el existente. Devuelve la ruta escrita.
pub fn crear_traductor_default(config: &Config) -> Resultado<PathBuf> {
    let ruta = config.ruta_traductor_default();
    if let Some(dir) = ruta.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let mut libro = umya_spreadsheet::new_file();
    let hoja = libro
        .get_sheet_by_name_mut("Sheet1")
        .ok_or_else(|| ArancelesError::Escritura("libro nuevo sin hoja inicial".to_string()))?;

    for (col, h) in ["Concepto", "cod_os", "cod_desde", "cod_hasta"].iter().enumerate() {
        hoja.get_cell_mut((col as u32 + 1, 1)).set_value_string(*h);
    }
    for (i, (concepto, cod_os, desde, hasta)) in FILAS_EJEMPLO.iter().enumerate() {
        let fila = i as u32 + 2;
        for (col, v) in [concepto, cod_os, desde, hasta].iter().enumerate() {
            hoja.get_cell_mut((col as u32 + 1, fila)).set_value_string(**v);
        }
    }

    umya_spreadsheet::writer::xlsx::write(&libro, &ruta)
        .map_err(|e| ArancelesError::Escritura(e.to_string()))?;
    info!(ruta = %ruta.display(), "traductor por defecto creado");
    Ok(ruta)
}
