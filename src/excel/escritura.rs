//! Escritura de planillas de salida con `umya-spreadsheet`.

use std::io::Cursor;
use std::path::Path;
use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::error::{ArancelesError, Resultado};
use crate::models::{CambioGlobal, RegistroSalida, ValorCambio};
use crate::normalizar::normalizar_texto;

/// Encabezado de las planillas individuales por obra social.
pub const COLUMNAS_SALIDA: [&str; 10] = [
    "nom_id",
    "coddesde",
    "codhasta",
    "concepto",
    "importe",
    "tipo",
    "plan_nombre",
    "prof_nombre",
    "pre_matp",
    "area",
];

const HOJA_SALIDA: &str = "Datos";
const HOJA_CAMBIOS: &str = "Sheet1";

fn libro_nuevo(nombre_hoja: &str) -> Resultado<Spreadsheet> {
    let mut libro = umya_spreadsheet::new_file();
    let hoja = libro
        .get_sheet_by_name_mut("Sheet1")
        .ok_or_else(|| ArancelesError::Escritura("libro nuevo sin hoja inicial".to_string()))?;
    hoja.set_name(nombre_hoja);
    Ok(libro)
}

fn hoja_mut<'a>(libro: &'a mut Spreadsheet, nombre: &str) -> Resultado<&'a mut Worksheet> {
    libro
        .get_sheet_by_name_mut(nombre)
        .ok_or_else(|| ArancelesError::Escritura(format!("no existe la hoja {nombre}")))
}

fn escribir_texto(hoja: &mut Worksheet, col: usize, fila: usize, valor: &str) {
    hoja.get_cell_mut((col as u32, fila as u32)).set_value_string(valor);
}

/// Serializa los registros de una obra social como `.xlsx` en memoria.
pub fn planilla_obra_bytes(registros: &[RegistroSalida]) -> Resultado<Vec<u8>> {
    let mut libro = libro_nuevo(HOJA_SALIDA)?;
    let hoja = hoja_mut(&mut libro, HOJA_SALIDA)?;

    for (i, col) in COLUMNAS_SALIDA.iter().enumerate() {
        escribir_texto(hoja, i + 1, 1, col);
    }
    for (i, r) in registros.iter().enumerate() {
        let fila = i + 2;
        let valores = [
            &r.nom_id,
            &r.coddesde,
            &r.codhasta,
            &r.concepto,
            &r.importe,
            &r.tipo,
            &r.plan_nombre,
            &r.prof_nombre,
            &r.pre_matp,
            &r.area,
        ];
        for (j, v) in valores.iter().enumerate() {
            escribir_texto(hoja, j + 1, fila, v);
        }
    }

    let mut buf = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&libro, &mut buf)
        .map_err(|e| ArancelesError::Escritura(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Escribe el reporte global de cambios en `ruta`. Las columnas de importes
/// llevan el nombre normalizado de cada obra social.
pub fn escribir_cambios_global(
    ruta: &Path,
    cambios: &[CambioGlobal],
    obras_cols: &[String],
) -> Resultado<()> {
    let mut libro = libro_nuevo(HOJA_CAMBIOS)?;
    let hoja = hoja_mut(&mut libro, HOJA_CAMBIOS)?;

    let mut encabezado: Vec<String> = ["cod_os_antes", "cod_os_actual", "concepto_antes", "concepto_actual", "estado"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    encabezado.extend(obras_cols.iter().map(|o| normalizar_texto(o)));
    encabezado.push("repetido".to_string());
    for (i, h) in encabezado.iter().enumerate() {
        escribir_texto(hoja, i + 1, 1, h);
    }

    for (i, c) in cambios.iter().enumerate() {
        let fila = i + 2;
        escribir_texto(hoja, 1, fila, &c.cod_os_antes);
        escribir_texto(hoja, 2, fila, &c.cod_os_actual);
        escribir_texto(hoja, 3, fila, &c.concepto_antes);
        escribir_texto(hoja, 4, fila, &c.concepto_actual);
        escribir_texto(hoja, 5, fila, &c.estado.to_string());

        for (j, v) in c.valores.iter().enumerate() {
            let celda = hoja.get_cell_mut(((6 + j) as u32, fila as u32));
            match v {
                ValorCambio::Importe(x) => {
                    celda.set_value_number(*x);
                }
                ValorCambio::Vacio => {}
                ValorCambio::Eliminado => {
                    celda.set_value_string("Eliminado");
                }
            }
        }

        let repetido = if c.repetido { "Repetido" } else { "" };
        escribir_texto(hoja, 6 + c.valores.len(), fila, repetido);
    }

    umya_spreadsheet::writer::xlsx::write(&libro, ruta)
        .map_err(|e| ArancelesError::Escritura(e.to_string()))
}
