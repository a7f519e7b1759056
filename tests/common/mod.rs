// Helpers compartidos por los tests de integración: armado de planillas
// `.xlsx` de prueba y lectura de los ZIP generados.
#![allow(dead_code)]

use calamine::{Data, Reader, Xlsx};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// Escribe una planilla con la primera fila como encabezado. Con `numeros`,
/// las celdas de datos que parsean como número (y no empiezan con 0) se
/// escriben como celdas numéricas.
pub fn escribir_xlsx(ruta: &Path, filas: &[&[&str]], numeros: bool) {
    let mut libro = umya_spreadsheet::new_file();
    let hoja = libro.get_sheet_by_name_mut("Sheet1").unwrap();
    for (i, fila) in filas.iter().enumerate() {
        for (j, valor) in fila.iter().enumerate() {
            let celda = hoja.get_cell_mut((j as u32 + 1, i as u32 + 1));
            let numero = valor.parse::<f64>().ok().filter(|_| !valor.starts_with('0'));
            match numero {
                Some(n) if numeros && i > 0 => {
                    celda.set_value_number(n);
                }
                _ => {
                    celda.set_value_string(*valor);
                }
            }
        }
    }
    umya_spreadsheet::writer::xlsx::write(&libro, ruta).unwrap();
}

/// Traductor con las cinco filas de ejemplo.
pub fn escribir_traductor(ruta: &Path) {
    escribir_xlsx(
        ruta,
        &[
            &["Concepto", "cod_os", "cod_desde", "cod_hasta"],
            &["CONSULTA MEDICA", "001", "10010001", "10019999"],
            &["ANALISIS CLINICOS", "002", "20010001", "20019999"],
            &["RADIOGRAFIA", "003", "30010001", "30019999"],
            &["ECOGRAFIA", "004", "42010001", "42019999"],
            &["INTERNACION", "005", "50010001", "50019999"],
        ],
        false,
    );
}

/// Nombres de las entradas del ZIP, ordenados.
pub fn nombres_zip(ruta: &Path) -> Vec<String> {
    let archivo = std::fs::File::open(ruta).unwrap();
    let zip = zip::ZipArchive::new(archivo).unwrap();
    let mut nombres: Vec<String> = zip.file_names().map(|s| s.to_string()).collect();
    nombres.sort();
    nombres
}

/// Lee la primera hoja de una planilla guardada dentro del ZIP.
pub fn leer_hoja_zip(ruta: &Path, entrada: &str, hoja: &str) -> Vec<Vec<String>> {
    let archivo = std::fs::File::open(ruta).unwrap();
    let mut zip = zip::ZipArchive::new(archivo).unwrap();
    let mut bytes = Vec::new();
    zip.by_name(entrada).unwrap().read_to_end(&mut bytes).unwrap();

    let mut libro: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
    let range = libro.worksheet_range(hoja).unwrap();
    range
        .rows()
        .map(|r| r.iter().map(celda_texto).collect())
        .collect()
}

fn celda_texto(c: &Data) -> String {
    match c {
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        otro => otro.to_string(),
    }
}

/// Archivos que quedaron en un directorio.
pub fn archivos_en(dir: &Path) -> Vec<PathBuf> {
    let mut v: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    v.sort();
    v
}
