use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ArancelesError, Resultado};

/// Planilla en memoria: encabezados de la primera fila y filas de datos como
/// texto. Se usa tanto para los maestros como para el traductor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tabla {
    pub encabezados: Vec<String>,
    pub filas: Vec<Vec<String>>,
}

impl Tabla {
    pub fn new(encabezados: Vec<String>, filas: Vec<Vec<String>>) -> Self {
        Tabla { encabezados: desambiguar_encabezados(encabezados), filas }
    }

    pub fn num_columnas(&self) -> usize {
        self.encabezados.len()
    }

    /// Sin filas de datos (o sin columnas) cuenta como vacía.
    pub fn is_empty(&self) -> bool {
        self.filas.is_empty() || self.encabezados.is_empty()
    }

    /// Posición de la columna con ese encabezado exacto.
    pub fn columna(&self, nombre: &str) -> Option<usize> {
        self.encabezados.iter().position(|h| h == nombre)
    }

    pub fn tiene_columna(&self, nombre: &str) -> bool {
        self.columna(nombre).is_some()
    }

    /// Texto de una celda; las celdas fuera de rango se leen como vacías.
    pub fn celda(&self, fila: usize, col: usize) -> &str {
        self.filas
            .get(fila)
            .and_then(|f| f.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Convierte un `Data` de calamine a String. Los flotantes enteros se
/// escriben sin parte decimal (`10010001.0` → `"10010001"`).
pub fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Int(i) => format!("{}", i),
        Data::Bool(b) => format!("{}", b),
        Data::Empty => String::new(),
        Data::Error(_) => String::new(),
        Data::DateTime(s) => s.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Encabezados vacíos pasan a `Unnamed: <i>` y los repetidos reciben sufijo
/// `.1`, `.2`, ... para que cada columna tenga un nombre único.
fn desambiguar_encabezados(crudos: Vec<String>) -> Vec<String> {
    let mut vistos: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(crudos.len());
    for (i, h) in crudos.into_iter().enumerate() {
        let base = if h.is_empty() { format!("Unnamed: {}", i) } else { h };
        let nombre = match vistos.get_mut(&base) {
            Some(n) => {
                *n += 1;
                format!("{}.{}", base, n)
            }
            None => {
                vistos.insert(base.clone(), 0);
                base
            }
        };
        out.push(nombre);
    }
    out
}

/// Lee la primera hoja del archivo como `Tabla`.
///
/// - `NoEncontrado` si la ruta no existe.
/// - `Formato` si calamine no puede abrir el libro o la hoja.
/// - Las filas completamente vacías se descartan; si `max_filas` está
///   definido, las filas sobrantes se ignoran.
pub fn leer_tabla<P: AsRef<Path>>(ruta: P, max_filas: Option<usize>) -> Resultado<Tabla> {
    let ruta = ruta.as_ref();
    if !ruta.exists() {
        return Err(ArancelesError::NoEncontrado(ruta.to_path_buf()));
    }
    let formato = |detalle: String| ArancelesError::Formato { ruta: PathBuf::from(ruta), detalle };

    let mut workbook = open_workbook_auto(ruta).map_err(|e| formato(e.to_string()))?;
    let primera = match workbook.sheet_names().first() {
        Some(nombre) => nombre.clone(),
        None => return Err(formato("el libro no tiene hojas".to_string())),
    };
    let range = workbook.worksheet_range(&primera).map_err(|e| formato(e.to_string()))?;

    // El rango usado puede no empezar en A1; se rellenan las columnas previas
    let col_inicial = range.start().map(|(_, c)| c as usize).unwrap_or(0);

    let mut filas_iter = range.rows().map(|r| {
        let mut fila = vec![String::new(); col_inicial];
        fila.extend(r.iter().map(cell_to_string));
        fila
    });

    let encabezados = match filas_iter.next() {
        Some(h) => h,
        None => return Ok(Tabla::default()),
    };
    let ancho = encabezados.len();

    let mut filas: Vec<Vec<String>> = Vec::new();
    let mut truncada = false;
    for mut fila in filas_iter {
        if fila.iter().all(|c| c.is_empty()) {
            continue;
        }
        if max_filas.is_some_and(|max| filas.len() >= max) {
            truncada = true;
            break;
        }
        fila.resize(ancho, String::new());
        filas.push(fila);
    }
    if truncada {
        warn!(ruta = %ruta.display(), max_filas = ?max_filas, "planilla truncada al máximo de filas");
    }

    debug!(ruta = %ruta.display(), columnas = ancho, filas = filas.len(), "planilla leída");
    Ok(Tabla::new(encabezados, filas))
}
