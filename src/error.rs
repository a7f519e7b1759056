//! Errores del motor de aranceles.
//!
//! Los fallos por fila (filas sin importe, conceptos sin traducción, códigos
//! inválidos) nunca llegan aquí: se omiten localmente. Sólo los fallos a nivel
//! de archivo o de estructura abortan una corrida.

use std::path::PathBuf;
use thiserror::Error;

pub type Resultado<T> = std::result::Result<T, ArancelesError>;

#[derive(Debug, Error)]
pub enum ArancelesError {
    /// Falta un archivo de entrada obligatorio.
    #[error("archivo no encontrado: {}", .0.display())]
    NoEncontrado(PathBuf),

    /// La tabla no se pudo leer como planilla.
    #[error("no se pudo leer {}: {detalle}", ruta.display())]
    Formato { ruta: PathBuf, detalle: String },

    /// La tabla existe pero está vacía o no tiene la forma esperada.
    #[error("datos vacíos o con forma inválida: {0}")]
    DatosVacios(String),

    /// No hay traductor disponible (ni personalizado ni por defecto).
    #[error("configuración inválida: {0}")]
    Configuracion(String),

    #[error("el traductor no contiene filas válidas: {}", .0.display())]
    TraductorVacio(PathBuf),

    /// El ZIP de salida no existe o es demasiado chico para ser válido.
    #[error("el archivo ZIP no se generó correctamente: {}", .0.display())]
    Integridad(PathBuf),

    #[error("período inválido '{periodo}': {motivo}")]
    PeriodoInvalido { periodo: String, motivo: String },

    #[error("error escribiendo planilla: {0}")]
    Escritura(String),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
