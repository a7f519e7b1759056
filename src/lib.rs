// Biblioteca raíz del crate `aranceles`.
// Traduce el maestro de aranceles por obra social a planillas individuales
// listas para el sistema de facturación, empaquetadas en un ZIP.
pub mod algorithm;
pub mod config;
pub mod error;
pub mod excel;
pub mod models;
pub mod normalizar;
pub mod periodo;

/// Punto de entrada principal (reexport para facilitar uso desde `main`)
pub use algorithm::{procesar_excel_maestro, Entrada};
pub use config::Config;
pub use error::{ArancelesError, Resultado};
pub use models::ResumenProcesamiento;
