//! Módulo `excel`: lectura y escritura de planillas.
//!
//! Submódulos:
//! - `io`: lectura de la primera hoja de un libro como `Tabla`
//! - `traductor`: carga e índices del traductor concepto/código → rango
//! - `escritura`: planillas individuales por obra social y reporte de cambios
//! - `traductor_default`: genera el traductor de ejemplo

pub mod io;
pub mod traductor;
pub mod escritura;
pub mod traductor_default;

pub use io::{leer_tabla, Tabla};
pub use traductor::{cargar_traductor, Traductor};
pub use traductor_default::crear_traductor_default;
