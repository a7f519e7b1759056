// Motor de conciliación: extracción por obra social, comparación entre
// períodos, armado de registros finales y orquestación de la corrida.
pub mod extract;
pub mod cambios;
pub mod seleccion;
pub mod salida;
pub mod orquestador;

// Reexportar la API de alto nivel
pub use extract::{extraer_periodo, procesar_maestro_individual, ExtraccionPeriodo};
pub use cambios::comparar_maestros_global;
pub use seleccion::detectar_obras_sociales_con_cambios;
pub use salida::{construir_registros, determinar_concepto, determinar_tipo};
pub use orquestador::{procesar_excel_maestro, verificar_integridad, Entrada, Etapa};
