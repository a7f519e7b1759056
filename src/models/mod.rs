// Estructuras de datos principales

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Rango de códigos de facturación (8 dígitos, con ceros a la izquierda).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangoCodigos {
    pub cod_desde: String,
    pub cod_hasta: String,
}

/// Fila de un período ya traducida a su rango de códigos.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistroExtraido {
    pub concepto_original: String,
    pub cod_os: String,
    pub cod_desde: String,
    pub cod_hasta: String,
    pub valor: f64,
}

/// Registros de una obra social, indexados por `CONCEPTO NORMALIZADO_codigo`,
/// en orden de fila. Una inserción con clave repetida reemplaza el valor
/// anterior sin moverlo de lugar.
pub type RegistrosObra = IndexMap<String, RegistroExtraido>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EstadoCambio {
    Nuevo,
    Modificado,
    Eliminado,
}

impl fmt::Display for EstadoCambio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EstadoCambio::Nuevo => "Nuevo",
            EstadoCambio::Modificado => "Modificado",
            EstadoCambio::Eliminado => "Eliminado",
        };
        f.write_str(s)
    }
}

/// Valor de una obra social dentro de una fila del reporte de cambios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ValorCambio {
    Importe(f64),
    /// No se encontró la fila o la columna en el maestro actual.
    Vacio,
    /// El código ya no existe en el período actual.
    Eliminado,
}

/// Una fila del reporte global de cambios: un código cuya asociación con un
/// concepto apareció, desapareció o cambió entre períodos.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CambioGlobal {
    pub cod_os_antes: String,
    pub cod_os_actual: String,
    pub concepto_antes: String,
    pub concepto_actual: String,
    pub estado: EstadoCambio,
    /// Un valor por obra social, en el orden de las columnas del maestro.
    pub valores: Vec<ValorCambio>,
    pub repetido: bool,
}

/// Fila final de la planilla individual de una obra social.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistroSalida {
    pub nom_id: String,
    pub coddesde: String,
    pub codhasta: String,
    pub concepto: String,
    pub importe: String,
    pub tipo: String,
    pub plan_nombre: String,
    pub prof_nombre: String,
    pub pre_matp: String,
    pub area: String,
    /// Importe numérico, usado para ordenar y deduplicar.
    #[serde(skip)]
    pub importe_num: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModoProcesamiento {
    /// Sin maestro anterior: se regeneran todas las obras sociales.
    Completo,
    /// Con maestro anterior: sólo las obras sociales con cambios.
    Inteligente,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrigenTraductor {
    Default,
    Personalizado,
}

/// Resumen devuelto al finalizar una corrida.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumenProcesamiento {
    pub archivos_generados: usize,
    pub archivos_omitidos: usize,
    pub cambios_detectados: bool,
    pub excel_cambios_generado: bool,
    pub modo_procesamiento: ModoProcesamiento,
    pub traductor_usado: OrigenTraductor,
}
