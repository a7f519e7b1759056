//! Construcción de los registros finales de una obra social: tipo, concepto
//! numérico, orden por importe y deduplicación por rango de códigos.

use std::collections::HashSet;

use crate::models::{RegistroSalida, RegistrosObra};
use crate::normalizar::formatear_codigo;

/// Importes por debajo de este umbral son tipo "M".
const UMBRAL_TIPO_M: f64 = 14_000_000.0;
/// Franja de importes (inclusive) de tipo "C".
const FRANJA_TIPO_C: (f64, f64) = (40_000_000.0, 44_000_000.0);
/// Rango de códigos (inclusive) que fuerza concepto 1.
const RANGO_CONCEPTO_1: (i64, i64) = (42_000_000, 43_000_000);

/// Tipo según el importe: "M", "C" o "V".
pub fn determinar_tipo(valor: f64) -> &'static str {
    if valor < UMBRAL_TIPO_M {
        "M"
    } else if (FRANJA_TIPO_C.0..=FRANJA_TIPO_C.1).contains(&valor) {
        "C"
    } else {
        "V"
    }
}

fn codigo_como_entero(cod: &str) -> Option<i64> {
    let cod = cod.trim();
    if cod.is_empty() {
        return Some(0);
    }
    cod.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v.trunc() as i64)
}

/// Concepto numérico: 1 si alguno de los códigos cae en 42M–43M; si no,
/// 4 para tipo "M", 1 para "V" y 4 para el resto. Un código ilegible da 4.
pub fn determinar_concepto(cod_desde: &str, cod_hasta: &str, tipo: &str) -> u8 {
    let (Some(desde), Some(hasta)) = (codigo_como_entero(cod_desde), codigo_como_entero(cod_hasta)) else {
        return 4;
    };
    let en_rango = |c: i64| (RANGO_CONCEPTO_1.0..=RANGO_CONCEPTO_1.1).contains(&c);
    if en_rango(desde) || en_rango(hasta) {
        return 1;
    }
    match tipo {
        "M" => 4,
        "V" => 1,
        _ => 4,
    }
}

/// Texto del importe, como lo escribe una planilla exportada desde pandas:
/// los enteros llevan `.0` (`100` → `"100.0"`) y fuera de `[1e-4, 1e16)` se
/// usa notación científica con exponente de al menos dos dígitos
/// (`1e16` → `"1e+16"`, `0.00001` → `"1e-05"`).
pub fn formatear_importe(valor: f64) -> String {
    if !valor.is_finite() || valor == 0.0 {
        return format!("{:.1}", valor);
    }
    let cientifica = format!("{:e}", valor);
    let (mantisa, exponente) = match cientifica.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (cientifica.as_str(), 0),
    };
    if !(-4..16).contains(&exponente) {
        let signo = if exponente < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantisa, signo, exponente.abs());
    }
    if valor.fract() == 0.0 {
        format!("{:.1}", valor)
    } else {
        format!("{}", valor)
    }
}

/// Arma los registros finales de una obra social. Devuelve `None` si no hay
/// registros (la obra se omite).
///
/// El resultado queda ordenado por importe descendente y sin rangos
/// (coddesde, codhasta) repetidos: sobrevive el de mayor importe; ante
/// empate, el de la fila más temprana del maestro.
pub fn construir_registros(datos: &RegistrosObra) -> Option<Vec<RegistroSalida>> {
    let mut registros: Vec<RegistroSalida> = datos
        .values()
        .map(|d| {
            let tipo = determinar_tipo(d.valor);
            let concepto = determinar_concepto(&d.cod_desde, &d.cod_hasta, tipo);
            RegistroSalida {
                nom_id: "1".to_string(),
                coddesde: formatear_codigo(&d.cod_desde).unwrap_or_default(),
                codhasta: formatear_codigo(&d.cod_hasta).unwrap_or_default(),
                concepto: concepto.to_string(),
                importe: formatear_importe(d.valor),
                tipo: tipo.to_string(),
                plan_nombre: String::new(),
                prof_nombre: String::new(),
                pre_matp: "0".to_string(),
                area: "D".to_string(),
                importe_num: d.valor,
            }
        })
        .collect();
    if registros.is_empty() {
        return None;
    }

    registros.sort_by(|a, b| b.importe_num.total_cmp(&a.importe_num));
    Some(deduplicar(registros))
}

/// Conserva la primera aparición de cada par (coddesde, codhasta).
pub fn deduplicar(registros: Vec<RegistroSalida>) -> Vec<RegistroSalida> {
    let mut vistos: HashSet<(String, String)> = HashSet::new();
    registros
        .into_iter()
        .filter(|r| vistos.insert((r.coddesde.clone(), r.codhasta.clone())))
        .collect()
}
