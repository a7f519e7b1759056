//! Normalización de textos, importes y códigos.
//!
//! Todas las funciones son totales: nunca fallan, devuelven un valor neutro
//! (cadena vacía, `0.0`, `false`) cuando la entrada no sirve.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Tokens que nunca son un código válido aunque vengan en la celda.
const CODIGOS_NULOS: [&str; 6] = ["", "0", "00000000", "nan", "#N/A", "N/A"];

/// Quita espacios extremos, pasa a mayúsculas, elimina acentos y colapsa los
/// espacios internos a uno solo.
///
/// - `normalizar_texto("Café Médico  ") == "CAFE MEDICO"`
/// - `normalizar_texto("  consulta\t\tmédica ") == "CONSULTA MEDICA"`
pub fn normalizar_texto(s: &str) -> String {
    let plano: String = s
        .trim()
        .to_uppercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();
    plano.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Convierte un importe con formato libre (`"$ 1.234,56"`, `"1,234"`, `"500"`)
/// a un `f64` no negativo. Cero significa "sin valor".
///
/// Si hay exactamente una coma y al menos un punto se asume formato
/// latino (punto de miles, coma decimal); en cualquier otro caso las comas se
/// toman como separador de miles.
pub fn limpiar_importe(v: &str) -> f64 {
    let s: String = v.trim().chars().filter(|c| *c != '$' && *c != ' ').collect();
    let comas = s.matches(',').count();
    let puntos = s.matches('.').count();
    let s = if comas == 1 && puntos >= 1 {
        s.replace('.', "").replace(',', ".")
    } else {
        s.replace(',', "")
    };
    match s.parse::<f64>() {
        Ok(valor) if valor.is_finite() && valor > 0.0 => valor,
        _ => 0.0,
    }
}

/// Un código es válido si no es uno de los tokens nulos y su parte entera es
/// estrictamente positiva (`"12.7"` cuenta como 12).
pub fn validar_codigo(cod: &str) -> bool {
    codigo_entero(cod).is_some()
}

/// Parte entera positiva de un código, o `None` si el código no es válido.
fn codigo_entero(cod: &str) -> Option<f64> {
    let cod = cod.trim();
    if CODIGOS_NULOS.contains(&cod) {
        return None;
    }
    let valor = cod.parse::<f64>().ok()?.trunc();
    (valor.is_finite() && valor >= 1.0).then_some(valor)
}

/// Formatea un código válido con 8 dígitos rellenando con ceros a la
/// izquierda (`"123"` → `"00000123"`).
pub fn formatear_codigo(cod: &str) -> Option<String> {
    codigo_entero(cod).map(|v| format!("{:08.0}", v))
}

/// Nombre de archivo seguro a partir del nombre de una obra social: se
/// normaliza y se conservan sólo alfanuméricos, `-` y `_`.
pub fn nombre_archivo_seguro(nombre: &str) -> String {
    normalizar_texto(nombre)
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}
