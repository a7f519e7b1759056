//! Orquestador de una corrida completa.
//!
//! ```text
//! Inicio → CargarTraductor → CargarActual → CargarAnterior → ExtraerTodo
//!        → Comparar → SeleccionarObras → GenerarZip → Listo
//! ```
//! Cualquier etapa puede terminar en `Fallido`. Los archivos temporales (el
//! reporte de cambios antes de entrar al ZIP) se borran al salir, haya error
//! o no.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use zip::write::FileOptions;
use zip::CompressionMethod;

use crate::algorithm::cambios::comparar_maestros_global;
use crate::algorithm::extract::{extraer_periodo, ExtraccionPeriodo};
use crate::algorithm::salida::construir_registros;
use crate::algorithm::seleccion::detectar_obras_sociales_con_cambios;
use crate::config::{Config, EtiquetaInvalida};
use crate::error::{ArancelesError, Resultado};
use crate::excel::escritura::{escribir_cambios_global, planilla_obra_bytes};
use crate::excel::{cargar_traductor, leer_tabla, Tabla};
use crate::models::{ModoProcesamiento, OrigenTraductor, ResumenProcesamiento};
use crate::normalizar::nombre_archivo_seguro;
use crate::periodo::etiqueta_periodo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Etapa {
    Inicio,
    CargarTraductor,
    CargarActual,
    CargarAnterior,
    ExtraerTodo,
    Comparar,
    SeleccionarObras,
    GenerarZip,
    Listo,
    Fallido,
}

impl fmt::Display for Etapa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Entradas de una corrida.
#[derive(Debug, Clone)]
pub struct Entrada<'a> {
    pub ruta_actual: &'a Path,
    /// Período `YYYY-MM`; se usa en los nombres de archivo.
    pub periodo: &'a str,
    pub ruta_anterior: Option<&'a Path>,
    /// Traductor personalizado; si falta se usa el por defecto.
    pub ruta_traductor: Option<&'a Path>,
}

/// Procesa el maestro actual (y el anterior si lo hay) y genera el ZIP con
/// una planilla por obra social más, si corresponde, el reporte de cambios.
/// Devuelve la ruta del ZIP y el resumen de la corrida.
pub fn procesar_excel_maestro(
    config: &Config,
    entrada: &Entrada<'_>,
) -> Resultado<(PathBuf, ResumenProcesamiento)> {
    info!(
        actual = %entrada.ruta_actual.display(),
        anterior = ?entrada.ruta_anterior,
        traductor = ?entrada.ruta_traductor,
        periodo = entrada.periodo,
        "inicio de procesamiento"
    );

    let mut etapa = Etapa::Inicio;
    let resultado = ejecutar(config, entrada, &mut etapa);
    match &resultado {
        Ok((zip_path, resumen)) => info!(
            etapa = %Etapa::Listo,
            zip = %zip_path.display(),
            generados = resumen.archivos_generados,
            omitidos = resumen.archivos_omitidos,
            "procesamiento completado"
        ),
        Err(e) => error!(etapa = %Etapa::Fallido, desde = %etapa, error = %e, "error en procesamiento"),
    }
    resultado
}

fn avanzar(etapa: &mut Etapa, siguiente: Etapa) {
    *etapa = siguiente;
    info!(etapa = %siguiente, "etapa");
}

fn ejecutar(
    config: &Config,
    entrada: &Entrada<'_>,
    etapa: &mut Etapa,
) -> Resultado<(PathBuf, ResumenProcesamiento)> {
    let salida = config.verificar_directorios()?;

    if !entrada.ruta_actual.exists() {
        return Err(ArancelesError::NoEncontrado(entrada.ruta_actual.to_path_buf()));
    }

    avanzar(etapa, Etapa::CargarTraductor);
    let default = config.obtener_traductor_default();
    let ruta_traductor = match (entrada.ruta_traductor, &default) {
        (Some(ruta), _) => ruta.to_path_buf(),
        (None, Some(ruta)) => ruta.clone(),
        (None, None) => {
            return Err(ArancelesError::Configuracion(
                "no se encontró traductor por defecto; suba uno personalizado".to_string(),
            ));
        }
    };
    let traductor_usado = if default.as_deref() == Some(ruta_traductor.as_path()) {
        OrigenTraductor::Default
    } else {
        OrigenTraductor::Personalizado
    };
    let traductor = cargar_traductor(&ruta_traductor, config.max_filas)?;

    avanzar(etapa, Etapa::CargarActual);
    let tabla_actual = leer_tabla(entrada.ruta_actual, config.max_filas)?;
    if tabla_actual.is_empty() {
        return Err(ArancelesError::DatosVacios("el Excel maestro actual está vacío".to_string()));
    }
    if tabla_actual.num_columnas() < 3 {
        return Err(ArancelesError::DatosVacios(
            "el Excel debe tener al menos 3 columnas: cod_os, concepto y obras sociales".to_string(),
        ));
    }
    let obras_cols: Vec<String> = tabla_actual.encabezados[2..].to_vec();
    info!(obras = obras_cols.len(), "obras sociales encontradas");

    avanzar(etapa, Etapa::CargarAnterior);
    let tabla_anterior = entrada
        .ruta_anterior
        .and_then(|ruta| cargar_anterior(ruta, config.max_filas));

    let etiqueta = match (etiqueta_periodo(entrada.periodo), config.etiqueta_invalida) {
        (Some(etiqueta), _) => etiqueta,
        (None, EtiquetaInvalida::UsarCrudo) => entrada.periodo.to_string(),
        (None, EtiquetaInvalida::Fallar) => {
            return Err(ArancelesError::PeriodoInvalido {
                periodo: entrada.periodo.to_string(),
                motivo: "no se pudo armar la etiqueta año/mes".to_string(),
            });
        }
    };
    let zip_path = salida.join(format!("Valores Excel Individual {}.zip", etiqueta));
    info!(zip = %zip_path.display(), "ZIP a generar");

    let mut resumen = ResumenProcesamiento {
        archivos_generados: 0,
        archivos_omitidos: 0,
        cambios_detectados: false,
        excel_cambios_generado: false,
        modo_procesamiento: ModoProcesamiento::Completo,
        traductor_usado,
    };

    avanzar(etapa, Etapa::ExtraerTodo);
    let no_mapeado = config.concepto_no_mapeado;
    let extraccion_actual = extraer_periodo(&tabla_actual, &obras_cols, &traductor, no_mapeado);
    let extraccion_anterior = tabla_anterior
        .as_ref()
        .map(|t| extraer_periodo(t, &obras_cols, &traductor, no_mapeado))
        .unwrap_or_default();

    avanzar(etapa, Etapa::Comparar);
    // Se borra al salir de esta función, con o sin error
    let mut cambios_temp = None;
    if tabla_anterior.is_some() && !extraccion_anterior.total.is_empty() {
        let cambios = comparar_maestros_global(
            &extraccion_actual.total,
            &extraccion_anterior.total,
            &obras_cols,
            &tabla_actual,
        );
        if !cambios.is_empty() {
            let temp = tempfile::Builder::new()
                .prefix(&format!("cambios_global_{}_", entrada.periodo))
                .suffix(".xlsx")
                .tempfile_in(&salida)?
                .into_temp_path();
            escribir_cambios_global(&temp, &cambios, &obras_cols)?;
            resumen.cambios_detectados = true;
            resumen.excel_cambios_generado = true;
            cambios_temp = Some(temp);
        }
    }

    avanzar(etapa, Etapa::SeleccionarObras);
    let obras_a_procesar = match &tabla_anterior {
        Some(t) => {
            resumen.modo_procesamiento = ModoProcesamiento::Inteligente;
            detectar_obras_sociales_con_cambios(&extraccion_actual, Some((&extraccion_anterior, t)), &obras_cols)
        }
        None => detectar_obras_sociales_con_cambios(&extraccion_actual, None, &obras_cols),
    };

    avanzar(etapa, Etapa::GenerarZip);
    let mut zip = zip::ZipWriter::new(File::create(&zip_path)?);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(6));

    if let Some(temp) = &cambios_temp {
        let contenido = std::fs::read(temp)?;
        zip.start_file(format!("cambios_global_{}.xlsx", entrada.periodo), options)?;
        zip.write_all(&contenido)?;
    }

    let mut nombres_usados: HashSet<String> = HashSet::new();
    for obra_col in obras_cols.iter().filter(|o| obras_a_procesar.contains(*o)) {
        match planilla_obra(&extraccion_actual, obra_col) {
            Ok(Some(bytes)) => {
                let nombre = format!("{}_{}.xlsx", nombre_archivo_seguro(obra_col), entrada.periodo);
                if !nombres_usados.insert(nombre.clone()) {
                    warn!(obra = %obra_col, archivo = %nombre, "nombre de archivo repetido, obra omitida");
                    resumen.archivos_omitidos += 1;
                    continue;
                }
                zip.start_file(nombre, options)?;
                zip.write_all(&bytes)?;
                resumen.archivos_generados += 1;
            }
            Ok(None) => resumen.archivos_omitidos += 1,
            Err(e) => {
                error!(obra = %obra_col, error = %e, "error procesando obra social");
                resumen.archivos_omitidos += 1;
            }
        }
    }
    zip.finish()?;

    verificar_integridad(&zip_path, config.min_bytes_zip)?;
    Ok((zip_path, resumen))
}

/// El maestro anterior es opcional: si no existe, no se puede leer o está
/// vacío se sigue en modo completo.
fn cargar_anterior(ruta: &Path, max_filas: Option<usize>) -> Option<Tabla> {
    if !ruta.exists() {
        warn!(ruta = %ruta.display(), "maestro anterior inexistente, se ignora");
        return None;
    }
    match leer_tabla(ruta, max_filas) {
        Ok(t) if !t.is_empty() => Some(t),
        Ok(_) => {
            warn!(ruta = %ruta.display(), "maestro anterior vacío, se ignora");
            None
        }
        Err(e) => {
            warn!(ruta = %ruta.display(), error = %e, "error leyendo maestro anterior");
            None
        }
    }
}

/// Planilla `.xlsx` de una obra social, o `None` si no tiene registros.
fn planilla_obra(extraccion: &ExtraccionPeriodo, obra_col: &str) -> Resultado<Option<Vec<u8>>> {
    let Some(datos) = extraccion.obra(obra_col) else {
        return Ok(None);
    };
    match construir_registros(datos) {
        Some(registros) => planilla_obra_bytes(&registros).map(Some),
        None => Ok(None),
    }
}

/// Falla con `Integridad` si el ZIP no existe o pesa menos de `min_bytes`.
pub fn verificar_integridad(zip_path: &Path, min_bytes: u64) -> Resultado<u64> {
    match std::fs::metadata(zip_path) {
        Ok(meta) if meta.is_file() && meta.len() >= min_bytes => Ok(meta.len()),
        _ => Err(ArancelesError::Integridad(zip_path.to_path_buf())),
    }
}
