mod common;

use aranceles::config::EtiquetaInvalida;
use aranceles::excel::crear_traductor_default;
use aranceles::models::{ModoProcesamiento, OrigenTraductor};
use aranceles::{procesar_excel_maestro, ArancelesError, Config, Entrada};
use common::{archivos_en, escribir_traductor, escribir_xlsx, leer_hoja_zip, nombres_zip};
use std::path::{Path, PathBuf};

struct Escenario {
    _dir: tempfile::TempDir,
    config: Config,
    base: PathBuf,
}

fn escenario() -> Escenario {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().to_path_buf();
    let config = Config::new(base.join("media"));
    Escenario { _dir: dir, config, base }
}

fn entrada<'a>(actual: &'a Path, periodo: &'a str) -> Entrada<'a> {
    Entrada { ruta_actual: actual, periodo, ruta_anterior: None, ruta_traductor: None }
}

#[test]
fn test_una_obra_genera_una_planilla() {
    let esc = escenario();
    let traductor = esc.base.join("traductor.xlsx");
    escribir_traductor(&traductor);
    let actual = esc.base.join("actual.xlsx");
    escribir_xlsx(
        &actual,
        &[
            &["cod_os", "concepto", "OSDE"],
            &["001", "Consulta Médica", "$ 5.000,50"],
            &["004", "Ecografía", "45000000"],
            &["999", "Desconocido", "100"],
            &["002", "Analisis Clinicos", "0"],
        ],
        true,
    );

    let mut e = entrada(&actual, "2025-09");
    e.ruta_traductor = Some(&traductor);
    let (zip_path, resumen) = procesar_excel_maestro(&esc.config, &e).unwrap();

    assert_eq!(
        zip_path.file_name().unwrap().to_str().unwrap(),
        "Valores Excel Individual 2025 September.zip"
    );
    assert_eq!(resumen.archivos_generados, 1);
    assert_eq!(resumen.archivos_omitidos, 0);
    assert!(!resumen.cambios_detectados);
    assert!(!resumen.excel_cambios_generado);
    assert_eq!(resumen.modo_procesamiento, ModoProcesamiento::Completo);
    assert_eq!(resumen.traductor_usado, OrigenTraductor::Personalizado);

    assert_eq!(nombres_zip(&zip_path), vec!["OSDE_2025-09.xlsx".to_string()]);
    let filas = leer_hoja_zip(&zip_path, "OSDE_2025-09.xlsx", "Datos");
    assert_eq!(
        filas[0],
        vec!["nom_id", "coddesde", "codhasta", "concepto", "importe", "tipo", "plan_nombre", "prof_nombre", "pre_matp", "area"]
    );
    assert_eq!(filas.len(), 3);
    assert_eq!(filas[1][..6], ["1", "42010001", "42019999", "1", "45000000.0", "V"]);
    assert_eq!(filas[2][..6], ["1", "10010001", "10019999", "4", "5000.5", "M"]);
    assert_eq!(filas[2][8..], ["0", "D"]);
}

#[test]
fn test_traductor_por_defecto() {
    let esc = escenario();
    crear_traductor_default(&esc.config).unwrap();
    let actual = esc.base.join("actual.xlsx");
    escribir_xlsx(
        &actual,
        &[
            &["cod_os", "concepto", "OSDE", "Unión Personal"],
            &["001", "Consulta Medica", "100", "200"],
            &["003", "Radiografia", "0", "0"],
        ],
        false,
    );

    let (zip_path, resumen) = procesar_excel_maestro(&esc.config, &entrada(&actual, "2025-01")).unwrap();
    assert_eq!(resumen.traductor_usado, OrigenTraductor::Default);
    assert_eq!(resumen.archivos_generados, 2);
    assert_eq!(
        nombres_zip(&zip_path),
        vec!["OSDE_2025-01.xlsx".to_string(), "UNIONPERSONAL_2025-01.xlsx".to_string()]
    );
}

#[test]
fn test_obra_sin_registros_se_omite() {
    let esc = escenario();
    let traductor = esc.base.join("traductor.xlsx");
    escribir_traductor(&traductor);
    let actual = esc.base.join("actual.xlsx");
    escribir_xlsx(
        &actual,
        &[
            &["cod_os", "concepto", "OSDE", "PAMI"],
            &["001", "Consulta Medica", "100", "0"],
            &["002", "Analisis Clinicos", "250", ""],
        ],
        false,
    );

    let mut e = entrada(&actual, "2025-09");
    e.ruta_traductor = Some(&traductor);
    let (zip_path, resumen) = procesar_excel_maestro(&esc.config, &e).unwrap();
    assert_eq!(resumen.archivos_generados, 1);
    assert_eq!(resumen.archivos_omitidos, 1);
    assert_eq!(nombres_zip(&zip_path), vec!["OSDE_2025-09.xlsx".to_string()]);
}

#[test]
fn test_modo_inteligente_con_reporte_de_cambios() {
    let esc = escenario();
    let traductor = esc.base.join("traductor.xlsx");
    escribir_traductor(&traductor);
    let actual = esc.base.join("actual.xlsx");
    escribir_xlsx(
        &actual,
        &[
            &["cod_os", "concepto", "OSDE", "PAMI"],
            &["001", "Consulta Medica", "200", "300"],
            &["002", "Analisis Clinicos", "150", "400"],
        ],
        false,
    );
    let anterior = esc.base.join("anterior.xlsx");
    escribir_xlsx(
        &anterior,
        &[
            &["cod_os", "concepto", "OSDE", "PAMI"],
            &["001", "Consulta Medica", "100", "300"],
            &["002", "Analisis Clinicos", "150", "400"],
            &["003", "Radiografia", "90", "90"],
        ],
        false,
    );

    let mut e = entrada(&actual, "2025-09");
    e.ruta_traductor = Some(&traductor);
    e.ruta_anterior = Some(&anterior);
    let (zip_path, resumen) = procesar_excel_maestro(&esc.config, &e).unwrap();

    assert_eq!(resumen.modo_procesamiento, ModoProcesamiento::Inteligente);
    assert!(resumen.cambios_detectados);
    assert!(resumen.excel_cambios_generado);
    // PAMI perdió la fila 003, OSDE cambió un importe
    assert_eq!(resumen.archivos_generados, 2);
    assert_eq!(
        nombres_zip(&zip_path),
        vec![
            "OSDE_2025-09.xlsx".to_string(),
            "PAMI_2025-09.xlsx".to_string(),
            "cambios_global_2025-09.xlsx".to_string(),
        ]
    );

    let cambios = leer_hoja_zip(&zip_path, "cambios_global_2025-09.xlsx", "Sheet1");
    assert_eq!(
        cambios[0],
        vec!["cod_os_antes", "cod_os_actual", "concepto_antes", "concepto_actual", "estado", "OSDE", "PAMI", "repetido"]
    );
    assert_eq!(cambios.len(), 2);
    assert_eq!(cambios[1][..5], ["003", "", "Radiografia", "", "Eliminado"]);
    assert_eq!(cambios[1][5..7], ["Eliminado", "Eliminado"]);

    // el reporte temporal ya no está en disco
    assert_eq!(archivos_en(&esc.config.directorio_salida()), vec![zip_path.clone()]);
}

#[test]
fn test_sin_cambios_de_concepto_no_hay_reporte() {
    let esc = escenario();
    let traductor = esc.base.join("traductor.xlsx");
    escribir_traductor(&traductor);
    let actual = esc.base.join("actual.xlsx");
    escribir_xlsx(
        &actual,
        &[
            &["cod_os", "concepto", "OSDE", "PAMI"],
            &["001", "Consulta Medica", "200", "300"],
        ],
        false,
    );
    let anterior = esc.base.join("anterior.xlsx");
    escribir_xlsx(
        &anterior,
        &[
            &["cod_os", "concepto", "OSDE", "PAMI"],
            &["001", "Consulta Medica", "100", "300"],
        ],
        false,
    );

    let mut e = entrada(&actual, "2025-09");
    e.ruta_traductor = Some(&traductor);
    e.ruta_anterior = Some(&anterior);
    let (zip_path, resumen) = procesar_excel_maestro(&esc.config, &e).unwrap();

    assert_eq!(resumen.modo_procesamiento, ModoProcesamiento::Inteligente);
    assert!(!resumen.cambios_detectados);
    assert!(!resumen.excel_cambios_generado);
    assert_eq!(resumen.archivos_generados, 1);
    assert_eq!(nombres_zip(&zip_path), vec!["OSDE_2025-09.xlsx".to_string()]);
}

#[test]
fn test_anterior_ilegible_pasa_a_modo_completo() {
    let esc = escenario();
    let traductor = esc.base.join("traductor.xlsx");
    escribir_traductor(&traductor);
    let actual = esc.base.join("actual.xlsx");
    escribir_xlsx(
        &actual,
        &[&["cod_os", "concepto", "OSDE"], &["001", "Consulta Medica", "100"]],
        false,
    );
    let anterior = esc.base.join("anterior.xlsx");
    std::fs::write(&anterior, b"no es un excel").unwrap();

    let mut e = entrada(&actual, "2025-09");
    e.ruta_traductor = Some(&traductor);
    e.ruta_anterior = Some(&anterior);
    let (_, resumen) = procesar_excel_maestro(&esc.config, &e).unwrap();
    assert_eq!(resumen.modo_procesamiento, ModoProcesamiento::Completo);
    assert_eq!(resumen.archivos_generados, 1);
}

#[test]
fn test_etiqueta_invalida_usa_periodo_crudo() {
    let esc = escenario();
    let traductor = esc.base.join("traductor.xlsx");
    escribir_traductor(&traductor);
    let actual = esc.base.join("actual.xlsx");
    escribir_xlsx(
        &actual,
        &[&["cod_os", "concepto", "OSDE"], &["001", "Consulta Medica", "100"]],
        false,
    );

    let mut e = entrada(&actual, "septiembre");
    e.ruta_traductor = Some(&traductor);
    let (zip_path, _) = procesar_excel_maestro(&esc.config, &e).unwrap();
    assert_eq!(
        zip_path.file_name().unwrap().to_str().unwrap(),
        "Valores Excel Individual septiembre.zip"
    );
    assert_eq!(nombres_zip(&zip_path), vec!["OSDE_septiembre.xlsx".to_string()]);

    let mut config = esc.config.clone();
    config.etiqueta_invalida = EtiquetaInvalida::Fallar;
    let err = procesar_excel_maestro(&config, &e).unwrap_err();
    assert!(matches!(err, ArancelesError::PeriodoInvalido { .. }));
}

#[test]
fn test_maestro_actual_inexistente() {
    let esc = escenario();
    let actual = esc.base.join("no_existe.xlsx");
    let err = procesar_excel_maestro(&esc.config, &entrada(&actual, "2025-09")).unwrap_err();
    assert!(matches!(err, ArancelesError::NoEncontrado(_)));
}

#[test]
fn test_sin_traductor_disponible() {
    let esc = escenario();
    let actual = esc.base.join("actual.xlsx");
    escribir_xlsx(
        &actual,
        &[&["cod_os", "concepto", "OSDE"], &["001", "Consulta Medica", "100"]],
        false,
    );
    let err = procesar_excel_maestro(&esc.config, &entrada(&actual, "2025-09")).unwrap_err();
    assert!(matches!(err, ArancelesError::Configuracion(_)));
}

#[test]
fn test_maestro_con_pocas_columnas() {
    let esc = escenario();
    let traductor = esc.base.join("traductor.xlsx");
    escribir_traductor(&traductor);
    let actual = esc.base.join("actual.xlsx");
    escribir_xlsx(&actual, &[&["cod_os", "concepto"], &["001", "Consulta Medica"]], false);

    let mut e = entrada(&actual, "2025-09");
    e.ruta_traductor = Some(&traductor);
    let err = procesar_excel_maestro(&esc.config, &e).unwrap_err();
    assert!(matches!(err, ArancelesError::DatosVacios(_)));
}

#[test]
fn test_zip_sin_planillas_falla_integridad() {
    let esc = escenario();
    let traductor = esc.base.join("traductor.xlsx");
    escribir_traductor(&traductor);
    let actual = esc.base.join("actual.xlsx");
    escribir_xlsx(
        &actual,
        &[&["cod_os", "concepto", "OSDE"], &["999", "Desconocido", "100"]],
        false,
    );

    let mut e = entrada(&actual, "2025-09");
    e.ruta_traductor = Some(&traductor);
    let err = procesar_excel_maestro(&esc.config, &e).unwrap_err();
    assert!(matches!(err, ArancelesError::Integridad(_)));
}
