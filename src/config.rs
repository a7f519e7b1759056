//! Configuración explícita del motor.
//!
//! Nada se lee del entorno dentro del motor: el binario (o quien hospede la
//! biblioteca) arma un `Config` con `Config::from_env` o a mano y lo pasa al
//! orquestador.

use crate::error::{ArancelesError, Resultado};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Nombre del traductor por defecto dentro del directorio media.
pub const TRADUCTOR_DEFAULT: &str = "traductor_default.xlsx";

/// Tamaño mínimo (bytes) que debe tener un ZIP para considerarse válido.
pub const MIN_BYTES_ZIP: u64 = 100;

/// Qué hacer con filas cuyo concepto no figura en el traductor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConceptoNoMapeado {
    /// Se descartan sin dejar rastro.
    #[default]
    Omitir,
    /// Se descartan, pero se registran en el log.
    Advertir,
}

/// Qué hacer si el período no permite armar la etiqueta "año mes".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EtiquetaInvalida {
    /// Usar el período tal cual vino.
    #[default]
    UsarCrudo,
    /// Abortar la corrida con `PeriodoInvalido`.
    Fallar,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Raíz de archivos: `outputs/` y el traductor por defecto viven acá.
    pub directorio_media: PathBuf,
    /// Ruta explícita del traductor por defecto; si es `None` se usa
    /// `<media>/traductor_default.xlsx`.
    pub traductor_default: Option<PathBuf>,
    /// Máximo de filas leídas por planilla.
    pub max_filas: Option<usize>,
    pub min_bytes_zip: u64,
    pub concepto_no_mapeado: ConceptoNoMapeado,
    pub etiqueta_invalida: EtiquetaInvalida,
}

impl Config {
    pub fn new<P: Into<PathBuf>>(directorio_media: P) -> Self {
        Config {
            directorio_media: directorio_media.into(),
            traductor_default: None,
            max_filas: None,
            min_bytes_zip: MIN_BYTES_ZIP,
            concepto_no_mapeado: ConceptoNoMapeado::default(),
            etiqueta_invalida: EtiquetaInvalida::default(),
        }
    }

    /// Carga `.env` (si existe) y lee las variables `ARANCELES_*`.
    pub fn from_env() -> Resultado<Self> {
        let _ = dotenv::dotenv();

        let media = std::env::var("ARANCELES_MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());
        let mut config = Config::new(media);

        if let Ok(ruta) = std::env::var("ARANCELES_TRADUCTOR_DEFAULT") {
            if !ruta.trim().is_empty() {
                config.traductor_default = Some(PathBuf::from(ruta));
            }
        }
        if let Ok(v) = std::env::var("ARANCELES_MAX_FILAS") {
            let n = v.trim().parse::<usize>().map_err(|_| {
                ArancelesError::Configuracion(format!("ARANCELES_MAX_FILAS inválido: {v}"))
            })?;
            config.max_filas = Some(n);
        }
        if let Ok(v) = std::env::var("ARANCELES_MIN_BYTES_ZIP") {
            config.min_bytes_zip = v.trim().parse::<u64>().map_err(|_| {
                ArancelesError::Configuracion(format!("ARANCELES_MIN_BYTES_ZIP inválido: {v}"))
            })?;
        }
        Ok(config)
    }

    pub fn directorio_salida(&self) -> PathBuf {
        self.directorio_media.join("outputs")
    }

    /// Ruta configurada del traductor por defecto (exista o no).
    pub fn ruta_traductor_default(&self) -> PathBuf {
        self.traductor_default
            .clone()
            .unwrap_or_else(|| self.directorio_media.join(TRADUCTOR_DEFAULT))
    }

    /// Traductor por defecto, sólo si el archivo existe.
    pub fn obtener_traductor_default(&self) -> Option<PathBuf> {
        let ruta = self.ruta_traductor_default();
        ruta.exists().then_some(ruta)
    }

    /// Crea el directorio de salida y verifica que se pueda escribir en él.
    pub fn verificar_directorios(&self) -> Resultado<PathBuf> {
        let salida = self.directorio_salida();
        std::fs::create_dir_all(&salida)?;
        probar_escritura(&salida)?;
        info!(salida = %salida.display(), "directorios verificados");
        Ok(salida)
    }
}

fn probar_escritura(dir: &Path) -> Resultado<()> {
    let prueba = dir.join(".test_write");
    if let Err(e) = std::fs::write(&prueba, b"test").and_then(|_| std::fs::remove_file(&prueba)) {
        error!(dir = %dir.display(), error = %e, "sin permisos de escritura");
        return Err(e.into());
    }
    Ok(())
}
