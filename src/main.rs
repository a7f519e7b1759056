// --- Generador de planillas de aranceles por obra social ---

use anyhow::{Context, Result};
use aranceles::excel::crear_traductor_default;
use aranceles::periodo::validar_periodo;
use aranceles::{procesar_excel_maestro, Config, Entrada};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "aranceles", about = "Genera planillas individuales por obra social a partir del maestro de aranceles")]
struct Cli {
    #[command(subcommand)]
    comando: Comando,
}

#[derive(Subcommand)]
enum Comando {
    /// Procesa el maestro actual (y opcionalmente el anterior) y genera el ZIP
    Procesar {
        #[arg(long)]
        actual: PathBuf,
        /// Período YYYY-MM
        #[arg(long)]
        periodo: String,
        #[arg(long)]
        anterior: Option<PathBuf>,
        /// Traductor personalizado; si falta se usa el por defecto
        #[arg(long)]
        traductor: Option<PathBuf>,
    },
    /// Crea el traductor de ejemplo en la ruta por defecto
    CrearTraductorDefault,
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();
    let config = Config::from_env().context("leyendo configuración")?;

    match cli.comando {
        Comando::Procesar { actual, periodo, anterior, traductor } => {
            validar_periodo(&periodo, chrono::Local::now().year())?;
            let entrada = Entrada {
                ruta_actual: &actual,
                periodo: &periodo,
                ruta_anterior: anterior.as_deref(),
                ruta_traductor: traductor.as_deref(),
            };
            let (zip_path, resumen) = procesar_excel_maestro(&config, &entrada)?;
            println!("{}", zip_path.display());
            println!("{}", serde_json::to_string_pretty(&resumen)?);
        }
        Comando::CrearTraductorDefault => {
            let ruta = crear_traductor_default(&config)?;
            info!(ruta = %ruta.display(), "listo");
            println!("{}", ruta.display());
        }
    }
    Ok(())
}
