//! Interface de linha de comando do worker-service baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (serve, submit, status,
//! list, stats, health) e flags globais (--addr, --config, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

pub const DEFAULT_SERVER_ADDR: &str = "http://127.0.0.1:3002";

/// Worker de jobs em background com status consultável.
#[derive(Debug, Parser)]
#[command(name = "worker-service", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// URL base de um worker-service em execução (comandos de cliente).
    #[arg(long, short = 'a', global = true, default_value = DEFAULT_SERVER_ADDR)]
    pub addr: String,

    /// Caminho para o arquivo de configuração TOML (serve).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inicia o servidor HTTP e o worker em background.
    Serve {
        /// Porta de escuta (sobrepõe o arquivo de configuração).
        #[arg(long)]
        port: Option<u16>,
    },

    /// Submete um job do tipo informado.
    Submit {
        /// Tipo do job: email, image, data_sync ou report.
        job_type: String,

        /// Acompanha o job até o fim e imprime o registro final.
        #[arg(long)]
        wait: bool,

        /// Intervalo de consulta em milissegundos durante a espera.
        #[arg(long, default_value_t = 500)]
        poll_ms: u64,
    },

    /// Mostra o status de um job.
    Status {
        job_id: String,
    },

    /// Lista todos os jobs.
    List,

    /// Mostra a contagem de jobs por status.
    Stats,

    /// Verifica se o serviço está no ar.
    Health,
}
