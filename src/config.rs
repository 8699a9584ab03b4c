//! Configuração do worker-service carregada a partir de `worker.toml`.
//!
//! A struct [`WorkerConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `WORKER_PORT` tem precedência sobre o arquivo.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "worker.toml";
pub const PORT_ENV_VAR: &str = "WORKER_PORT";

/// Maior unidade de tempo aceita: uma hora por unidade do catálogo.
pub const MAX_TIME_UNIT_MS: u64 = 3_600_000;

/// Configuração de nível superior carregada de `worker.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    /// Interface em que o servidor HTTP escuta.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Nome informado pelo endpoint de health.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Duração de uma unidade de tempo do catálogo, em milissegundos.
    #[serde(default = "default_time_unit_ms")]
    pub time_unit_ms: u64,

    /// Executa os jobs ainda enfileirados antes de o worker encerrar.
    #[serde(default)]
    pub drain_on_shutdown: bool,
}

// Valor padrão para o host: todas as interfaces.
fn default_host() -> String {
    "0.0.0.0".to_string()
}

// Valor padrão para a porta: 3002.
fn default_port() -> u16 {
    3002
}

fn default_service_name() -> String {
    "worker-service".to_string()
}

// Uma unidade do catálogo equivale a um segundo.
fn default_time_unit_ms() -> u64 {
    1000
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            service_name: default_service_name(),
            time_unit_ms: default_time_unit_ms(),
            drain_on_shutdown: false,
        }
    }
}

impl WorkerConfig {
    /// Carrega a configuração em `path`.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str::<WorkerConfig>(&contents)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            Self::default()
        };

        // Variável de ambiente tem precedência sobre o arquivo para a porta.
        if let Ok(port) = std::env::var(PORT_ENV_VAR) {
            config.apply_port_override(&port)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_port_override(&mut self, raw: &str) -> Result<()> {
        if raw.is_empty() {
            return Ok(());
        }
        self.port = raw
            .parse()
            .with_context(|| format!("{PORT_ENV_VAR} is not a valid port: {raw}"))?;
        Ok(())
    }

    /// Rejeita valores fora dos limites suportados.
    pub fn validate(&self) -> Result<()> {
        if self.time_unit_ms > MAX_TIME_UNIT_MS {
            bail!(
                "time_unit_ms = {} exceeds the maximum of {MAX_TIME_UNIT_MS}",
                self.time_unit_ms
            );
        }
        Ok(())
    }

    pub fn time_unit(&self) -> Duration {
        Duration::from_millis(self.time_unit_ms)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = WorkerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3002);
        assert_eq!(config.service_name, "worker-service");
        assert_eq!(config.time_unit(), Duration::from_secs(1));
        assert!(!config.drain_on_shutdown);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            port = 4000
            time_unit_ms = 10
        "#;
        let config: WorkerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.time_unit_ms, 10);
        assert_eq!(config.host, "0.0.0.0");
        assert!(!config.drain_on_shutdown);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"127.0.0.1\"\ndrain_on_shutdown = true").unwrap();

        let config = WorkerConfig::load_from(file.path()).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert!(config.drain_on_shutdown);
    }

    #[test]
    fn load_from_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkerConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.time_unit_ms, 1000);
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        assert!(WorkerConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn load_rejects_oversized_time_unit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "time_unit_ms = {}", u64::MAX).unwrap();
        let err = WorkerConfig::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("time_unit_ms"));
    }

    #[test]
    fn validate_accepts_bounds() {
        let at_limit = WorkerConfig {
            time_unit_ms: MAX_TIME_UNIT_MS,
            ..WorkerConfig::default()
        };
        assert!(at_limit.validate().is_ok());

        let zero = WorkerConfig {
            time_unit_ms: 0,
            ..WorkerConfig::default()
        };
        assert!(zero.validate().is_ok());

        let over = WorkerConfig {
            time_unit_ms: MAX_TIME_UNIT_MS + 1,
            ..WorkerConfig::default()
        };
        assert!(over.validate().is_err());
    }

    #[test]
    fn port_override() {
        let mut config = WorkerConfig::default();
        config.apply_port_override("8080").unwrap();
        assert_eq!(config.port, 8080);

        config.apply_port_override("").unwrap();
        assert_eq!(config.port, 8080);

        assert!(config.apply_port_override("eighty").is_err());
    }

    #[test]
    fn bind_addr_combines_host_and_port() {
        let config = WorkerConfig {
            host: "127.0.0.1".into(),
            port: 9000,
            ..WorkerConfig::default()
        };
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:9000");
    }
}
