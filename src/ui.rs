//! Interface de terminal do worker-service: spinners e saída colorida.
//!
//! Usa as crates `indicatif` para spinners de progresso e `console` para
//! estilização com cores. O [`JobProgress`] acompanha visualmente um job
//! da submissão até o status terminal.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::state_machine::{JobRecord, JobStatus};

/// Indicador visual de progresso exibido enquanto `submit --wait` consulta um job.
pub struct JobProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
}

impl JobProgress {
    pub fn start(job_id: &str, job_type: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("{job_type} {job_id}: queued"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
        }
    }

    /// Atualiza a mensagem do spinner para refletir o último status consultado.
    pub fn update(&self, record: &JobRecord) {
        self.pb
            .set_message(format!("{} {}: {}", record.job_type, record.id, record.status));
    }

    /// Finaliza o spinner e exibe o resultado final do job.
    pub fn finish(&self, record: &JobRecord) {
        self.pb.finish_and_clear();
        match record.status {
            JobStatus::Completed => {
                println!("  {} Job {} completed", self.green.apply_to("✓"), record.id);
            }
            _ => {
                let reason = record.error.as_deref().unwrap_or("unknown error");
                println!("  {} Job {} failed: {reason}", self.red.apply_to("✗"), record.id);
            }
        }
        print_json(record);
    }
}

/// Imprime qualquer corpo de resposta formatado em JSON.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("failed to render response: {e}"),
    }
}

/// Uma linha por job, com o nome do status colorido.
pub fn status_line(record: &JobRecord) -> String {
    let style = match record.status {
        JobStatus::Completed => Style::new().green(),
        JobStatus::Failed => Style::new().red(),
        JobStatus::Processing => Style::new().yellow(),
        JobStatus::Queued => Style::new().dim(),
    };
    format!(
        "{}  {:<10}  {}",
        record.id,
        record.job_type,
        style.apply_to(record.status)
    )
}
