//! Tipos de erro para o cliente do worker-service.
//!
//! Define [`ClientError`] com variantes para erros da API e erros de rede.
//! Usa `thiserror` para derivar `Display` e `Error`.

use thiserror::Error;

/// Erros que podem ocorrer ao se comunicar com um worker-service.
///
/// - [`Api`](ClientError::Api): o servidor respondeu com status não-2xx
/// - [`Network`](ClientError::Network): a requisição não obteve resposta
#[derive(Debug, Error)]
pub enum ClientError {
    /// Resposta não-2xx. `message` vem do campo `error` do corpo quando o
    /// servidor o envia; caso contrário, é o corpo bruto.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ClientError::Api {
            status: 404,
            message: "Job not found".into(),
        };
        assert_eq!(err.to_string(), "API error (status 404): Job not found");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientError>();
    }
}
