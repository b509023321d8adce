//! Shared helpers for infra integration tests.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use maintrack_common::TokenStore;
use maintrack_domain::ApiConfig;
use maintrack_infra::{ApiClient, AuthApi, MaintenanceApi, Session};
use serde_json::{json, Value};
use tracing::subscriber::DefaultGuard;
use wiremock::MockServer;

/// Everything a caller of the API needs, wired against one mock backend.
pub struct TestStack {
    pub session: Arc<Session>,
    pub auth: AuthApi,
    pub requests: MaintenanceApi,
}

impl TestStack {
    /// Build the façades over `store`, pointing at `server`.
    pub fn new(server: &MockServer, store: Arc<dyn TokenStore>) -> Self {
        let session = Arc::new(Session::new(store));
        let config = ApiConfig::with_base_url(format!("{}/api", server.uri()));
        let client =
            Arc::new(ApiClient::new(config, session.clone()).expect("api client should build"));

        Self {
            session,
            auth: AuthApi::new(client.clone()),
            requests: MaintenanceApi::new(client),
        }
    }
}

/// Minimal server representation of a maintenance request.
pub fn request_json(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "titulo": "Vazamento no banheiro",
        "descricao": "Torneira do banheiro masculino do 2º andar vazando",
        "prioridade": "alta",
        "status": status,
        "localizacao": "2º andar",
        "observacoes": "",
        "anexo": null,
        "solicitante": 12,
        "solicitante_nome": "João Pereira",
        "aprovador": null,
        "aprovador_nome": null,
        "executor": null,
        "executor_nome": null,
        "criado_em": "2024-06-03T08:15:00-03:00",
        "atualizado_em": "2024-06-03T08:15:00-03:00",
        "data_aprovacao": null,
        "data_conclusao": null,
        "historico": []
    })
}

/// Handle for inspecting captured log output during tests.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Route every `tracing` event on this thread into the capture until the
    /// returned guard is dropped.
    pub fn install(&self) -> DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        let guard = self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        String::from_utf8_lossy(&guard).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
