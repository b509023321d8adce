//! Maintenance request read model and its status lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned request identifier
pub type RequestId = u64;

/// Urgency of a maintenance request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "baixa")]
    Low,
    #[default]
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "alta")]
    High,
}

crate::impl_wire_code_conversions!(Priority {
    Low => "baixa" | "low",
    Medium => "media" | "medium",
    High => "alta" | "high",
});

/// Lifecycle state of a maintenance request
///
/// ```text
/// pendente ──► em_andamento ──► concluido
///    │              │
///    └──────────────┴─────────► cancelado
/// ```
///
/// The backend owns this graph. [`RequestStatus::can_transition_to`] only
/// mirrors it so a UI can hide actions that would certainly be refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RequestStatus {
    #[default]
    #[serde(rename = "pendente")]
    Pending,
    #[serde(rename = "em_andamento")]
    InProgress,
    #[serde(rename = "concluido")]
    Completed,
    #[serde(rename = "cancelado")]
    Cancelled,
}

crate::impl_wire_code_conversions!(RequestStatus {
    Pending => "pendente" | "pending",
    InProgress => "em_andamento" | "in_progress" | "in-progress",
    Completed => "concluido" | "completed",
    Cancelled => "cancelado" | "cancelled" | "canceled",
});

impl RequestStatus {
    /// All states, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::InProgress, Self::Completed, Self::Cancelled];

    /// No transition leaves a terminal state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the backend's transition graph has an edge `self → next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::Pending | Self::InProgress, Self::Completed | Self::Cancelled)
        )
    }

    /// States reachable in one step.
    #[must_use]
    pub fn next_states(self) -> Vec<Self> {
        Self::ALL.into_iter().filter(|next| self.can_transition_to(*next)).collect()
    }
}

/// Append-only audit entry for a status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryRecord {
    pub id: u64,
    #[serde(rename = "status_anterior")]
    pub previous_status: RequestStatus,
    #[serde(rename = "status_novo")]
    pub new_status: RequestStatus,
    #[serde(rename = "observacao", default)]
    pub note: String,
    #[serde(rename = "usuario_nome", default, deserialize_with = "blank_as_none")]
    pub actor_name: Option<String>,
    #[serde(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
}

/// Snapshot of a maintenance request as last returned by the server
///
/// Owned and mutated exclusively by the backend. Any change goes through the
/// API façade and is only trusted once the server echoes the new state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub id: RequestId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "prioridade")]
    pub priority: Priority,
    pub status: RequestStatus,
    #[serde(rename = "localizacao", default, deserialize_with = "blank_as_none")]
    pub location: Option<String>,
    #[serde(rename = "observacoes", default, deserialize_with = "blank_as_none")]
    pub notes: Option<String>,
    /// URL of the uploaded file, as served by the backend
    #[serde(rename = "anexo", default, deserialize_with = "blank_as_none")]
    pub attachment: Option<String>,
    #[serde(rename = "solicitante")]
    pub requester_id: u64,
    #[serde(rename = "solicitante_nome", default)]
    pub requester_name: String,
    #[serde(rename = "aprovador", default)]
    pub approver_id: Option<u64>,
    #[serde(rename = "aprovador_nome", default, deserialize_with = "blank_as_none")]
    pub approver_name: Option<String>,
    #[serde(rename = "executor", default)]
    pub executor_id: Option<u64>,
    #[serde(rename = "executor_nome", default, deserialize_with = "blank_as_none")]
    pub executor_name: Option<String>,
    #[serde(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "atualizado_em")]
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "data_aprovacao", default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(rename = "data_conclusao", default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(rename = "historico", default)]
    pub history: Vec<StatusHistoryRecord>,
}

impl MaintenanceRequest {
    /// Most recent history entry, if the server included history.
    #[must_use]
    pub fn last_change(&self) -> Option<&StatusHistoryRecord> {
        self.history.iter().max_by_key(|record| record.created_at)
    }
}

/// Django serializes blank `CharField`s as `""`; treat them like `null`.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_json() -> serde_json::Value {
        json!({
            "id": 42,
            "titulo": "Lâmpada queimada",
            "descricao": "A lâmpada do corredor B está queimada",
            "prioridade": "alta",
            "status": "em_andamento",
            "localizacao": "",
            "observacoes": null,
            "anexo": "http://localhost:8000/media/anexos/2024/05/01/foto.jpg",
            "solicitante": 7,
            "solicitante_nome": "Ana Souza",
            "aprovador": 3,
            "aprovador_nome": "Carlos Lima",
            "executor": null,
            "executor_nome": null,
            "criado_em": "2024-05-01T10:00:00.123456-03:00",
            "atualizado_em": "2024-05-01T12:30:00Z",
            "data_aprovacao": "2024-05-01T12:30:00Z",
            "data_conclusao": null,
            "historico": [
                {
                    "id": 1,
                    "status_anterior": "pendente",
                    "status_novo": "em_andamento",
                    "observacao": "Equipe a caminho",
                    "usuario_nome": "Carlos Lima",
                    "criado_em": "2024-05-01T12:30:00Z"
                }
            ]
        })
    }

    #[test]
    fn decodes_backend_payload() {
        let request: MaintenanceRequest = serde_json::from_value(sample_json()).unwrap();

        assert_eq!(request.id, 42);
        assert_eq!(request.priority, Priority::High);
        assert_eq!(request.status, RequestStatus::InProgress);
        assert_eq!(request.location, None, "blank location decodes as None");
        assert_eq!(request.notes, None);
        assert_eq!(request.approver_id, Some(3));
        assert_eq!(request.executor_name, None);
        assert_eq!(request.created_at.to_rfc3339(), "2024-05-01T13:00:00.123456+00:00");
        assert!(request.completed_at.is_none());
        assert_eq!(request.history.len(), 1);
        assert_eq!(request.history[0].previous_status, RequestStatus::Pending);
    }

    #[test]
    fn decodes_list_shape_without_history() {
        let mut value = sample_json();
        value.as_object_mut().unwrap().remove("historico");
        value.as_object_mut().unwrap().remove("data_aprovacao");

        let request: MaintenanceRequest = serde_json::from_value(value).unwrap();
        assert!(request.history.is_empty());
        assert!(request.approved_at.is_none());
        assert!(request.last_change().is_none());
    }

    #[test]
    fn status_wire_codes() {
        assert_eq!(serde_json::to_value(RequestStatus::InProgress).unwrap(), "em_andamento");
        assert_eq!("in_progress".parse::<RequestStatus>().unwrap(), RequestStatus::InProgress);
        assert_eq!("cancelado".parse::<RequestStatus>().unwrap(), RequestStatus::Cancelled);
        assert_eq!(RequestStatus::Completed.to_string(), "concluido");
    }

    #[test]
    fn priority_wire_codes() {
        assert_eq!(serde_json::to_value(Priority::Medium).unwrap(), "media");
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn transition_graph_matches_backend() {
        use RequestStatus::*;

        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Pending.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(!InProgress.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(Cancelled.next_states().is_empty());
        assert_eq!(InProgress.next_states(), vec![Completed, Cancelled]);
    }

    #[test]
    fn terminal_states() {
        assert!(RequestStatus::Completed.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
        assert!(!RequestStatus::Pending.is_terminal());
    }
}
