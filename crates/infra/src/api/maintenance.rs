//! Typed access to the `/requisicoes/` resource
//!
//! Each method is one HTTP call through the authenticated pipeline. No
//! business rule is checked here: title length, allowed transitions and
//! permissions are the backend's call and come back as [`ApiError`]s.

use std::sync::Arc;

use maintrack_domain::{
    MaintenanceRequest, MaintenanceRequestPatch, NewMaintenanceRequest, Page, RequestFilter,
    RequestId, RequestStatus, StatusChange,
};
use tracing::{debug, instrument};

use super::client::ApiClient;
use super::errors::ApiError;
use super::request::{ApiRequest, MultipartBody};

const COLLECTION: &str = "/requisicoes/";

fn item_path(id: RequestId) -> String {
    format!("{COLLECTION}{id}/")
}

/// Maintenance request façade
#[derive(Debug, Clone)]
pub struct MaintenanceApi {
    client: Arc<ApiClient>,
}

impl MaintenanceApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// GET `/requisicoes/` with the filter's query parameters.
    ///
    /// Paginated and bare-array responses are both accepted; only the
    /// returned page is read.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &RequestFilter) -> Result<Vec<MaintenanceRequest>, ApiError> {
        let request = ApiRequest::get(COLLECTION).query(filter.to_query());
        let page: Page<MaintenanceRequest> = self.client.execute(request).await?;
        Ok(page.into_items())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: RequestId) -> Result<MaintenanceRequest, ApiError> {
        self.client.get(&item_path(id)).await
    }

    /// POST `/requisicoes/`.
    ///
    /// Sent as `multipart/form-data` (file under `anexo`) when the input
    /// carries an attachment, as JSON otherwise.
    #[instrument(skip(self, input), fields(title = %input.title, attachment = input.attachment.is_some()))]
    pub async fn create(
        &self,
        input: &NewMaintenanceRequest,
    ) -> Result<MaintenanceRequest, ApiError> {
        let request = match &input.attachment {
            Some(attachment) => {
                debug!(file = %attachment.file_name, bytes = attachment.len(), "uploading attachment");
                let form = input
                    .form_fields()
                    .into_iter()
                    .fold(MultipartBody::new(), |form, (name, value)| form.text(name, value))
                    .file("anexo", attachment.clone());
                ApiRequest::post(COLLECTION).multipart(form)
            }
            None => ApiRequest::post(COLLECTION).json(input)?,
        };
        self.client.execute(request).await
    }

    /// PATCH `/requisicoes/{id}/` with only the fields set in `patch`.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: RequestId,
        patch: &MaintenanceRequestPatch,
    ) -> Result<MaintenanceRequest, ApiError> {
        self.client.patch(&item_path(id), patch).await
    }

    /// POST `/requisicoes/{id}/atualizar_status/`.
    #[instrument(skip(self, note))]
    pub async fn update_status(
        &self,
        id: RequestId,
        status: RequestStatus,
        note: Option<String>,
    ) -> Result<MaintenanceRequest, ApiError> {
        let path = format!("{}atualizar_status/", item_path(id));
        self.client.post(&path, &StatusChange::new(status, note)).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: RequestId) -> Result<(), ApiError> {
        self.client.delete(&item_path(id)).await
    }

    /// Requests opened by the logged-in user.
    #[instrument(skip(self))]
    pub async fn mine(&self) -> Result<Vec<MaintenanceRequest>, ApiError> {
        let page: Page<MaintenanceRequest> =
            self.client.get(&format!("{COLLECTION}minhas_requisicoes/")).await?;
        Ok(page.into_items())
    }

    /// Requests still waiting for approval.
    #[instrument(skip(self))]
    pub async fn pending(&self) -> Result<Vec<MaintenanceRequest>, ApiError> {
        let page: Page<MaintenanceRequest> =
            self.client.get(&format!("{COLLECTION}pendentes/")).await?;
        Ok(page.into_items())
    }
}
