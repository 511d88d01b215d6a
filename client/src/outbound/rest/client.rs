//! Reqwest-backed adapter for the hosted REST service.
//!
//! This adapter owns transport details only: URL and header construction,
//! HTTP error mapping, and JSON decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::dto::{
    ApplicationRow, InsertApplicationDto, InsertProjectDto, InsertRoleDto, MemberRow, ProjectRow,
    RoleRow, ServiceErrorDto,
};
use super::query::Endpoints;
use crate::domain::ports::{
    ApplicationRepository, BackendError, MemberRepository, ProjectRepository, RoleRepository,
};
use crate::domain::{
    Application, ApplicationWithProject, NewApplication, NewProject, NewRole, Project,
    ProjectFilter, ProjectId, ProjectMember, ProjectWithOwner, ProjectWithRoleCount, Role, UserId,
};

/// Connection settings for [`RestBackend`].
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Service root, e.g. `https://abc.supabase.co`.
    pub service_url: Url,
    /// Public API key sent as `apikey`.
    pub anon_key: String,
    /// Signed-in user's token; the anon key is used when absent.
    pub access_token: Option<String>,
    /// Per-request timeout. No timeout when `None`.
    pub request_timeout: Option<Duration>,
}

/// Error building a REST adapter.
#[derive(Debug, thiserror::Error)]
pub enum RestSetupError {
    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub(super) fn build_client(config: &RestConfig) -> Result<Client, RestSetupError> {
    let bearer = config.access_token.as_deref().unwrap_or(&config.anon_key);
    let mut headers = HeaderMap::new();
    headers.insert("apikey", HeaderValue::from_str(&config.anon_key)?);
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {bearer}"))?,
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let mut builder = Client::builder().default_headers(headers);
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Repository adapter speaking PostgREST to the hosted service.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    endpoints: Endpoints,
}

impl RestBackend {
    /// Build an adapter for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error when a credential is not a valid header value or the
    /// reqwest client cannot be constructed.
    pub fn new(config: &RestConfig) -> Result<Self, RestSetupError> {
        Ok(Self {
            client: build_client(config)?,
            endpoints: Endpoints::new(config.service_url.clone()),
        })
    }

    /// Root URL requests are issued against.
    #[must_use]
    pub const fn service_url(&self) -> &Url {
        self.endpoints.base()
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        target: Result<Url, url::ParseError>,
    ) -> Result<Vec<T>, BackendError> {
        let url = target.map_err(map_url_error)?;
        debug!(%url, "GET");
        send_json(self.client.get(url)).await
    }

    async fn insert_rows<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<Vec<T>, BackendError> {
        let url = self.endpoints.table(table).map_err(map_url_error)?;
        debug!(%url, "POST");
        let request = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        send_json(request).await
    }
}

pub(super) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, BackendError> {
    let response = request.send().await.map_err(|error| map_transport_error(&error))?;
    let status = response.status();
    let body = response.bytes().await.map_err(|error| map_transport_error(&error))?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    serde_json::from_slice(body.as_ref())
        .map_err(|error| BackendError::decode(format!("invalid response payload: {error}")))
}

fn decode_all<R, T>(
    rows: Vec<R>,
    convert: impl Fn(R) -> Result<T, String>,
) -> Result<Vec<T>, BackendError> {
    rows.into_iter()
        .map(convert)
        .collect::<Result<Vec<_>, _>>()
        .map_err(BackendError::decode)
}

fn single<T>(rows: Vec<T>, what: &str) -> Result<T, BackendError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| BackendError::decode(format!("insert into {what} returned no rows")))
}

fn map_url_error(error: url::ParseError) -> BackendError {
    BackendError::connection(format!("invalid service URL: {error}"))
}

pub(super) fn map_transport_error(error: &reqwest::Error) -> BackendError {
    if error.is_decode() {
        BackendError::decode(error.to_string())
    } else {
        BackendError::connection(error.to_string())
    }
}

/// Map a non-2xx response, keeping the service's `message` verbatim.
pub(super) fn map_status_error(status: StatusCode, body: &[u8]) -> BackendError {
    let dto: ServiceErrorDto = serde_json::from_slice(body).unwrap_or_default();
    let message = dto
        .message
        .or(dto.description)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("status {}", status.as_u16()));

    let constraint = dto
        .code
        .as_deref()
        .is_some_and(|code| code.starts_with("23"));
    if constraint || status == StatusCode::CONFLICT {
        BackendError::constraint(message)
    } else if status == StatusCode::NOT_FOUND {
        BackendError::not_found(message)
    } else if status.is_server_error() {
        BackendError::connection(message)
    } else {
        BackendError::query(message)
    }
}

#[async_trait]
impl ProjectRepository for RestBackend {
    async fn insert_project(&self, project: &NewProject) -> Result<Project, BackendError> {
        let rows: Vec<ProjectRow> = self
            .insert_rows("projects", &InsertProjectDto::from(project))
            .await?;
        single(decode_all(rows, ProjectRow::into_domain)?, "projects")
    }

    async fn list_projects(
        &self,
        filter: ProjectFilter,
    ) -> Result<Vec<ProjectWithRoleCount>, BackendError> {
        let rows: Vec<ProjectRow> = self.get_rows(self.endpoints.list_projects(filter)).await?;
        decode_all(rows, ProjectRow::into_with_role_count)
    }

    async fn find_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Option<ProjectWithOwner>, BackendError> {
        let rows: Vec<ProjectRow> = self
            .get_rows(self.endpoints.find_project(project_id))
            .await?;
        Ok(decode_all(rows, ProjectRow::into_with_owner)?
            .into_iter()
            .next())
    }
}

#[async_trait]
impl RoleRepository for RestBackend {
    async fn insert_roles(&self, roles: &[NewRole]) -> Result<Vec<Role>, BackendError> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }
        let body: Vec<InsertRoleDto<'_>> = roles.iter().map(InsertRoleDto::from).collect();
        let rows: Vec<RoleRow> = self.insert_rows("roles", &body).await?;
        decode_all(rows, RoleRow::into_domain)
    }

    async fn list_roles_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Role>, BackendError> {
        let rows: Vec<RoleRow> = self
            .get_rows(self.endpoints.roles_for_project(project_id))
            .await?;
        decode_all(rows, RoleRow::into_domain)
    }
}

#[async_trait]
impl ApplicationRepository for RestBackend {
    async fn insert_application(
        &self,
        application: &NewApplication,
    ) -> Result<Application, BackendError> {
        let rows: Vec<ApplicationRow> = self
            .insert_rows("applications", &InsertApplicationDto::from(application))
            .await?;
        single(decode_all(rows, ApplicationRow::into_domain)?, "applications")
    }

    async fn list_applications_for_applicant(
        &self,
        applicant_id: &UserId,
    ) -> Result<Vec<ApplicationWithProject>, BackendError> {
        let rows: Vec<ApplicationRow> = self
            .get_rows(self.endpoints.applications_for(applicant_id))
            .await?;
        Ok(decode_all(rows, ApplicationRow::into_with_project)?
            .into_iter()
            .flatten()
            .collect())
    }
}

#[async_trait]
impl MemberRepository for RestBackend {
    async fn list_members(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<ProjectMember>, BackendError> {
        let rows: Vec<MemberRow> = self.get_rows(self.endpoints.members(project_id)).await?;
        Ok(rows.into_iter().map(ProjectMember::from).collect())
    }
}
