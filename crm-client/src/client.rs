use async_trait::async_trait;
use reqwest::{
    cookie::Jar,
    header::REFERER,
    Client, RequestBuilder, Response, StatusCode, Url,
};
use serde::{de::DeserializeOwned, Deserialize};
use std::sync::Arc;

use crate::{
    domain::{AnalyticsReport, CaseSummary, DateRange, NewTimeEntry, TaskId, TaskStatus, TimeEntry},
    CrmApi, CrmError, CrmUrl, Credentials, CsrfToken, CSRF_FIELD, CSRF_HEADER, SESSION_COOKIE,
};

const TIME_ENTRIES_PATH: &str = "/api/time-entries/";
const CREATE_TIME_ENTRY_PATH: &str = "/api/time-entries/create/";
const ANALYTICS_PATH: &str = "/api/analytics/";
const CASE_SEARCH_PATH: &str = "/api/cases/search/";

fn task_status_path(task_id: TaskId) -> String {
    format!("/api/tasks/{}/update-status/", task_id)
}

/// Body of the status-update endpoint.
#[derive(Debug, Deserialize)]
struct StatusUpdateResponse {
    success: bool,
}

/// HTTP client for the CRM's JSON endpoints.
///
/// Cookies set by the server are kept in a jar for the lifetime of the
/// client; mutating requests are form-encoded and carry the CSRF token.
#[derive(Debug, Clone)]
pub struct CrmClient {
    client: Client,
    base_url: CrmUrl,
    csrf_token: Option<CsrfToken>,
}

impl CrmClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, CrmError> {
        let base_url = CrmUrl::parse(base_url)?;
        let jar = Arc::new(Jar::default());

        if let Some(session_id) = &credentials.session_id {
            jar.add_cookie_str(
                &format!("{}={}; Path=/", SESSION_COOKIE, session_id),
                &base_url.as_url()?,
            );
        }

        let client = Client::builder()
            .cookie_provider(jar)
            .build()
            .map_err(|e| CrmError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            csrf_token: credentials.csrf_token,
        })
    }

    pub fn has_csrf_token(&self) -> bool {
        self.csrf_token.is_some()
    }

    /// Load `page_path` and keep the token from its hidden form field.
    pub async fn fetch_csrf_token(&mut self, page_path: &str) -> Result<(), CrmError> {
        let call_name = format!("GET {}", page_path);
        let response = self
            .send(self.client.get(self.endpoint(page_path)?), &call_name)
            .await?;
        let html = response
            .text()
            .await
            .map_err(|e| CrmError::Parsing(format!("Failed to read {}: {}", call_name, e)))?;

        let token = CsrfToken::from_html(&html).ok_or(CrmError::MissingCsrfToken)?;
        tracing::debug!("Loaded CSRF token from {}", page_path);
        self.csrf_token = Some(token);
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, CrmError> {
        self.base_url.append_path(path)
    }

    fn post_form(
        &self,
        path: &str,
        mut fields: Vec<(&'static str, String)>,
    ) -> Result<RequestBuilder, CrmError> {
        let token = self
            .csrf_token
            .as_ref()
            .ok_or(CrmError::MissingCsrfToken)?;
        fields.push((CSRF_FIELD, token.as_str().to_string()));

        Ok(self
            .client
            .post(self.endpoint(path)?)
            .header(CSRF_HEADER, token.as_str())
            .header("X-Requested-With", "XMLHttpRequest")
            .header(REFERER, self.base_url.as_ref())
            .form(&fields))
    }

    async fn send(&self, request: RequestBuilder, call_name: &str) -> Result<Response, CrmError> {
        tracing::debug!("Calling {}", call_name);

        let response = request
            .send()
            .await
            .map_err(|e| CrmError::transport(format!("Failed to call {}: {}", call_name, e)))?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            tracing::warn!("{} was refused with {}", call_name, status);
            return Err(CrmError::Unauthorized);
        }
        if !status.is_success() {
            tracing::warn!("{} returned {}", call_name, status);
            return Err(CrmError::Status {
                call: call_name.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<T, CrmError> {
        let response = self.send(request, call_name).await?;
        response.json::<T>().await.map_err(|e| {
            CrmError::Parsing(format!("Failed to parse {} response: {}", call_name, e))
        })
    }

    async fn send_without_body(
        &self,
        request: RequestBuilder,
        call_name: &str,
    ) -> Result<(), CrmError> {
        let response = self.send(request, call_name).await?;
        let _ = response.bytes().await;
        Ok(())
    }
}

#[async_trait]
impl CrmApi for CrmClient {
    async fn update_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> Result<(), CrmError> {
        let path = task_status_path(task_id);
        let call_name = format!("POST {}", path);
        let response: StatusUpdateResponse = self
            .get_json(
                self.post_form(&path, vec![("status", status.to_string())])?,
                &call_name,
            )
            .await?;

        if !response.success {
            return Err(CrmError::Rejected(call_name));
        }
        Ok(())
    }

    async fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<(), CrmError> {
        let fields = vec![
            ("case_id", entry.case_id.to_string()),
            ("duration", entry.duration_field()),
            ("description", entry.description.clone()),
        ];

        self.send_without_body(
            self.post_form(CREATE_TIME_ENTRY_PATH, fields)?,
            "POST /api/time-entries/create/",
        )
        .await
    }

    async fn list_time_entries(&self) -> Result<Vec<TimeEntry>, CrmError> {
        self.get_json(
            self.client.get(self.endpoint(TIME_ENTRIES_PATH)?),
            "GET /api/time-entries/",
        )
        .await
    }

    async fn fetch_analytics(&self, range: DateRange) -> Result<AnalyticsReport, CrmError> {
        self.get_json(
            self.client
                .get(self.endpoint(ANALYTICS_PATH)?)
                .query(&range.query_params()),
            "GET /api/analytics/",
        )
        .await
    }

    async fn search_cases(&self, term: &str) -> Result<Vec<CaseSummary>, CrmError> {
        self.get_json(
            self.client
                .get(self.endpoint(CASE_SEARCH_PATH)?)
                .query(&[("search", term)]),
            "GET /api/cases/search/",
        )
        .await
    }
}
