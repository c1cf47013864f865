//! Client-side session controller.
//!
//! `SessionController` talks to the HTTP API with `reqwest`, keeps the session
//! token in a `TokenStore`, and mirrors the caller's task list locally. Every
//! successful create, update and delete is applied to the local list, so it
//! always matches what the server returned.
//!
//! A task call made without a token, or answered with 401/403, clears the
//! stored token and fails with `ClientError::LoginRequired`; front ends should
//! send the user back to the login flow on that error.

pub mod token_store;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::io;
use std::str::FromStr;

use crate::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::{
    MessageResponse, NewTask, Task, TaskChanges, TaskListResponse, TaskResponse, TaskStatus,
};

pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

#[derive(Debug)]
pub enum ClientError {
    /// No usable session; the user has to log in again.
    LoginRequired,
    /// The server rejected the request.
    Api { status: u16, message: String },
    /// The request never produced a usable response.
    Http(reqwest::Error),
    /// The token store failed.
    Storage(io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClientError::LoginRequired => write!(f, "Login required"),
            ClientError::Api { status, message } => write!(f, "{} ({})", message, status),
            ClientError::Http(e) => write!(f, "HTTP error: {}", e),
            ClientError::Storage(e) => write!(f, "Token storage error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::Http(error)
    }
}

impl From<io::Error> for ClientError {
    fn from(error: io::Error) -> Self {
        ClientError::Storage(error)
    }
}

/// Which tasks `visible_tasks` shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl FromStr for StatusFilter {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

impl StatusFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => task.status == *status,
        }
    }
}

pub struct SessionController<S> {
    http: reqwest::Client,
    base_url: String,
    store: S,
    tasks: Vec<Task>,
}

impl<S: TokenStore> SessionController<S> {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>, store: S) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, store)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>, store: S) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            store,
            tasks: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.store.load(), Ok(Some(_)))
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.authenticate_with("/api/auth/register", &body).await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.authenticate_with("/api/auth/login", &body).await
    }

    /// Forgets the token and the mirrored task list.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.tasks.clear();
        self.store.clear()?;
        Ok(())
    }

    /// The locally mirrored task list, in server order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn visible_tasks(&self, filter: StatusFilter) -> Vec<&Task> {
        self.tasks.iter().filter(|task| filter.matches(task)).collect()
    }

    /// Replaces the local list with the server's.
    pub async fn refresh_tasks(&mut self) -> Result<&[Task], ClientError> {
        let request = self.http.get(self.url("/api/tasks"));
        let listing: TaskListResponse = self.send_authorized(request).await?;
        self.tasks = listing.tasks;
        Ok(&self.tasks)
    }

    pub async fn create_task(&mut self, input: &NewTask) -> Result<Task, ClientError> {
        let request = self.http.post(self.url("/api/tasks")).json(input);
        let created: TaskResponse = self.send_authorized(request).await?;
        self.tasks.push(created.task.clone());
        Ok(created.task)
    }

    pub async fn update_task(
        &mut self,
        task_id: i64,
        changes: &TaskChanges,
    ) -> Result<Task, ClientError> {
        let request = self
            .http
            .put(self.url(&format!("/api/tasks/{}", task_id)))
            .json(changes);
        let updated: TaskResponse = self.send_authorized(request).await?;

        match self.tasks.iter_mut().find(|task| task.id == updated.task.id) {
            Some(local) => *local = updated.task.clone(),
            None => self.tasks.push(updated.task.clone()),
        }
        Ok(updated.task)
    }

    pub async fn delete_task(&mut self, task_id: i64) -> Result<(), ClientError> {
        let request = self.http.delete(self.url(&format!("/api/tasks/{}", task_id)));
        let _: MessageResponse = self.send_authorized(request).await?;
        self.tasks.retain(|task| task.id != task_id);
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authenticate_with<B: Serialize>(
        &mut self,
        path: &str,
        body: &B,
    ) -> Result<(), ClientError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let auth: AuthResponse = response.json().await?;
        self.store.save(&auth.token)?;
        self.tasks.clear();
        log::debug!("session stored after {}", path);
        Ok(())
    }

    async fn send_authorized<T: DeserializeOwned>(
        &mut self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let Some(token) = self.store.load()? else {
            self.tasks.clear();
            return Err(ClientError::LoginRequired);
        };

        let response = request.bearer_auth(token).send().await?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                log::debug!("session rejected by server, clearing token");
                self.logout()?;
                Err(ClientError::LoginRequired)
            }
            status if status.is_success() => Ok(response.json().await?),
            _ => Err(api_error(response).await),
        }
    }
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status();
    let message = match response.json::<MessageResponse>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}
