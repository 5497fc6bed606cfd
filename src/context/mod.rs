use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Credentials passed to the tool through the `-login` switch
pub enum Credentials {
    /// NTLM style user and password, optionally qualified by a domain
    UsernamePassword {
        username: String,
        password: SecretString,
        domain: Option<String>,
    },
    /// Personal access token
    AccessToken(SecretString),
}

impl Credentials {
    pub fn user_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::UsernamePassword {
            username: username.into(),
            password: SecretString::from(password.into()),
            domain: None,
        }
    }

    pub fn with_domain(
        domain: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Credentials::UsernamePassword {
            username: username.into(),
            password: SecretString::from(password.into()),
            domain: Some(domain.into()),
        }
    }

    pub fn access_token(token: impl Into<String>) -> Self {
        Credentials::AccessToken(SecretString::from(token.into()))
    }

    /// The value of the `-login` switch. Contains the secret in clear text.
    pub(crate) fn login_value(&self) -> String {
        match self {
            Credentials::UsernamePassword {
                username,
                password,
                domain,
            } => {
                let user = match domain {
                    Some(domain) if !domain.is_empty() => format!("{}\\{}", domain, username),
                    _ => username.clone(),
                };
                format!("{},{}", user, password.expose_secret())
            }
            Credentials::AccessToken(token) => format!("_,{}", token.expose_secret()),
        }
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        match self {
            Credentials::UsernamePassword {
                username,
                password,
                domain,
            } => Credentials::UsernamePassword {
                username: username.clone(),
                password: SecretString::from(password.expose_secret().to_owned()),
                domain: domain.clone(),
            },
            Credentials::AccessToken(token) => {
                Credentials::AccessToken(SecretString::from(token.expose_secret().to_owned()))
            }
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::UsernamePassword {
                username, domain, ..
            } => f
                .debug_struct("UsernamePassword")
                .field("username", username)
                .field("password", &"********")
                .field("domain", domain)
                .finish(),
            Credentials::AccessToken(_) => f.debug_tuple("AccessToken").field(&"********").finish(),
        }
    }
}

/// Server-side information a command needs to decide its collection and
/// credential switches
#[derive(Debug, Clone, Default)]
pub struct ServerContext {
    pub collection_url: Option<String>,
    pub credentials: Option<Credentials>,
    pub team_project: Option<String>,
}

impl ServerContext {
    /// A context with no server information. Commands built from it run
    /// against the local workspace only.
    pub fn local() -> Self {
        Self::default()
    }

    pub fn new(collection_url: impl Into<String>) -> Self {
        Self {
            collection_url: Some(collection_url.into()),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_team_project(mut self, team_project: impl Into<String>) -> Self {
        self.team_project = Some(team_project.into());
        self
    }

    /// Collection URL, if one is set and non-empty
    pub fn collection(&self) -> Option<&str> {
        self.collection_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// A server context that collaborators may refresh while commands run
///
/// Each operation takes a [`snapshot`](SharedServerContext::snapshot) before it
/// builds arguments so a single invocation sees one consistent view.
#[derive(Debug, Clone, Default)]
pub struct SharedServerContext {
    inner: Arc<RwLock<ServerContext>>,
}

impl SharedServerContext {
    pub fn new(context: ServerContext) -> Self {
        Self {
            inner: Arc::new(RwLock::new(context)),
        }
    }

    pub fn snapshot(&self) -> ServerContext {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the stored context, e.g. after credentials were refreshed
    pub fn replace(&self, context: ServerContext) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = context;
    }

    pub fn set_credentials(&self, credentials: Option<Credentials>) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .credentials = credentials;
    }
}

/// A single server path to local path mapping of a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceMapping {
    pub server_path: String,
    pub local_path: Option<PathBuf>,
    pub cloaked: bool,
}

/// A TFVC workspace as reported by `workfold`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub name: String,
    pub owner: Option<String>,
    pub server: String,
    pub mappings: Vec<WorkspaceMapping>,
    pub default_team_project: Option<String>,
}

impl Workspace {
    /// Server context for this workspace's collection, without credentials
    pub fn server_context(&self) -> ServerContext {
        let mut context = ServerContext::new(self.server.clone());
        context.team_project = self.default_team_project.clone();
        context
    }
}
