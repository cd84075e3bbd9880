use crate::domain::{Fault, FaultKind};
use async_trait::async_trait;
use futures::Future;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::{fmt::Debug, sync::Arc};

/// Prepares the credentials of a single request.
///
/// Called before every call. The returned headers belong to that request only,
/// so concurrent calls with different credentials never observe each other.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self) -> Result<HeaderMap, Fault>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

#[async_trait]
impl Authenticator for NoAuth {
    async fn authenticate(&self) -> Result<HeaderMap, Fault> {
        Ok(HeaderMap::new())
    }
}

#[derive(Clone)]
pub struct StaticBearer {
    token: String,
}

impl StaticBearer {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Debug for StaticBearer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticBearer")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl Authenticator for StaticBearer {
    async fn authenticate(&self) -> Result<HeaderMap, Fault> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|e| Fault::new(FaultKind::Authentication, e))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

pub struct FnAuthenticator<F> {
    f: F,
}

/// Wraps an async closure as an [`Authenticator`].
pub fn from_fn<F, Fut>(f: F) -> FnAuthenticator<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<HeaderMap, Fault>> + Send,
{
    FnAuthenticator { f }
}

#[async_trait]
impl<F, Fut> Authenticator for FnAuthenticator<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<HeaderMap, Fault>> + Send,
{
    async fn authenticate(&self) -> Result<HeaderMap, Fault> {
        (self.f)().await
    }
}

#[async_trait]
impl<A: Authenticator> Authenticator for Option<A> {
    async fn authenticate(&self) -> Result<HeaderMap, Fault> {
        match self {
            Some(authenticator) => authenticator.authenticate().await,
            None => Ok(HeaderMap::new()),
        }
    }
}

#[async_trait]
impl<A: Authenticator + ?Sized> Authenticator for Arc<A> {
    async fn authenticate(&self) -> Result<HeaderMap, Fault> {
        (**self).authenticate().await
    }
}
