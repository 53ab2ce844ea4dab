//! Calls to the identity, auction and item services.

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use rv_core::error::{AuthError, ReviewError, ServiceError, UpstreamError};
use rv_core::types::PublicId;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

const IDENTITY_SERVICE: &str = "authentication";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub auth_url: String,
    pub auction_url: String,
    pub item_url: String,
    /// Skip certificate verification; only ever set for development.
    pub insecure_tls: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Auction,
    Item,
}

impl EntityKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Auction => "auction",
            Self::Item => "item",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    pub kind: EntityKind,
    pub id: String,
}

impl Lookup {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// Result of one lookup in a fan-out: the upstream status code, or why no
/// status was obtained.
#[derive(Debug)]
pub struct LookupOutcome {
    pub kind: EntityKind,
    pub status: Result<u16, UpstreamError>,
}

pub trait Upstream: Send + Sync {
    /// Exchanges an access token for the caller's public id.
    fn resolve_identity<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<PublicId, ServiceError>>;

    /// Asks the owning service about one entity and reports its status code.
    fn check_entity<'a>(
        &'a self,
        kind: EntityKind,
        id: &'a str,
        token: &'a str,
    ) -> BoxFuture<'a, Result<u16, UpstreamError>>;
}

/// Runs every lookup concurrently, each under its own timeout, and keeps the
/// outcomes in request order.
pub async fn verify_all(
    upstream: &dyn Upstream,
    token: &str,
    lookups: &[Lookup],
    timeout: Duration,
) -> Vec<LookupOutcome> {
    let pending = lookups.iter().map(|lookup| async move {
        let status = match tokio::time::timeout(
            timeout,
            upstream.check_entity(lookup.kind, &lookup.id, token),
        )
        .await
        {
            Ok(status) => status,
            Err(_) => Err(UpstreamError::Timeout {
                service: lookup.kind.name(),
            }),
        };
        LookupOutcome {
            kind: lookup.kind,
            status,
        }
    });
    join_all(pending).await
}

/// First failing outcome wins: no answer is a 503, a non-200 answer means the
/// entity does not exist.
pub fn ensure_all_exist(outcomes: Vec<LookupOutcome>) -> Result<(), ServiceError> {
    for outcome in outcomes {
        match outcome.status {
            Ok(200) => {}
            Ok(status) => {
                warn!(kind = outcome.kind.name(), status, "entity lookup rejected");
                return Err(ReviewError::ReferenceInvalid {
                    kind: outcome.kind.name(),
                }
                .into());
            }
            Err(err) => {
                warn!(kind = outcome.kind.name(), error = %err, "entity lookup failed");
                return Err(err.into());
            }
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct IdentityBody {
    public_id: String,
}

pub struct HttpUpstream {
    client: reqwest::Client,
    config: UpstreamConfig,
}

impl HttpUpstream {
    pub fn new(config: UpstreamConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .danger_accept_invalid_certs(config.insecure_tls)
            .build()?;
        Ok(Self { client, config })
    }

    fn entity_url(&self, kind: EntityKind, id: &str) -> String {
        let base = match kind {
            EntityKind::Auction => &self.config.auction_url,
            EntityKind::Item => &self.config.item_url,
        };
        format!("{}/{}", base.trim_end_matches('/'), id)
    }

    async fn fetch_identity(&self, token: &str) -> Result<PublicId, ServiceError> {
        let response = self
            .client
            .get(&self.config.auth_url)
            .header(ACCESS_TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|err| UpstreamError::Unavailable {
                service: IDENTITY_SERVICE,
                message: err.to_string(),
            })?;
        if response.status() != reqwest::StatusCode::OK {
            warn!(status = response.status().as_u16(), "access token rejected");
            return Err(AuthError::Rejected.into());
        }
        let body: IdentityBody = response.json().await.map_err(|err| {
            warn!(error = %err, "identity response unreadable");
            AuthError::Rejected
        })?;
        let public_id = PublicId::parse(&body.public_id).map_err(|_| AuthError::Rejected)?;
        Ok(public_id)
    }

    async fn fetch_status(
        &self,
        kind: EntityKind,
        id: &str,
        token: &str,
    ) -> Result<u16, UpstreamError> {
        let response = self
            .client
            .get(self.entity_url(kind, id))
            .header(ACCESS_TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|err| UpstreamError::Unavailable {
                service: kind.name(),
                message: err.to_string(),
            })?;
        Ok(response.status().as_u16())
    }
}

impl Upstream for HttpUpstream {
    fn resolve_identity<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<PublicId, ServiceError>> {
        self.fetch_identity(token).boxed()
    }

    fn check_entity<'a>(
        &'a self,
        kind: EntityKind,
        id: &'a str,
        token: &'a str,
    ) -> BoxFuture<'a, Result<u16, UpstreamError>> {
        self.fetch_status(kind, id, token).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        auction: Option<u16>,
        item: Option<u16>,
        delay: Duration,
    }

    impl Upstream for Scripted {
        fn resolve_identity<'a>(
            &'a self,
            _token: &'a str,
        ) -> BoxFuture<'a, Result<PublicId, ServiceError>> {
            async { Err(AuthError::Rejected.into()) }.boxed()
        }

        fn check_entity<'a>(
            &'a self,
            kind: EntityKind,
            _id: &'a str,
            _token: &'a str,
        ) -> BoxFuture<'a, Result<u16, UpstreamError>> {
            let answer = match kind {
                EntityKind::Auction => self.auction,
                EntityKind::Item => self.item,
            };
            let delay = self.delay;
            async move {
                tokio::time::sleep(delay).await;
                answer.ok_or(UpstreamError::Unavailable {
                    service: kind.name(),
                    message: "connection refused".to_string(),
                })
            }
            .boxed()
        }
    }

    fn lookups() -> Vec<Lookup> {
        vec![
            Lookup::new(EntityKind::Auction, "a"),
            Lookup::new(EntityKind::Item, "i"),
        ]
    }

    #[tokio::test]
    async fn outcomes_keep_request_order() {
        let upstream = Scripted {
            auction: Some(200),
            item: Some(404),
            delay: Duration::ZERO,
        };
        let outcomes = verify_all(&upstream, "t", &lookups(), LOOKUP_TIMEOUT).await;
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].kind, EntityKind::Auction);
        assert_eq!(outcomes[0].status.as_ref().ok(), Some(&200));
        assert_eq!(outcomes[1].status.as_ref().ok(), Some(&404));

        let err = ensure_all_exist(outcomes).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Review(ReviewError::ReferenceInvalid { kind: "item" })
        ));
    }

    #[tokio::test]
    async fn all_found_passes() {
        let upstream = Scripted {
            auction: Some(200),
            item: Some(200),
            delay: Duration::ZERO,
        };
        let outcomes = verify_all(&upstream, "t", &lookups(), LOOKUP_TIMEOUT).await;
        assert!(ensure_all_exist(outcomes).is_ok());
    }

    #[tokio::test]
    async fn transport_failure_is_unavailable() {
        let upstream = Scripted {
            auction: None,
            item: Some(200),
            delay: Duration::ZERO,
        };
        let outcomes = verify_all(&upstream, "t", &lookups(), LOOKUP_TIMEOUT).await;
        assert!(matches!(
            ensure_all_exist(outcomes),
            Err(ServiceError::Upstream(UpstreamError::Unavailable { service: "auction", .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_lookup_times_out() {
        let upstream = Scripted {
            auction: Some(200),
            item: Some(200),
            delay: Duration::from_secs(30),
        };
        let outcomes = verify_all(&upstream, "t", &lookups(), LOOKUP_TIMEOUT).await;
        assert!(outcomes
            .iter()
            .all(|outcome| matches!(outcome.status, Err(UpstreamError::Timeout { .. }))));
    }

    #[test]
    fn entity_urls_join_cleanly() {
        let upstream = HttpUpstream::new(UpstreamConfig {
            auth_url: "http://auth/authy/checkaccess/10".to_string(),
            auction_url: "http://auction/auctions/".to_string(),
            item_url: "http://items/items".to_string(),
            insecure_tls: false,
        })
        .unwrap();
        assert_eq!(
            upstream.entity_url(EntityKind::Auction, "abc"),
            "http://auction/auctions/abc"
        );
        assert_eq!(
            upstream.entity_url(EntityKind::Item, "abc"),
            "http://items/items/abc"
        );
    }
}
