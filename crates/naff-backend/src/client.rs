use std::sync::Arc;

use http::{Method, StatusCode};
use naff_types::{ApiErrorBody, BearerToken, Team, User};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, ClientError};
use crate::retry::RetryPolicy;
use crate::transport::{BackendRequest, BackendResponse, ReqwestTransport, Transport};

/// Typed access to the backend REST API.
///
/// Every operation takes the caller's token; each issues exactly one logical
/// request (GETs may be re-sent per the [`RetryPolicy`] when no response
/// arrived at all).
pub struct BackendClient<T = ReqwestTransport> {
    base_url: String,
    transport: Arc<T>,
    retry: RetryPolicy,
}

impl<T> Clone for BackendClient<T> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            transport: Arc::clone(&self.transport),
            retry: self.retry,
        }
    }
}

impl<T: Transport> BackendClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T, retry: RetryPolicy) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport: Arc::new(transport),
            retry,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get_user(&self, token: &BearerToken) -> Result<User, ClientError> {
        let url = self.endpoint(&["api", "user"], None)?;
        self.call(Method::GET, url, token).await
    }

    /// The caller's team. A 200 with a `null` body means the user has not
    /// joined one.
    pub async fn get_team(&self, token: &BearerToken) -> Result<Option<Team>, ClientError> {
        let url = self.endpoint(&["api", "team", ""], None)?;
        self.call(Method::GET, url, token).await
    }

    pub async fn get_members(
        &self,
        token: &BearerToken,
        teamId: &str,
    ) -> Result<Vec<User>, ClientError> {
        let url = self.endpoint(&["api", "team", teamId, "members"], None)?;
        self.call(Method::GET, url, token).await
    }

    pub async fn join_team(&self, token: &BearerToken, code: &str) -> Result<Team, ClientError> {
        let url = self.endpoint(&["api", "team", "join"], Some(("id", code)))?;
        self.call(Method::POST, url, token).await
    }

    pub async fn create_team(&self, token: &BearerToken, name: &str) -> Result<Team, ClientError> {
        let url = self.endpoint(&["api", "team", "new"], Some(("name", name)))?;
        self.call(Method::POST, url, token).await
    }

    pub async fn leave_team(&self, token: &BearerToken) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "team", "leave"], None)?;
        let _: serde_json::Value = self.call(Method::POST, url, token).await?;
        Ok(())
    }

    /// Every team; the backend only answers this for admins.
    pub async fn list_teams(&self, token: &BearerToken) -> Result<Vec<Team>, ClientError> {
        let url = self.endpoint(&["api", "admin", "teams"], None)?;
        self.call(Method::GET, url, token).await
    }

    fn endpoint(&self, segments: &[&str], query: Option<(&str, &str)>) -> Result<String, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.base_url)))?;

        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);

        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, value);
        }

        Ok(url.to_string())
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        token: &BearerToken,
    ) -> Result<R, ClientError> {
        let response = self.execute(method, url, token).await?;
        decode(response)
    }

    async fn execute(
        &self,
        method: Method,
        url: String,
        token: &BearerToken,
    ) -> Result<BackendResponse, ClientError> {
        let idempotent = method == Method::GET;
        let mut attempt = 0;

        loop {
            attempt += 1;
            let request = BackendRequest {
                method: method.clone(),
                url: url.clone(),
                token: token.clone(),
            };

            debug!(%method, %url, attempt, "backend request");

            match self.transport.send(request).await {
                Ok(response) => {
                    debug!(%method, %url, status = %response.status, "backend response");
                    return Ok(response);
                }
                Err(e) if idempotent && e.is_retryable() && self.retry.allows_another(attempt) => {
                    warn!(%method, %url, attempt, "backend request failed, retrying: {e}");
                    tokio::time::sleep(self.retry.backoff(attempt)).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// The body is parsed as JSON whatever the status; non-200 bodies must carry
/// the `{error, code}` shape.
fn decode<R: DeserializeOwned>(response: BackendResponse) -> Result<R, ClientError> {
    let status = response.status.as_u16();
    let body: serde_json::Value = serde_json::from_slice(&response.body)
        .map_err(|source| ClientError::Decode { status, source })?;

    if response.status != StatusCode::OK {
        let ApiErrorBody { error, code } = serde_json::from_value(body)
            .map_err(|source| ClientError::Decode { status, source })?;
        return Err(ClientError::Api(ApiError {
            message: error,
            code,
        }));
    }

    serde_json::from_value(body).map_err(|source| ClientError::Decode { status, source })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::ScriptedTransport;
    use crate::transport::TransportError;

    const BASE: &str = "http://backend.test";

    fn client(transport: ScriptedTransport) -> BackendClient<ScriptedTransport> {
        BackendClient::new(
            BASE,
            transport,
            RetryPolicy {
                max_attempts: 3,
                base_backoff_ms: 0,
            },
        )
    }

    fn token() -> BearerToken {
        BearerToken::new("abc").unwrap()
    }

    fn team_json() -> serde_json::Value {
        json!({
            "id": "t1",
            "name": "Reel Big",
            "film_name": "Night",
            "film_description": "A film",
            "has_file": false
        })
    }

    #[tokio::test]
    async fn get_user_returns_parsed_body() {
        let c = client(ScriptedTransport::new().reply(
            200,
            json!({"id":"u1","name":"A","email":"a@x.com","is_admin":false}),
        ));

        let user = c.get_user(&token()).await.unwrap();

        assert_eq!(user.id, "u1");
        assert!(!user.is_admin);
        assert_eq!(c.transport().requested(), vec![format!("GET {BASE}/api/user")]);
        assert_eq!(c.transport().calls()[0].token.as_str(), "abc");
    }

    #[tokio::test]
    async fn non_200_becomes_api_error_from_body() {
        let c = client(
            ScriptedTransport::new().reply(401, json!({"error":"Unauthorized","code":243})),
        );

        let err = c.get_user(&token()).await.unwrap_err();

        assert_eq!(
            err.api(),
            Some(&ApiError {
                message: "Unauthorized".into(),
                code: 243
            })
        );
        assert!(err.is_stale_session());
    }

    #[tokio::test]
    async fn error_status_with_unexpected_body_is_a_decode_error() {
        let c = client(ScriptedTransport::new().reply_raw(502, "<html>bad gateway</html>"));

        let err = c.get_user(&token()).await.unwrap_err();

        assert!(matches!(err, ClientError::Decode { status: 502, .. }));
        assert!(!err.is_stale_session());
    }

    #[tokio::test]
    async fn success_with_wrong_shape_is_a_decode_error() {
        let c = client(ScriptedTransport::new().reply(200, json!({"id": 7})));

        let err = c.get_user(&token()).await.unwrap_err();

        assert!(matches!(err, ClientError::Decode { status: 200, .. }));
    }

    #[tokio::test]
    async fn get_team_maps_null_to_none() {
        let c = client(
            ScriptedTransport::new()
                .reply(200, serde_json::Value::Null)
                .reply(200, team_json()),
        );

        assert_eq!(c.get_team(&token()).await.unwrap(), None);
        let team = c.get_team(&token()).await.unwrap().unwrap();
        assert_eq!(team.film_description, "A film");
        assert_eq!(
            c.transport().requested()[0],
            format!("GET {BASE}/api/team/")
        );
    }

    #[tokio::test]
    async fn members_path_escapes_team_id() {
        let c = client(ScriptedTransport::new().reply(200, json!([])));

        let members = c.get_members(&token(), "a b/c").await.unwrap();

        assert!(members.is_empty());
        assert_eq!(
            c.transport().requested(),
            vec![format!("GET {BASE}/api/team/a%20b%2Fc/members")]
        );
    }

    #[tokio::test]
    async fn team_mutations_post_with_encoded_query() {
        let c = client(
            ScriptedTransport::new()
                .reply(200, team_json())
                .reply(200, team_json())
                .reply(200, serde_json::Value::Null),
        );

        c.join_team(&token(), "X1&y").await.unwrap();
        c.create_team(&token(), "Reel Big").await.unwrap();
        c.leave_team(&token()).await.unwrap();

        assert_eq!(
            c.transport().requested(),
            vec![
                format!("POST {BASE}/api/team/join?id=X1%26y"),
                format!("POST {BASE}/api/team/new?name=Reel+Big"),
                format!("POST {BASE}/api/team/leave"),
            ]
        );
    }

    #[tokio::test]
    async fn leave_team_surfaces_backend_error() {
        let c = client(ScriptedTransport::new().reply(
            400,
            json!({"error":"You have to be in a team before you can leave it","code":238}),
        ));

        let err = c.leave_team(&token()).await.unwrap_err();

        assert_eq!(err.api().map(|e| e.code), Some(238));
    }

    #[tokio::test]
    async fn list_teams_hits_admin_endpoint() {
        let c = client(ScriptedTransport::new().reply(200, json!([team_json()])));

        let teams = c.list_teams(&token()).await.unwrap();

        assert_eq!(teams.len(), 1);
        assert_eq!(
            c.transport().requested(),
            vec![format!("GET {BASE}/api/admin/teams")]
        );
    }

    #[tokio::test]
    async fn get_retries_transport_failures_until_success() {
        let c = client(
            ScriptedTransport::new()
                .fail(TransportError::Timeout)
                .fail(TransportError::Connect("refused".into()))
                .reply(200, json!({"id":"u1","name":"A","email":"a@x.com","is_admin":true})),
        );

        let user = c.get_user(&token()).await.unwrap();

        assert!(user.is_admin);
        assert_eq!(c.transport().calls().len(), 3);
    }

    #[tokio::test]
    async fn get_gives_up_after_max_attempts() {
        let c = client(
            ScriptedTransport::new()
                .fail(TransportError::Timeout)
                .fail(TransportError::Timeout)
                .fail(TransportError::Timeout)
                .reply(200, json!([])),
        );

        let err = c.list_teams(&token()).await.unwrap_err();

        assert!(matches!(err, ClientError::Transport(TransportError::Timeout)));
        assert_eq!(c.transport().calls().len(), 3);
        assert_eq!(c.transport().remaining(), 1);
    }

    #[tokio::test]
    async fn post_is_never_retried() {
        let c = client(
            ScriptedTransport::new()
                .fail(TransportError::Timeout)
                .reply(200, team_json()),
        );

        let err = c.join_team(&token(), "X1").await.unwrap_err();

        assert!(matches!(err, ClientError::Transport(TransportError::Timeout)));
        assert_eq!(c.transport().calls().len(), 1);
    }

    #[tokio::test]
    async fn http_error_statuses_are_not_retried() {
        let c = client(
            ScriptedTransport::new()
                .reply(500, json!({"error":"There was an internal server error","code":255}))
                .reply(200, json!({"id":"u1","name":"A","email":"a@x.com"})),
        );

        let err = c.get_user(&token()).await.unwrap_err();

        assert_eq!(err.api().map(|e| e.code), Some(255));
        assert_eq!(c.transport().calls().len(), 1);
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_preserved() {
        let c = BackendClient::new(
            "http://backend.test/naff/",
            ScriptedTransport::new().reply(200, json!([])),
            RetryPolicy::none(),
        );

        c.get_members(&token(), "t1").await.unwrap();

        assert_eq!(c.base_url(), "http://backend.test/naff");
        assert_eq!(
            c.transport().requested(),
            vec!["GET http://backend.test/naff/api/team/t1/members".to_string()]
        );
    }

    #[tokio::test]
    async fn malformed_base_url_fails_before_sending() {
        let c = BackendClient::new("not a url", ScriptedTransport::new(), RetryPolicy::none());

        let err = c.get_user(&token()).await.unwrap_err();

        assert!(matches!(err, ClientError::InvalidUrl(_)));
        assert!(c.transport().calls().is_empty());
    }
}
