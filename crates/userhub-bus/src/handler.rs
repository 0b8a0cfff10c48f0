//! NATS subscriptions and per-flow request handling.

use async_nats::{Client, Subscriber};
use bytes::Bytes;
use futures::StreamExt;
use tracing::{debug, error, info};

use userhub_core::error::{AppError, ErrorKind};
use userhub_core::result::AppResult;
use userhub_service::AuthService;

use crate::payload::{self, CredentialsRequest, RefreshRequest, TokenPairReply};

/// Subject for user registration requests.
pub const SUBJECT_SIGN_UP: &str = "user.sign-up";
/// Subject for sign-in requests.
pub const SUBJECT_SIGN_IN: &str = "user.sign-in";
/// Subject for refresh-rotation requests.
pub const SUBJECT_REFRESH: &str = "user.refresh";
/// Subject for sign-out requests.
pub const SUBJECT_SIGN_OUT: &str = "user.sign-out";
/// Subject for access-token validation requests.
pub const SUBJECT_TOKEN_VALID: &str = "user.token-valid";

/// Confirmation text returned on successful sign-out.
pub const SIGN_OUT_CONFIRMATION: &str = "Successfully logged out";

/// Generic reply for any infrastructure failure. Internal detail is
/// logged server-side and never echoed to callers.
pub const INTERNAL_ERROR_REPLY: &str = "internal server error";

/// The five request flows served over the bus.
#[derive(Debug, Clone, Copy)]
enum Flow {
    SignUp,
    SignIn,
    Refresh,
    SignOut,
    TokenValid,
}

/// Bus-facing request handler: decodes payloads, drives the service, and
/// publishes replies.
#[derive(Debug, Clone)]
pub struct Handler {
    /// NATS client used for reply publication.
    client: Client,
    /// The authentication service.
    service: AuthService,
}

impl Handler {
    /// Creates a new handler.
    pub fn new(client: Client, service: AuthService) -> Self {
        Self { client, service }
    }

    /// Subscribes to all flow subjects and serves requests until the
    /// connection closes. Each request is handled on its own task, so
    /// flows never serialize behind each other.
    pub async fn run(&self) -> AppResult<()> {
        let sign_up = self.subscribe(SUBJECT_SIGN_UP).await?;
        let sign_in = self.subscribe(SUBJECT_SIGN_IN).await?;
        let refresh = self.subscribe(SUBJECT_REFRESH).await?;
        let sign_out = self.subscribe(SUBJECT_SIGN_OUT).await?;
        let token_valid = self.subscribe(SUBJECT_TOKEN_VALID).await?;

        info!("Subscribed to all user.* subjects");

        tokio::join!(
            self.dispatch(sign_up, Flow::SignUp),
            self.dispatch(sign_in, Flow::SignIn),
            self.dispatch(refresh, Flow::Refresh),
            self.dispatch(sign_out, Flow::SignOut),
            self.dispatch(token_valid, Flow::TokenValid),
        );

        Ok(())
    }

    async fn subscribe(&self, subject: &'static str) -> AppResult<Subscriber> {
        self.client
            .subscribe(subject)
            .await
            .map_err(|e| AppError::internal(format!("Failed to subscribe to '{subject}': {e}")))
    }

    async fn dispatch(&self, mut subscription: Subscriber, flow: Flow) {
        while let Some(message) = subscription.next().await {
            let handler = self.clone();
            tokio::spawn(async move {
                let reply = handler.reply_for(flow, &message.payload).await;
                if let Some(subject) = message.reply {
                    if let Err(e) = handler.client.publish(subject, Bytes::from(reply)).await {
                        error!(error = %e, ?flow, "Failed to publish reply");
                    }
                }
            });
        }
    }

    /// Produces the reply payload for one request.
    async fn reply_for(&self, flow: Flow, request: &[u8]) -> String {
        let result = match flow {
            Flow::SignUp => self.sign_up(request).await,
            Flow::SignIn => self.sign_in(request).await,
            Flow::Refresh => self.refresh(request).await,
            Flow::SignOut => self.sign_out(request).await,
            Flow::TokenValid => self.token_valid(request).await,
        };

        match result {
            Ok(reply) => reply,
            Err(e) => {
                match e.kind {
                    ErrorKind::BadCredentials
                    | ErrorKind::NoSuchUser
                    | ErrorKind::InvalidToken
                    | ErrorKind::MalformedRequest
                    | ErrorKind::Conflict => debug!(error = %e, ?flow, "Request rejected"),
                    _ => error!(error = %e, ?flow, "Request failed"),
                }
                error_reply(&e)
            }
        }
    }

    async fn sign_up(&self, request: &[u8]) -> AppResult<String> {
        let req: CredentialsRequest = payload::decode_json(request)?;
        let user_id = self.service.sign_up(&req.name, &req.password).await?;
        Ok(user_id.to_string())
    }

    async fn sign_in(&self, request: &[u8]) -> AppResult<String> {
        let req: CredentialsRequest = payload::decode_json(request)?;
        let pair = self.service.sign_in(&req.name, &req.password).await?;
        Ok(serde_json::to_string(&TokenPairReply::from(&pair))?)
    }

    async fn refresh(&self, request: &[u8]) -> AppResult<String> {
        let req: RefreshRequest = payload::decode_json(request)?;
        let pair = self.service.refresh(&req.refresh_token).await?;
        Ok(serde_json::to_string(&TokenPairReply::from(&pair))?)
    }

    async fn sign_out(&self, request: &[u8]) -> AppResult<String> {
        let token = payload::decode_token(request)?;
        self.service.sign_out(&token).await?;
        Ok(SIGN_OUT_CONFIRMATION.to_string())
    }

    async fn token_valid(&self, request: &[u8]) -> AppResult<String> {
        let token = payload::decode_token(request)?;
        let user_id = self.service.validate(&token).await?;
        Ok(user_id.to_string())
    }
}

/// Maps an error to its caller-visible reply text.
///
/// Token rejections share one fixed string regardless of whether the
/// signature, expiry, shape, or liveness check failed, and every
/// infrastructure kind collapses to the generic internal-error reply.
pub fn error_reply(err: &AppError) -> String {
    match err.kind {
        ErrorKind::BadCredentials | ErrorKind::NoSuchUser => {
            "invalid username or password".to_string()
        }
        ErrorKind::InvalidToken => "expired or invalid token".to_string(),
        ErrorKind::MalformedRequest | ErrorKind::Conflict => err.message.clone(),
        _ => INTERNAL_ERROR_REPLY.to_string(),
    }
}
