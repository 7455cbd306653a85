//! Request handlers for the recovery plugin.

use std::sync::Arc;

use async_trait::async_trait;
use harvest_auth_core::error::RecoveryError;
use harvest_auth_core::router::{Request, RequestHandler, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::service::{RecoveryService, TokenRedemption};

fn invalid_request() -> Response {
    Response::bad_request().json(serde_json::json!({
        "error": {
            "code": "INVALID_REQUEST",
            "message": "Invalid request body"
        }
    }))
}

fn error_response(err: RecoveryError) -> Response {
    if !err.is_user_error() {
        error!(error = %err, "recovery operation failed");
        return Response::internal_error().json(serde_json::json!({
            "error": {
                "code": "INTERNAL_ERROR",
                "message": "Something went wrong. Please try again later."
            }
        }));
    }

    Response::new(err.status_code()).json(serde_json::json!({
        "error": {
            "code": err.error_code(),
            "message": err.to_string()
        }
    }))
}

/// Request body for requesting or resending a verification code.
#[derive(Debug, Deserialize)]
pub struct RequestCodeRequest {
    /// Email address on the account.
    pub email: String,
    /// Username on the account.
    pub username: String,
}

/// Response for requesting a verification code.
///
/// Carries the same generic message whether or not the account exists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCodeResponse {
    pub accepted: bool,
    pub delivery_confirmed: bool,
    pub message: &'static str,
}

const REQUEST_CODE_MESSAGE: &str =
    "If this account exists, a verification code has been sent to its email address.";

/// Handler for POST /recovery/request-code
pub struct RequestCodeHandler {
    service: Arc<RecoveryService>,
}

impl RequestCodeHandler {
    pub fn new(service: Arc<RecoveryService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RequestHandler for RequestCodeHandler {
    async fn handle(&self, req: Request) -> Response {
        let Some(body) = req.json::<RequestCodeRequest>() else {
            return invalid_request();
        };

        match self.service.request_code(&body.email, &body.username).await {
            Ok(receipt) => Response::ok().json(RequestCodeResponse {
                accepted: receipt.accepted,
                delivery_confirmed: receipt.delivery_confirmed,
                message: REQUEST_CODE_MESSAGE,
            }),
            Err(err) => error_response(err),
        }
    }
}

/// Handler for POST /recovery/resend-code
pub struct ResendCodeHandler {
    service: Arc<RecoveryService>,
}

impl ResendCodeHandler {
    pub fn new(service: Arc<RecoveryService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RequestHandler for ResendCodeHandler {
    async fn handle(&self, req: Request) -> Response {
        let Some(body) = req.json::<RequestCodeRequest>() else {
            return invalid_request();
        };

        match self.service.resend_code(&body.email, &body.username).await {
            Ok(receipt) => Response::ok().json(RequestCodeResponse {
                accepted: receipt.accepted,
                delivery_confirmed: receipt.delivery_confirmed,
                message: REQUEST_CODE_MESSAGE,
            }),
            Err(err) => error_response(err),
        }
    }
}

/// Request body for verifying a code.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    /// The account's numeric ID.
    pub user_id: i64,
    /// The submitted code, in whatever shape the user typed it.
    pub code: String,
}

/// Handler for POST /recovery/verify-code
pub struct VerifyCodeHandler {
    service: Arc<RecoveryService>,
}

impl VerifyCodeHandler {
    pub fn new(service: Arc<RecoveryService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RequestHandler for VerifyCodeHandler {
    async fn handle(&self, req: Request) -> Response {
        let Some(body) = req.json::<VerifyCodeRequest>() else {
            return invalid_request();
        };

        match self.service.verify_code(body.user_id, &body.code).await {
            Ok(issued) => Response::ok().json(issued),
            Err(err) => error_response(err),
        }
    }
}

/// Request body for committing a new password.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// The reset token from the verify step.
    pub token: String,
    /// The new password.
    pub new_password: String,
    /// The confirmation copy of the new password.
    pub confirm_password: String,
}

/// Handler for POST /recovery/reset-password
pub struct ResetPasswordHandler {
    service: Arc<RecoveryService>,
}

impl ResetPasswordHandler {
    pub fn new(service: Arc<RecoveryService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RequestHandler for ResetPasswordHandler {
    async fn handle(&self, req: Request) -> Response {
        let Some(body) = req.json::<ResetPasswordRequest>() else {
            return invalid_request();
        };

        let redemption = TokenRedemption {
            token: body.token,
            new_password: body.new_password,
            confirm_password: body.confirm_password,
        };
        match self.service.redeem_token(redemption).await {
            Ok(()) => Response::ok().json(serde_json::json!({ "ok": true })),
            Err(err) => error_response(err),
        }
    }
}
