use campusconnect_application::{AccountSummary, AuthenticatedAccount, ClubSummary};
use campusconnect_domain::ClubPatch;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for student signup.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/student-signup-request.ts"
)]
pub struct StudentSignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub course: String,
}

/// Incoming payload for club signup.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/club-signup-request.ts"
)]
pub struct ClubSignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Incoming payload for the first admin account.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/admin-bootstrap-request.ts"
)]
pub struct AdminBootstrapRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Incoming payload for student, club and admin login.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Admin patch for a club profile. Absent fields are left alone.
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-club-request.ts"
)]
pub struct UpdateClubRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<UpdateClubRequest> for ClubPatch {
    fn from(value: UpdateClubRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
            image: value.image,
        }
    }
}

/// Public account fields.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/account-response.ts"
)]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<AccountSummary> for AccountResponse {
    fn from(value: AccountSummary) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            email: value.email,
            role: value.role.as_str().to_owned(),
        }
    }
}

/// Signup and login response carrying the bearer token.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auth-response.ts"
)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: String,
    pub account: AccountResponse,
}

impl From<AuthenticatedAccount> for AuthResponse {
    fn from(value: AuthenticatedAccount) -> Self {
        Self {
            token: value.assertion.token,
            expires_at: value.assertion.expires_at.to_rfc3339(),
            account: AccountResponse::from(value.account),
        }
    }
}

/// Public club profile.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/club-response.ts"
)]
pub struct ClubResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl From<ClubSummary> for ClubResponse {
    fn from(value: ClubSummary) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            email: value.email,
            description: value.description,
            image: value.image,
        }
    }
}
