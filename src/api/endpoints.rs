// Hub API endpoint functions.
// Provides typed methods for the JSON endpoints the page calls.

use std::future::Future;

use reqwest::Response;

use crate::error::FetchError;
use crate::state::roles::RoleSource;

use super::client::HubClient;
use super::types::RoleOption;

/// Roles and organizations available to the signed-in user.
pub const USER_ROLES: &str = "/api/user/roles/";

/// Form endpoint that applies a role switch.
pub const SET_ROLE: &str = "/set_role/";

impl HubClient {
    /// Get the roles the current user may switch into.
    pub async fn get_user_roles(&self) -> Result<Vec<RoleOption>, FetchError> {
        let response = self.get(USER_ROLES).await?;
        decode_roles(response).await
    }
}

/// Decode a role list body.
async fn decode_roles(response: Response) -> Result<Vec<RoleOption>, FetchError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(FetchError::Decode)
}

impl RoleSource for HubClient {
    fn fetch_roles(&self) -> impl Future<Output = Result<Vec<RoleOption>, FetchError>> + Send {
        self.get_user_roles()
    }
}
