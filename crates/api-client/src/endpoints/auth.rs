//! Authentication endpoints

use crate::flat::FlatRequest;
use crate::request::RequestConfig;
use crate::response::FlatResponse;
use serde::{Deserialize, Serialize};

/// Login route
const LOGIN_PATH: &str = "/auth/login";

/// Authentication API interface
#[derive(Clone)]
pub struct AuthApi {
    request: FlatRequest,
}

impl AuthApi {
    /// Create a new authentication API interface
    #[must_use]
    pub fn new(request: FlatRequest) -> Self {
        Self { request }
    }

    /// Log in
    ///
    /// POST /auth/login
    pub async fn login(&self, params: &LoginParams) -> FlatResponse<LoginVo> {
        match RequestConfig::post(LOGIN_PATH).with_json(params) {
            Ok(config) => self.request.request(config).await,
            Err(error) => FlatResponse::failure(error),
        }
    }
}

/// Login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginParams {
    /// User name
    pub user_name: String,
    /// Password
    pub password: String,
}

/// Session issued by a successful login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginVo {
    /// Name of the token header
    pub token_name: String,
    /// Token value
    pub token_value: String,
    /// Whether the session is logged in
    pub is_login: bool,
    /// Login identifier
    pub login_id: String,
    /// Login type
    pub login_type: String,
    /// Token lifetime in seconds
    pub token_timeout: i64,
    /// Session lifetime in seconds
    pub session_timeout: i64,
    /// Token session lifetime in seconds
    pub token_session_timeout: i64,
    /// Inactivity timeout in seconds
    pub token_active_timeout: i64,
    /// Device the login came from
    pub login_device: String,
    /// Optional tag
    pub tag: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_vo_deserialize() {
        let json = r#"{
            "tokenName": "satoken",
            "tokenValue": "abc",
            "isLogin": true,
            "loginId": "10001",
            "loginType": "login",
            "tokenTimeout": 2592000,
            "sessionTimeout": 2592000,
            "tokenSessionTimeout": -2,
            "tokenActiveTimeout": -1,
            "loginDevice": "default-device",
            "tag": null
        }"#;

        let vo: LoginVo = serde_json::from_str(json).unwrap();
        assert_eq!(vo.token_value, "abc");
        assert!(vo.is_login);
        assert_eq!(vo.token_session_timeout, -2);
        assert!(vo.tag.is_none());
    }

    #[test]
    fn test_login_params_serialize() {
        let params = LoginParams {
            user_name: "admin".into(),
            password: "secret".into(),
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["userName"], "admin");
    }
}
