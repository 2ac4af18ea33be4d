use crate::error::AppError;
use async_trait::async_trait;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// 用户角色 (线上格式为大写字符串, 未知角色保留原值)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Approver,
    Manager,
    Admin,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "USER",
            Role::Approver => "APPROVER",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
            Role::Other(raw) => raw,
        }
    }

    /// 普通用户只能看到自己创建的采购单
    pub fn is_self_scoped(&self) -> bool {
        matches!(self, Role::User)
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "USER" => Role::User,
            "APPROVER" => Role::Approver,
            "MANAGER" => Role::Manager,
            "ADMIN" => Role::Admin,
            _ => Role::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 已登录用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub role: Role,
}

/// 会话; `user` 为空表示未登录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn for_user(id: impl Into<String>, role: Role) -> Self {
        Self {
            user: Some(SessionUser {
                id: id.into(),
                role,
            }),
        }
    }
}

pub type DynSessionResolver = Arc<dyn SessionResolver>;

/// 会话解析器: 根据请求头解析当前会话
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Session>, AppError>;
}
