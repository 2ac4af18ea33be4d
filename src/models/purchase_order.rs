use crate::auth::SessionUser;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 采购单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Draft => "DRAFT",
            PurchaseOrderStatus::Pending => "PENDING",
            PurchaseOrderStatus::Approved => "APPROVED",
            PurchaseOrderStatus::Rejected => "REJECTED",
            PurchaseOrderStatus::Cancelled => "CANCELLED",
        }
    }
}

/// 采购单查询条件; `None` 字段不参与过滤
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseOrderFilter {
    pub status_equals: Option<PurchaseOrderStatus>,
    pub created_by_id_equals: Option<String>,
}

impl PurchaseOrderFilter {
    /// 已审批采购单, USER 角色只看自己创建的
    pub fn for_session_user(user: &SessionUser) -> Self {
        Self {
            status_equals: Some(PurchaseOrderStatus::Approved),
            created_by_id_equals: user.role.is_self_scoped().then(|| user.id.clone()),
        }
    }
}

/// 采购单关联的供应商 (id, name)
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SupplierRef {
    pub id: String,
    pub name: String,
}

/// 采购单投影: 仅包含统计所需字段
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PurchaseOrderRecord {
    pub supplier_id: String,
    pub total_amount: BigDecimal,
    pub approved_at: Option<DateTime<Utc>>,
    #[sqlx(flatten)]
    pub supplier: SupplierRef,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    #[test]
    fn user_role_is_scoped_to_own_orders() {
        let user = SessionUser {
            id: "u-7".to_string(),
            role: Role::User,
        };
        let filter = PurchaseOrderFilter::for_session_user(&user);
        assert_eq!(filter.status_equals, Some(PurchaseOrderStatus::Approved));
        assert_eq!(filter.created_by_id_equals.as_deref(), Some("u-7"));
    }

    #[test]
    fn privileged_roles_see_all_approved_orders() {
        for role in [Role::Admin, Role::Manager, Role::Approver, Role::Other("AUDITOR".into())] {
            let user = SessionUser {
                id: "u-1".to_string(),
                role,
            };
            let filter = PurchaseOrderFilter::for_session_user(&user);
            assert_eq!(filter.status_equals, Some(PurchaseOrderStatus::Approved));
            assert!(filter.created_by_id_equals.is_none());
        }
    }
}
