use bigdecimal::BigDecimal;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};

/// 供应商汇总 (内存中, 以 supplier_id 为键)
#[derive(Debug, Clone, PartialEq)]
pub struct SupplierAggregate {
    pub supplier_id: String,
    pub name: String,
    pub total_spent: BigDecimal,
    pub monthly_spent: BigDecimal,
    pub po_count: i64,
}

/// 排行榜条目
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSupplier {
    pub supplier_id: String,
    pub supplier_name: String,
    #[serde(serialize_with = "serialize_amount")]
    pub total_spent: BigDecimal,
    #[serde(serialize_with = "serialize_amount")]
    pub monthly_spent: BigDecimal,
    pub po_count: i64,
}

impl From<SupplierAggregate> for TopSupplier {
    fn from(agg: SupplierAggregate) -> Self {
        Self {
            supplier_id: agg.supplier_id,
            supplier_name: agg.name,
            total_spent: agg.total_spent,
            monthly_spent: agg.monthly_spent,
            po_count: agg.po_count,
        }
    }
}

/// 响应体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSuppliersResponse {
    pub top_suppliers: Vec<TopSupplier>,
}

/// 金额以 JSON 数字输出; 经十进制字符串解析, 取最接近的 f64
fn serialize_amount<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value.to_string().parse::<f64>() {
        Ok(number) if number.is_finite() => serializer.serialize_f64(number),
        _ => Err(S::Error::custom(format!("amount {value} is not representable"))),
    }
}
