pub mod purchase_order;
pub mod supplier;

pub use purchase_order::{
    PurchaseOrderFilter, PurchaseOrderRecord, PurchaseOrderStatus, SupplierRef,
};
pub use supplier::{SupplierAggregate, TopSupplier, TopSuppliersResponse};
