pub mod report;

pub use report::{
    aggregate_by_supplier, rank_top_suppliers, MonthWindow, ReportService, TOP_SUPPLIER_LIMIT,
};
