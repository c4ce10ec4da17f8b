//! Client core of the device inventory console: query composition, request
//! caching, cross-page selection, bulk-action orchestration, and CSV export
//! against the inventory REST API. Views are consumers of this crate; the
//! server stays an opaque collaborator.

pub mod api;
pub mod bulk;
pub mod cache;
pub mod config;
pub mod debounce;
pub mod error;
pub mod explorer;
pub mod export;
pub mod query;
pub mod selection;
pub mod session;
pub mod transport;

pub use api::auth::AuthClient;
pub use api::dashboard::DashboardClient;
pub use api::departments::DepartmentClient;
pub use api::devices::DeviceClient;
pub use api::models::{
    BulkOutcome, DashboardStats, Department, DepartmentList, Device, DeviceDetail,
    DeviceListPage, DeviceStatus,
};
pub use bulk::{BulkAction, BulkError, BulkOrchestrator, BulkPhase, CacheScope, MutationKind};
pub use cache::QueryCache;
pub use config::ClientConfig;
pub use error::{FetchError, FetchResult};
pub use explorer::{DeviceExplorer, FilterEdit};
pub use export::{CsvExport, CsvExportClient};
pub use query::{FilterState, QueryDescriptor, SortColumn, SortOrder, StatusFilter};
pub use selection::SelectionSet;
pub use session::{SessionHandle, SessionState};
pub use transport::{HttpTransport, RawResponse, Transport};
