use uuid::Uuid;

use crate::api::models::DeviceStatus;

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 100;

// ─── Filter state ───────────────────────────────────────────────────────────

/// Columns the server accepts in `sort`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Hostname,
    Os,
    LastSeen,
    Status,
}

impl SortColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Hostname => "hostname",
            SortColumn::Os => "os",
            SortColumn::LastSeen => "last_seen",
            SortColumn::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Status dimension of the listing. Unset means "all active devices";
/// online/offline further narrow the active set by recency of `last_seen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Online,
    Offline,
    Inactive,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Online => "online",
            StatusFilter::Offline => "offline",
            StatusFilter::Inactive => "inactive",
        }
    }
}

/// Live filter/sort/pagination state of the device list. Single owner: the
/// Explorer. Every mutation except `set_page` snaps back to page 1 so a
/// narrowed result set is never addressed at an out-of-range page.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    hostname: String,
    os: String,
    status: Option<StatusFilter>,
    department_id: Option<Uuid>,
    sort_column: SortColumn,
    sort_order: SortOrder,
    page: u32,
    page_size: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            hostname: String::new(),
            os: String::new(),
            status: None,
            department_id: None,
            sort_column: SortColumn::Hostname,
            sort_order: SortOrder::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterState {
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn status(&self) -> Option<StatusFilter> {
        self.status
    }

    pub fn department_id(&self) -> Option<Uuid> {
        self.department_id
    }

    pub fn sort(&self) -> (SortColumn, SortOrder) {
        (self.sort_column, self.sort_order)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn set_hostname(&mut self, hostname: impl Into<String>) {
        self.hostname = hostname.into();
        self.page = 1;
    }

    pub fn set_os(&mut self, os: impl Into<String>) {
        self.os = os.into();
        self.page = 1;
    }

    pub fn set_status(&mut self, status: Option<StatusFilter>) {
        self.status = status;
        self.page = 1;
    }

    pub fn set_department(&mut self, department_id: Option<Uuid>) {
        self.department_id = department_id;
        self.page = 1;
    }

    pub fn set_sort(&mut self, column: SortColumn, order: SortOrder) {
        self.sort_column = column;
        self.sort_order = order;
        self.page = 1;
    }

    /// Page size is clamped to the server's accepted range.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self.page = 1;
    }

    /// The only mutation that leaves every other dimension untouched.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Descriptor for the device listing, pagination included.
    pub fn descriptor(&self) -> QueryDescriptor {
        self.filter_params(QueryDescriptor::new("devices"))
            .maybe_param("page", (self.page != 1).then(|| self.page.to_string()))
            .maybe_param(
                "limit",
                (self.page_size != DEFAULT_PAGE_SIZE).then(|| self.page_size.to_string()),
            )
    }

    /// Descriptor for the CSV side channel: same filters, no pagination —
    /// an export always covers the full filtered set.
    pub fn export_descriptor(&self) -> QueryDescriptor {
        self.filter_params(QueryDescriptor::new("devices/export"))
    }

    fn filter_params(&self, d: QueryDescriptor) -> QueryDescriptor {
        d.maybe_param("department_id", self.department_id.map(|id| id.to_string()))
            .param("hostname", &self.hostname)
            .maybe_param(
                "order",
                (self.sort_order != SortOrder::Asc).then(|| self.sort_order.as_str().to_string()),
            )
            .param("os", &self.os)
            .maybe_param(
                "sort",
                (self.sort_column != SortColumn::Hostname)
                    .then(|| self.sort_column.as_str().to_string()),
            )
            .maybe_param("status", self.status.map(|s| s.as_str().to_string()))
    }
}

// ─── Query descriptor ───────────────────────────────────────────────────────

/// Canonical serialization of one server query: resource path plus a
/// minimal, order-fixed parameter list. Two semantically equivalent filter
/// states compose to the same descriptor, so any two views asking the same
/// question share one cache entry and one fetch.
///
/// Canonical form: parameters appear in a fixed builder order (filter
/// dimensions first, pagination last), empty values and server defaults are
/// omitted entirely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryDescriptor {
    path: String,
    params: Vec<(String, String)>,
}

impl QueryDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        QueryDescriptor { path: path.into(), params: Vec::new() }
    }

    /// Adds a parameter, dropping empty values so `{status: ""}` and an
    /// absent status normalize identically.
    pub fn param(mut self, key: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.params.push((key.to_string(), value.to_string()));
        }
        self
    }

    pub fn maybe_param(self, key: &str, value: Option<String>) -> Self {
        match value {
            Some(v) => self.param(key, &v),
            None => self,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// The cache key. Descriptor identity and key identity coincide.
    pub fn cache_key(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> =
            self.params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{}?{}", self.path, query.join("&"))
    }

    /// True when this descriptor addresses the device collection in any
    /// form (listing, export, detail, activity).
    pub fn is_devices(&self) -> bool {
        self.path == "devices" || self.path.starts_with("devices/")
    }
}
