use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Device ─────────────────────────────────────────────────────────────────

/// Lifecycle status stored on the server. Online/offline is derived
/// server-side from `last_seen` and never computed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Active,
    Inactive,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Active => "active",
            DeviceStatus::Inactive => "inactive",
        }
    }
}

/// A registered device as the server reports it. Read-only, possibly stale;
/// mutations go through the bulk or single-device endpoints and re-fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: Uuid,
    pub hostname: String,
    pub serial_number: String,
    pub os_name: String,
    pub os_version: String,
    pub os_build: String,
    pub os_arch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_boot_time: Option<DateTime<Utc>>,
    pub logged_in_user: String,
    pub agent_version: String,
    pub license_status: String,
    pub status: DeviceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_name: Option<String>,
    pub last_seen: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of the device listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceListPage {
    pub devices: Vec<Device>,
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

impl DeviceListPage {
    /// Number of pages at this page size (at least 1).
    pub fn page_count(&self) -> u32 {
        if self.limit == 0 {
            return 1;
        }
        ((self.total + u64::from(self.limit) - 1) / u64::from(self.limit)).max(1) as u32
    }

    pub fn visible_ids(&self) -> Vec<Uuid> {
        self.devices.iter().map(|d| d.id).collect()
    }
}

// ─── Device detail ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hardware {
    pub id: Uuid,
    pub device_id: Uuid,
    pub cpu_model: String,
    pub cpu_cores: i32,
    pub cpu_threads: i32,
    pub ram_total_bytes: i64,
    pub motherboard_manufacturer: String,
    pub motherboard_product: String,
    pub motherboard_serial: String,
    pub bios_vendor: String,
    pub bios_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disk {
    pub id: Uuid,
    pub device_id: Uuid,
    pub model: String,
    pub size_bytes: i64,
    pub media_type: String,
    pub serial_number: String,
    pub interface_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub id: Uuid,
    pub device_id: Uuid,
    pub name: String,
    pub mac_address: String,
    pub ipv4_address: String,
    pub ipv6_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_mbps: Option<i32>,
    pub is_physical: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledSoftware {
    pub id: Uuid,
    pub device_id: Uuid,
    pub name: String,
    pub version: String,
    pub vendor: String,
    pub install_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteTool {
    pub id: Uuid,
    pub device_id: Uuid,
    pub tool_name: String,
    pub remote_id: String,
    pub version: String,
}

/// Full detail envelope for a single device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDetail {
    pub device: Device,
    #[serde(default)]
    pub hardware: Option<Hardware>,
    #[serde(default)]
    pub disks: Vec<Disk>,
    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterface>,
    #[serde(default)]
    pub installed_software: Vec<InstalledSoftware>,
    #[serde(default)]
    pub remote_tools: Vec<RemoteTool>,
}

// ─── Activity log ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub device_id: Uuid,
    pub activity_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityPage {
    pub activities: Vec<ActivityEntry>,
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

// ─── Department ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentList {
    pub departments: Vec<Department>,
}

// ─── Dashboard ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartItem {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentDevice {
    pub id: Uuid,
    pub hostname: String,
    pub os_name: String,
    pub status: DeviceStatus,
    pub last_seen: DateTime<Utc>,
}

/// Aggregate counts for the dashboard. `total` covers active devices only;
/// `inactive` is tracked separately, mirroring the server's stats query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total: u64,
    pub online: u64,
    pub offline: u64,
    #[serde(default)]
    pub inactive: u64,
    #[serde(default)]
    pub os_distribution: Vec<ChartItem>,
    #[serde(default)]
    pub recent_devices: Vec<RecentDevice>,
}

// ─── Envelopes ──────────────────────────────────────────────────────────────

/// Result of every bulk endpoint. Feedback only: the affected count is the
/// server's word and is never reconciled against local state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOutcome {
    pub affected: u64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub role: String,
}
