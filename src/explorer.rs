use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::api::departments::DepartmentClient;
use crate::api::devices::DeviceClient;
use crate::api::models::{BulkOutcome, DepartmentList, DeviceListPage, Message};
use crate::bulk::{BulkAction, BulkError, BulkFlowError, BulkOrchestrator, BulkPhase};
use crate::cache::QueryCache;
use crate::debounce::Debouncer;
use crate::error::FetchResult;
use crate::export::{CsvExport, CsvExportClient};
use crate::query::{FilterState, SortColumn, SortOrder, StatusFilter};
use crate::selection::SelectionSet;
use crate::transport::Transport;

/// A debounced text-field edit that has settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEdit {
    Hostname(String),
    Os(String),
}

/// The device list view's engine: single owner of the filter state, the
/// selection, and the bulk orchestrator, wired to the process-wide cache.
///
/// Text input goes through per-field debouncers; everything else mutates
/// the filter immediately. Every filter mutation except paging snaps back
/// to page 1. Dropping the explorer aborts pending debounce timers, so a
/// view that navigated away cannot trigger a late fetch.
pub struct DeviceExplorer {
    filter: FilterState,
    selection: SelectionSet,
    hostname_input: Debouncer<FilterEdit>,
    os_input: Debouncer<FilterEdit>,
    edits: mpsc::UnboundedReceiver<FilterEdit>,
    devices: DeviceClient,
    departments: DepartmentClient,
    export: CsvExportClient,
    bulk: BulkOrchestrator,
}

impl DeviceExplorer {
    pub fn new(
        transport: Arc<dyn Transport>,
        cache: Arc<QueryCache>,
        debounce: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let devices = DeviceClient::new(Arc::clone(&transport), Arc::clone(&cache));
        DeviceExplorer {
            filter: FilterState::default(),
            selection: SelectionSet::new(),
            hostname_input: Debouncer::new(debounce, tx.clone()),
            os_input: Debouncer::new(debounce, tx),
            edits: rx,
            bulk: BulkOrchestrator::new(devices.clone(), Arc::clone(&cache)),
            departments: DepartmentClient::new(Arc::clone(&transport), cache),
            export: CsvExportClient::new(transport),
            devices,
        }
    }

    // ─── Filter input ───────────────────────────────────────────────────

    /// Keystroke in the hostname search box. Nothing happens until the
    /// input has been quiet for the debounce window.
    pub fn type_hostname(&mut self, text: impl Into<String>) {
        self.hostname_input.submit(FilterEdit::Hostname(text.into()));
    }

    /// Keystroke in the OS filter box.
    pub fn type_os(&mut self, text: impl Into<String>) {
        self.os_input.submit(FilterEdit::Os(text.into()));
    }

    /// Waits for the next debounced edit and applies it to the filter.
    pub async fn settled_edit(&mut self) -> FilterEdit {
        let edit = self.edits.recv().await.expect("debouncers hold the sender");
        self.apply_edit(edit.clone());
        edit
    }

    /// Applies whatever edits have already settled, without waiting.
    pub fn apply_settled_edits(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(edit) = self.edits.try_recv() {
            self.apply_edit(edit);
            applied += 1;
        }
        applied
    }

    fn apply_edit(&mut self, edit: FilterEdit) {
        match edit {
            FilterEdit::Hostname(text) => self.filter.set_hostname(text),
            FilterEdit::Os(text) => self.filter.set_os(text),
        }
    }

    /// Discards pending keystrokes without applying them.
    pub fn cancel_pending_input(&mut self) {
        self.hostname_input.cancel();
        self.os_input.cancel();
        while self.edits.try_recv().is_ok() {}
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_status_filter(&mut self, status: Option<StatusFilter>) {
        self.filter.set_status(status);
    }

    pub fn set_department_filter(&mut self, department_id: Option<Uuid>) {
        self.filter.set_department(department_id);
    }

    pub fn set_sort(&mut self, column: SortColumn, order: SortOrder) {
        self.filter.set_sort(column, order);
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.filter.set_page_size(page_size);
    }

    pub fn set_page(&mut self, page: u32) {
        self.filter.set_page(page);
    }

    // ─── Data ───────────────────────────────────────────────────────────

    pub async fn current_page(&self) -> FetchResult<DeviceListPage> {
        self.devices.list(&self.filter).await
    }

    pub fn devices(&self) -> &DeviceClient {
        &self.devices
    }

    // ─── Selection ──────────────────────────────────────────────────────

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn toggle_device(&mut self, id: Uuid) {
        self.selection.toggle(id);
    }

    /// Select-all over the page the user is looking at.
    pub fn select_all_visible(&mut self, page: &DeviceListPage) {
        self.selection.select_all_visible(&page.visible_ids());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ─── Bulk actions ───────────────────────────────────────────────────

    pub fn bulk_phase(&self) -> &BulkPhase {
        self.bulk.phase()
    }

    pub fn begin_bulk(&mut self, action: BulkAction) -> Result<(), BulkFlowError> {
        self.bulk.begin(action)
    }

    pub fn confirm_bulk(&mut self) -> Result<(), BulkFlowError> {
        self.bulk.confirm()
    }

    pub fn cancel_bulk(&mut self) {
        self.bulk.cancel()
    }

    pub async fn apply_bulk(&mut self) -> Result<BulkOutcome, BulkError> {
        self.bulk.apply(&mut self.selection).await
    }

    // ─── Departments ────────────────────────────────────────────────────

    pub async fn departments(&self) -> FetchResult<DepartmentList> {
        self.departments.list().await
    }

    /// Deletes a department. Former members come back with their
    /// assignment cleared, so the selection is dropped and a filter pinned
    /// to the deleted department is reset before the next fetch.
    pub async fn delete_department(&mut self, id: Uuid) -> FetchResult<Message> {
        let message = self.departments.delete(id).await?;
        self.selection.clear();
        if self.filter.department_id() == Some(id) {
            self.filter.set_department(None);
        }
        Ok(message)
    }

    // ─── Export ─────────────────────────────────────────────────────────

    /// Exports the full filtered set (never just the current page) as CSV
    /// into `dest_dir`.
    pub async fn export_csv(&self, dest_dir: &Path) -> FetchResult<CsvExport> {
        self.export.export(&self.filter, dest_dir).await
    }
}
