use bd_core::{ListEntity, ListParams, ListPhase, PaginationInfo};

use crate::resource::ListPage;

/// Everything a list screen renders.
/// 列表页面渲染所需的全部状态。
#[derive(Debug, Clone)]
pub struct ListView<E: ListEntity> {
    pub items: Vec<E>,
    pub pagination: PaginationInfo,
    pub stats: Option<E::Stats>,
    pub phase: ListPhase,
    pub is_loading: bool,
    pub is_refreshing: bool,
    /// Items belong to the previous filters while the new ones load
    pub is_placeholder: bool,
    /// User-facing message of the last failed fetch, cleared on success
    pub last_error: Option<String>,
    pub filters: ListParams,
}

impl<E: ListEntity> ListView<E> {
    pub fn initial(filters: ListParams) -> Self {
        Self {
            items: Vec::new(),
            pagination: PaginationInfo::single_page(0),
            stats: None,
            phase: ListPhase::Idle,
            is_loading: false,
            is_refreshing: false,
            is_placeholder: false,
            last_error: None,
            filters,
        }
    }

    pub(crate) fn build(
        page: Option<&ListPage<E>>,
        phase: ListPhase,
        is_placeholder: bool,
        last_error: Option<String>,
        filters: ListParams,
    ) -> Self {
        let mut view = Self::initial(filters);
        if let Some(page) = page {
            view.items = page.items.clone();
            view.pagination = page.pagination;
            view.stats = page.stats.clone();
        }
        view.phase = phase;
        view.is_loading = phase.is_loading();
        view.is_refreshing = phase.is_refreshing();
        view.is_placeholder = is_placeholder;
        view.last_error = last_error;
        view
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
