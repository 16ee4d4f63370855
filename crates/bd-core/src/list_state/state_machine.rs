//! List screen state machine.
//!
//! Defines a pure state transition function for a mounted list screen.

/// Lifecycle phase of a list screen.
///
/// 列表页面的生命周期阶段。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ListPhase {
    /// Nothing loaded yet, nothing in flight.
    ///
    /// 尚未加载。
    #[default]
    Idle,
    /// First fetch in flight, nothing to show.
    ///
    /// 首次加载中。
    Loading,
    /// Data on screen.
    ///
    /// 数据已就绪。
    Ready,
    /// Data on screen while a newer fetch runs.
    ///
    /// 显示旧数据并在后台刷新。
    Refreshing,
}

/// Events that drive the list screen.
///
/// 驱动列表页面的事件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ListEvent {
    /// A fetch was started (mount, refresh, filter or page change).
    FetchStarted { has_data: bool },
    /// The fetch the screen is waiting on resolved.
    FetchSucceeded,
    /// The fetch the screen is waiting on failed.
    FetchFailed { has_data: bool },
    /// A single item was replaced in place.
    ItemPatched,
}

impl ListPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, ListPhase::Loading)
    }

    pub fn is_refreshing(&self) -> bool {
        matches!(self, ListPhase::Refreshing)
    }
}

/// Pure list state machine.
///
/// 纯状态机：不包含副作用。
pub struct ListStateMachine;

impl ListStateMachine {
    pub fn transition(phase: ListPhase, event: ListEvent) -> ListPhase {
        match (phase, event) {
            (_, ListEvent::FetchStarted { has_data: true }) => ListPhase::Refreshing,
            (ListPhase::Ready | ListPhase::Refreshing, ListEvent::FetchStarted { has_data: false }) => {
                ListPhase::Refreshing
            }
            (_, ListEvent::FetchStarted { has_data: false }) => ListPhase::Loading,
            (_, ListEvent::FetchSucceeded) => ListPhase::Ready,
            (_, ListEvent::FetchFailed { has_data: true }) => ListPhase::Ready,
            (_, ListEvent::FetchFailed { has_data: false }) => ListPhase::Idle,
            (ListPhase::Ready, ListEvent::ItemPatched) => ListPhase::Ready,
            (phase, ListEvent::ItemPatched) => phase,
        }
    }
}
