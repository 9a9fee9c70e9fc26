//! View layer: the per-system game lists, the system carousel, and the
//! navigator that owns them.
//!
//! Views never call back into the navigator; input they cannot fully
//! handle comes back as a [`ViewEvent`] for the navigator to act on. That
//! keeps the state machine single-writer and re-entrancy free.

pub mod gamelist;
pub mod navigator;
pub mod system_select;

pub use gamelist::{GameListKind, GameListView};
pub use navigator::{NavEvent, ViewNavigator, Viewing};
pub use system_select::SystemSelectView;

use crate::entities::CatalogEntry;
use crate::store::SystemId;

/// What a view wants done in response to input it accepted.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
    /// Input was handled inside the view (cursor moved, folder entered).
    Consumed,
    Launch(CatalogEntry),
    EnterSystem(SystemId),
    LeaveToSystemSelect,
    NextSystem,
    PrevSystem,
}
