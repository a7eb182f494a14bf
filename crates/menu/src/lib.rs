//! Lazy directory-to-menu projection: the menu node tree, row model, display
//! policy, and per-event debounce.
//! 目錄到選單的延遲投影：選單節點樹、列模型、顯示樣式與事件防抖。

pub mod node;
pub mod policy;
pub mod projector;
pub mod reconcile;
pub mod row;

pub use node::{EventStamp, MenuNode, NodeId, NodeState};
pub use policy::{row_style, status_item_style, RowStyle, StatusItemStyle};
pub use projector::{DisplayContext, FsSnapshotSource, MenuProjector, SnapshotSource};
pub use reconcile::{reconcile, RowEdit};
pub use row::{
    activate, entry_row, options_section, upsell_section, ActionRow, Activation, EntryRow,
    MenuAction, Row, RowKind, EMPTY_LABEL, REMEDIATION_HINT,
};
