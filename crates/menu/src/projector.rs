use foldermenu_access::{AccessResolver, DirectoryHandle};
use foldermenu_config::{IconFidelity, MenuConfiguration};
use foldermenu_snapshot::{DirectoryEntry, SnapshotError};

use crate::node::{EventStamp, MenuNode, NodeState};
use crate::reconcile::{reconcile, RowEdit};
use crate::row::{entry_row, options_section, upsell_section, Row, EMPTY_LABEL, REMEDIATION_HINT};

/// Seam over the directory snapshotter so the projector can be exercised
/// without touching a real filesystem.
pub trait SnapshotSource {
    fn entries(
        &mut self,
        handle: &DirectoryHandle,
        fidelity: IconFidelity,
        purchased: bool,
    ) -> Result<Vec<DirectoryEntry>, SnapshotError>;
}

/// Production source: synchronous reads through `foldermenu_snapshot`.
#[derive(Debug, Default)]
pub struct FsSnapshotSource;

impl SnapshotSource for FsSnapshotSource {
    fn entries(
        &mut self,
        handle: &DirectoryHandle,
        fidelity: IconFidelity,
        purchased: bool,
    ) -> Result<Vec<DirectoryEntry>, SnapshotError> {
        foldermenu_snapshot::snapshot(handle, fidelity, purchased)
    }
}

/// Host-supplied state for one display event. Everything the platform keeps
/// as ambient globals arrives here as an explicit parameter: the purchased
/// flag is re-read by the host on every refresh, options visibility follows
/// the click/modifier routing, and `highlighted` marks the one node the user
/// is actually interacting with.
/// 單次顯示事件的宿主狀態；平台的全域狀態在此全部改為明確參數。
#[derive(Debug, Clone, Copy)]
pub struct DisplayContext {
    pub purchased: bool,
    pub show_options: bool,
    pub highlighted: bool,
    pub event: Option<EventStamp>,
}

/// Projects directory snapshots onto the lazily materialised menu tree.
/// 將目錄快照投影到延遲建立的選單樹。
#[derive(Debug, Default)]
pub struct MenuProjector<S = FsSnapshotSource> {
    source: S,
}

impl MenuProjector<FsSnapshotSource> {
    pub fn new() -> Self {
        Self {
            source: FsSnapshotSource,
        }
    }
}

impl<S: SnapshotSource> MenuProjector<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Refreshes the root node of a configuration, resolving its folder
    /// reference first. A resolution failure renders as error rows on this
    /// node; it is never fatal.
    pub fn refresh_root(
        &mut self,
        node: &mut MenuNode,
        configuration: &MenuConfiguration,
        resolver: &mut AccessResolver,
        ctx: &DisplayContext,
    ) -> Vec<RowEdit> {
        if !ctx.highlighted {
            return Vec::new();
        }
        match resolver.resolve(configuration) {
            Ok(handle) => self.refresh(node, &handle, configuration, ctx),
            Err(err) => self.render_error(node, err.to_string(), ctx),
        }
    }

    /// Refreshes one submenu node that is about to be shown. `scope` is the
    /// root grant; the node's own handle is derived from it, so no second
    /// resolution happens below the root.
    /// 重新整理即將顯示的子選單節點；由根授權衍生握柄，不再重複解析。
    pub fn refresh_node(
        &mut self,
        node: &mut MenuNode,
        scope: &DirectoryHandle,
        configuration: &MenuConfiguration,
        ctx: &DisplayContext,
    ) -> Vec<RowEdit> {
        if !ctx.highlighted {
            return Vec::new();
        }
        let handle = scope.child(node.directory());
        self.refresh(node, &handle, configuration, ctx)
    }

    fn refresh(
        &mut self,
        node: &mut MenuNode,
        handle: &DirectoryHandle,
        configuration: &MenuConfiguration,
        ctx: &DisplayContext,
    ) -> Vec<RowEdit> {
        if node.debounce.hit(ctx.event) && *node.state() == NodeState::Expanded {
            log::debug!(
                "debounce: reusing rows for {}",
                node.directory().display()
            );
            return Vec::new();
        }

        node.set_state(NodeState::Expanding);
        match self
            .source
            .entries(handle, configuration.icon_fidelity, ctx.purchased)
        {
            Ok(entries) => {
                let mut rows = Vec::new();
                if ctx.show_options {
                    rows.extend(options_section());
                }
                rows.extend(entries.iter().map(entry_row));
                if !ctx.purchased {
                    rows.extend(upsell_section());
                }
                if rows.is_empty() {
                    rows.push(Row::Message(EMPTY_LABEL.to_string()));
                }

                node.reconcile_children(&entries);
                let edits = reconcile(node.rows(), &rows);
                node.replace_rows(rows);
                node.set_state(NodeState::Expanded);
                node.debounce.record(ctx.event);
                edits
            }
            Err(err) => self.render_error(node, err.to_string(), ctx),
        }
    }

    /// Replaces the node's content with the options block (when shown), the
    /// error message, and a remediation hint. Errors stay on this node; the
    /// debounce stamp is not recorded, so the next display event retries.
    fn render_error(
        &mut self,
        node: &mut MenuNode,
        message: String,
        ctx: &DisplayContext,
    ) -> Vec<RowEdit> {
        let mut rows = Vec::new();
        if ctx.show_options {
            rows.extend(options_section());
        }
        rows.push(Row::Message(message.clone()));
        rows.push(Row::Message(REMEDIATION_HINT.to_string()));

        node.clear_children();
        let edits = reconcile(node.rows(), &rows);
        node.replace_rows(rows);
        node.set_state(NodeState::Error(message));
        edits
    }
}
