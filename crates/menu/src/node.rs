use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use foldermenu_snapshot::DirectoryEntry;

use crate::row::Row;

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier for a menu node. The host maps ids to its own
/// widgets; nodes never hold a reference back to the host, so no ownership
/// cycle can form between the tree and the widget layer.
/// 選單節點的行程內唯一識別碼；宿主以識別碼對應元件，節點不回持宿主參照。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Opaque display-event stamp supplied by the host. Compared by equality
/// only; two stamps are the same logical user action iff they are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventStamp(pub u64);

/// Suppresses redundant re-snapshots when the platform delivers the same
/// expansion event more than once. Not a freshness mechanism.
/// 抑制同一事件重複觸發的快照；並非快取新鮮度機制。
#[derive(Debug, Default)]
pub(crate) struct Debounce {
    last_event: Option<EventStamp>,
}

impl Debounce {
    pub(crate) fn hit(&self, event: Option<EventStamp>) -> bool {
        matches!((self.last_event, event), (Some(last), Some(current)) if last == current)
    }

    pub(crate) fn record(&mut self, event: Option<EventStamp>) {
        self.last_event = event;
    }
}

/// Lifecycle of a node between display events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState {
    Collapsed,
    /// A snapshot is in progress. Everything is synchronous, so this is
    /// observable only by a reentrant caller during refresh.
    Expanding,
    Expanded,
    Error(String),
}

/// Live projection of one directory: its current rows and lazily built child
/// nodes for subdirectories.
/// 單一目錄的即時投影：目前的列清單與延遲建立的子節點。
#[derive(Debug)]
pub struct MenuNode {
    id: NodeId,
    directory: PathBuf,
    state: NodeState,
    rows: Vec<Row>,
    children: HashMap<PathBuf, MenuNode>,
    pub(crate) debounce: Debounce,
}

impl MenuNode {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            id: NodeId::next(),
            directory: directory.into(),
            state: NodeState::Collapsed,
            rows: Vec::new(),
            children: HashMap::new(),
            debounce: Debounce::default(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn state(&self) -> &NodeState {
        &self.state
    }

    /// The rows as of the last refresh.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn child(&self, directory: &Path) -> Option<&MenuNode> {
        self.children.get(directory)
    }

    pub fn child_mut(&mut self, directory: &Path) -> Option<&mut MenuNode> {
        self.children.get_mut(directory)
    }

    /// Marks the node no longer displayed. Rows and children are kept so an
    /// unchanged re-expansion can reuse them; any in-flight expansion state
    /// is simply discarded.
    pub fn collapse(&mut self) {
        if self.state != NodeState::Collapsed {
            self.state = NodeState::Collapsed;
        }
    }

    pub(crate) fn set_state(&mut self, state: NodeState) {
        self.state = state;
    }

    pub(crate) fn replace_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    /// Reuses the child node for every traversable entry whose directory is
    /// unchanged, creates nodes for new subdirectories, and drops nodes
    /// whose directory is no longer listed.
    /// 路徑不變的子節點沿用，新子目錄建立節點，消失的目錄則捨棄節點。
    pub(crate) fn reconcile_children(&mut self, entries: &[DirectoryEntry]) {
        for entry in entries {
            if entry.is_traversable() && !self.children.contains_key(&entry.path) {
                self.children
                    .insert(entry.path.clone(), MenuNode::new(&entry.path));
            }
        }
        self.children.retain(|path, _| {
            entries
                .iter()
                .any(|entry| entry.is_traversable() && entry.path == *path)
        });
    }

    pub(crate) fn clear_children(&mut self) {
        self.children.clear();
    }
}
