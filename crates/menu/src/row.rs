use std::path::PathBuf;

use foldermenu_snapshot::{DirectoryEntry, IconRef};

/// Label of the placeholder row shown for a folder with nothing to list.
pub const EMPTY_LABEL: &str = "Empty";

/// Second line rendered under an access or listing error.
pub const REMEDIATION_HINT: &str =
    "Add permission in System Settings > Privacy & Security > Files & Folders.";

/// Options the host dispatches when an action row is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ShowAbout,
    ShowPreferences,
    Quit,
    ShowPurchase,
}

/// A row backed by a real filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRow {
    pub title: String,
    pub target: PathBuf,
    pub icon: IconRef,
    pub has_submenu: bool,
}

/// A fixed app-level action row (options and upsell blocks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRow {
    pub title: String,
    pub action: MenuAction,
}

/// One presentational menu row.
/// 單一選單列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Entry(EntryRow),
    Action(ActionRow),
    Separator,
    /// Non-interactive informational text: the empty placeholder, error
    /// messages, and upsell copy.
    Message(String),
}

/// Reconciliation granularity: separator widgets and content widgets are not
/// interchangeable in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Content,
    Separator,
}

impl Row {
    pub fn kind(&self) -> RowKind {
        match self {
            Row::Separator => RowKind::Separator,
            _ => RowKind::Content,
        }
    }
}

/// Builds the row for one snapshot entry. Packages are leaves; only plain
/// directories advertise a submenu.
pub fn entry_row(entry: &DirectoryEntry) -> Row {
    Row::Entry(EntryRow {
        title: entry.name.clone(),
        target: entry.path.clone(),
        icon: entry.icon.clone(),
        has_submenu: entry.is_traversable(),
    })
}

/// Fixed options block shown on the actively-interacted node when the host
/// signals options visibility (secondary click or modifier key).
pub fn options_section() -> Vec<Row> {
    vec![
        Row::Action(ActionRow {
            title: "About FolderMenu…".to_string(),
            action: MenuAction::ShowAbout,
        }),
        Row::Action(ActionRow {
            title: "Preferences…".to_string(),
            action: MenuAction::ShowPreferences,
        }),
        Row::Action(ActionRow {
            title: "Quit…".to_string(),
            action: MenuAction::Quit,
        }),
        Row::Separator,
    ]
}

/// Fixed upsell block appended after real entries while unpurchased.
pub fn upsell_section() -> Vec<Row> {
    vec![
        Row::Separator,
        Row::Message("FolderMenu is limited to showing 10 items per menu".to_string()),
        Row::Message("Purchase FolderMenu to unlock the full menu".to_string()),
        Row::Action(ActionRow {
            title: "Purchase Options…".to_string(),
            action: MenuAction::ShowPurchase,
        }),
    ]
}

/// What the host should do when a row is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Open the location in its default application.
    Open(PathBuf),
    /// Reveal the location in the file browser instead (modifier held).
    Reveal(PathBuf),
    Action(MenuAction),
}

/// Maps a row activation to a host-dispatchable event. Separators and
/// informational rows are inert.
/// 將列的點擊對應到宿主事件；分隔線與純文字列不可點擊。
pub fn activate(row: &Row, reveal_modifier: bool) -> Option<Activation> {
    match row {
        Row::Entry(entry) => Some(if reveal_modifier {
            Activation::Reveal(entry.target.clone())
        } else {
            Activation::Open(entry.target.clone())
        }),
        Row::Action(action) => Some(Activation::Action(action.action)),
        Row::Separator | Row::Message(_) => None,
    }
}
