use crate::row::Row;

/// One in-place edit against the host's existing row widgets.
/// 對宿主既有列元件的單一就地修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEdit {
    /// Same widget kind at this index: update its content in place,
    /// preserving any transient selection or focus state.
    Update(usize),
    /// Kind mismatch at this index: the widget must be swapped out.
    Replace(usize),
    /// New trailing row at this index.
    Append(usize),
    /// Drop every widget from this index onward.
    Truncate(usize),
}

/// Computes the minimal positional patch turning `old` into `new`. Rows are
/// matched by position; only the trailing delta is inserted or removed.
/// There is deliberately no "rebuild everything" signal.
/// 以位置對齊計算最小修補；僅在尾端插入或移除，絕不整批重建。
pub fn reconcile(old: &[Row], new: &[Row]) -> Vec<RowEdit> {
    let mut edits = Vec::new();
    for (index, row) in new.iter().enumerate() {
        match old.get(index) {
            Some(existing) if existing == row => {}
            Some(existing) if existing.kind() == row.kind() => edits.push(RowEdit::Update(index)),
            Some(_) => edits.push(RowEdit::Replace(index)),
            None => edits.push(RowEdit::Append(index)),
        }
    }
    if old.len() > new.len() {
        edits.push(RowEdit::Truncate(new.len()));
    }
    edits
}
