use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Strength};
use once_cell::sync::Lazy;

static COLLATOR: Lazy<Option<Collator>> = Lazy::new(|| {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    Collator::try_new(&Default::default(), options).ok()
});

/// Case- and diacritic-aware name comparison used for display sorting.
/// Falls back to a case-folded byte comparison if collation data is
/// unavailable, so ordering stays deterministic either way.
/// 用於顯示排序的名稱比較，大小寫與變音符號皆納入考量。
pub fn compare_names(a: &str, b: &str) -> Ordering {
    match COLLATOR.as_ref() {
        Some(collator) => collator.compare(a, b),
        None => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
    }
}
