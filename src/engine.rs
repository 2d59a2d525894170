//! Client-side list view shared by the players, teams and transfers tables.
//!
//! The engine owns the fetched rows and derives the visible page from them on
//! every call: filter (all active predicates must match), stable sort on one
//! key, then slice. The source order is never mutated, so clearing the sort
//! or flipping direction twice gives back exactly the fetch order.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Debug;

pub const PAGE_SIZES: [usize; 4] = [5, 10, 25, 50];
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Categorical filter value that disables the predicate.
pub const ALL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKey {
    /// Case-insensitive substring over the display name.
    Search,
    Position,
    Team,
    League,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec<K> {
    pub key: K,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Number(f64),
    Text(String),
}

impl SortValue {
    pub fn text(raw: impl Into<String>) -> Self {
        Self::Text(raw.into())
    }

    /// Missing optional text sorts as the empty string.
    pub fn opt_text(raw: Option<&str>) -> Self {
        Self::Text(raw.unwrap_or_default().to_string())
    }

    /// Missing optional numbers sort as zero.
    pub fn opt_number(raw: Option<f64>) -> Self {
        Self::Number(raw.unwrap_or(0.0))
    }
}

/// A row type the engine can filter and sort.
pub trait Listable {
    type SortKey: Copy + Eq + Debug + 'static;

    fn id(&self) -> u32;
    fn display_name(&self) -> &str;
    /// Value compared by a categorical predicate; `None` if the row has no
    /// such category (the predicate then never matches).
    fn category(&self, key: FilterKey) -> Option<&str>;
    fn sort_value(&self, key: Self::SortKey) -> SortValue;

    /// Sortable columns in display order.
    fn sort_columns() -> &'static [Self::SortKey];
    fn sort_label(key: Self::SortKey) -> &'static str;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListStatus {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ListEngine<T: Listable> {
    items: Vec<T>,
    filters: BTreeMap<FilterKey, String>,
    sort: Option<SortSpec<T::SortKey>>,
    page: usize,
    page_size: usize,
    cursor: usize,
    status: ListStatus,
    staged_delete: Option<u32>,
    notice: Option<String>,
}

impl<T: Listable> Default for ListEngine<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<T: Listable> ListEngine<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            filters: BTreeMap::new(),
            sort: None,
            page: 0,
            page_size: clamp_page_size(page_size),
            cursor: 0,
            status: ListStatus::Loading,
            staged_delete: None,
            notice: None,
        }
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == ListStatus::Ready
    }

    pub fn begin_load(&mut self) {
        self.status = ListStatus::Loading;
    }

    /// Swap in a fresh fetch, keeping filters, sort and (clamped) page.
    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.status = ListStatus::Ready;
        if let Some(id) = self.staged_delete
            && !self.items.iter().any(|item| item.id() == id)
        {
            self.staged_delete = None;
        }
        self.clamp_page();
        self.clamp_cursor();
    }

    /// A failed fetch drops the rows; stale data is never shown.
    pub fn fail_load(&mut self, message: impl Into<String>) {
        self.items.clear();
        self.staged_delete = None;
        self.status = ListStatus::Failed(message.into());
        self.page = 0;
        self.cursor = 0;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn find(&self, id: u32) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    // ---- filters ----

    pub fn set_filter(&mut self, key: FilterKey, value: impl Into<String>) {
        let value = value.into();
        if filter_is_active(key, &value) {
            self.filters.insert(key, value);
        } else {
            self.filters.remove(&key);
        }
        self.reset_page();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.reset_page();
    }

    /// Current value, or the inactive default (`""` for search, `All` otherwise).
    pub fn filter(&self, key: FilterKey) -> &str {
        match self.filters.get(&key) {
            Some(value) => value,
            None if key == FilterKey::Search => "",
            None => ALL,
        }
    }

    pub fn active_filters(&self) -> impl Iterator<Item = (FilterKey, &str)> {
        self.filters.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Conjunction of every active predicate.
    pub fn matches(&self, item: &T) -> bool {
        self.filters
            .iter()
            .all(|(key, value)| predicate_matches(item, *key, value))
    }

    // ---- sorting ----

    pub fn sort(&self) -> Option<SortSpec<T::SortKey>> {
        self.sort
    }

    /// Header-click semantics: same key flips, new key starts ascending.
    pub fn sort_by(&mut self, key: T::SortKey) {
        let direction = match self.sort {
            Some(spec) if spec.key == key => match spec.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            },
            _ => SortDirection::Ascending,
        };
        self.sort = Some(SortSpec { key, direction });
        self.reset_page();
    }

    /// `sort_by` on the `idx`-th sortable column.
    pub fn sort_by_column(&mut self, idx: usize) -> bool {
        match T::sort_columns().get(idx) {
            Some(key) => {
                self.sort_by(*key);
                true
            }
            None => false,
        }
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec<T::SortKey>>) {
        self.sort = sort;
        self.reset_page();
    }

    /// Filtered then sorted, across all pages. Empty unless the last load succeeded.
    pub fn filtered(&self) -> Vec<&T> {
        if !self.is_ready() {
            return Vec::new();
        }
        let mut rows: Vec<&T> = self.items.iter().filter(|item| self.matches(item)).collect();
        if let Some(spec) = self.sort {
            rows.sort_by(|a, b| {
                let ord = compare_values(&a.sort_value(spec.key), &b.sort_value(spec.key));
                match spec.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        rows
    }

    // ---- pagination ----

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered().len(), self.page_size)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.clamp_page();
        self.cursor = 0;
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = clamp_page_size(size);
        self.reset_page();
    }

    /// Step to the next larger (`grow`) or smaller allowed page size.
    pub fn step_page_size(&mut self, grow: bool) {
        let idx = PAGE_SIZES
            .iter()
            .position(|size| *size == self.page_size)
            .unwrap_or(1);
        let next = if grow {
            (idx + 1).min(PAGE_SIZES.len() - 1)
        } else {
            idx.saturating_sub(1)
        };
        self.set_page_size(PAGE_SIZES[next]);
    }

    /// Rows of the current page.
    pub fn visible(&self) -> Vec<&T> {
        self.filtered()
            .into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect()
    }

    // ---- row cursor ----

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&T> {
        self.visible().get(self.cursor).copied()
    }

    pub fn select_next(&mut self) {
        let total = self.visible().len();
        self.cursor = if total == 0 { 0 } else { (self.cursor + 1) % total };
    }

    pub fn select_prev(&mut self) {
        let total = self.visible().len();
        if total == 0 {
            self.cursor = 0;
        } else if self.cursor == 0 {
            self.cursor = total - 1;
        } else {
            self.cursor -= 1;
        }
    }

    // ---- two-phase delete ----

    /// Stage a row for deletion; no side effect until confirmed.
    pub fn stage_delete(&mut self, id: u32) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.staged_delete = Some(id);
        true
    }

    pub fn staged_delete(&self) -> Option<&T> {
        self.staged_delete.and_then(|id| self.find(id))
    }

    pub fn cancel_delete(&mut self) {
        self.staged_delete = None;
    }

    /// Take the staged id; the caller performs the irreversible call.
    pub fn confirm_delete(&mut self) -> Option<u32> {
        self.staged_delete.take()
    }

    fn reset_page(&mut self) {
        self.page = 0;
        self.cursor = 0;
    }

    fn clamp_page(&mut self) {
        let last = self.page_count().saturating_sub(1);
        self.page = self.page.min(last);
    }

    fn clamp_cursor(&mut self) {
        let total = self.visible().len();
        if total == 0 {
            self.cursor = 0;
        } else if self.cursor >= total {
            self.cursor = total - 1;
        }
    }
}

/// Type-erased view of a [`ListEngine`] for the shell, which drives whichever
/// list is on screen without knowing its row type.
pub trait ListControls {
    fn status(&self) -> &ListStatus;
    fn notice(&self) -> Option<&str>;
    fn filter_value(&self, key: FilterKey) -> &str;
    fn set_filter_value(&mut self, key: FilterKey, value: String);
    fn clear_filters(&mut self);
    fn column_count(&self) -> usize;
    fn column_label(&self, idx: usize) -> &'static str;
    fn sorted_column(&self) -> Option<(usize, SortDirection)>;
    fn sort_by_column(&mut self, idx: usize) -> bool;
    fn filtered_len(&self) -> usize;
    fn page(&self) -> usize;
    fn page_count(&self) -> usize;
    fn page_size(&self) -> usize;
    fn next_page(&mut self);
    fn prev_page(&mut self);
    fn step_page_size(&mut self, grow: bool);
    fn select_next(&mut self);
    fn select_prev(&mut self);
    fn cursor(&self) -> usize;
    fn selected_id(&self) -> Option<u32>;
    fn stage_delete(&mut self, id: u32) -> bool;
    fn staged_delete_name(&self) -> Option<String>;
    fn cancel_delete(&mut self);
    fn confirm_delete(&mut self) -> Option<u32>;
}

impl<T: Listable> ListControls for ListEngine<T> {
    fn status(&self) -> &ListStatus {
        ListEngine::status(self)
    }

    fn notice(&self) -> Option<&str> {
        ListEngine::notice(self)
    }

    fn filter_value(&self, key: FilterKey) -> &str {
        self.filter(key)
    }

    fn set_filter_value(&mut self, key: FilterKey, value: String) {
        self.set_filter(key, value);
    }

    fn clear_filters(&mut self) {
        ListEngine::clear_filters(self)
    }

    fn column_count(&self) -> usize {
        T::sort_columns().len()
    }

    fn column_label(&self, idx: usize) -> &'static str {
        T::sort_columns()
            .get(idx)
            .map(|key| T::sort_label(*key))
            .unwrap_or("")
    }

    fn sorted_column(&self) -> Option<(usize, SortDirection)> {
        let spec = self.sort?;
        let idx = T::sort_columns().iter().position(|key| *key == spec.key)?;
        Some((idx, spec.direction))
    }

    fn sort_by_column(&mut self, idx: usize) -> bool {
        ListEngine::sort_by_column(self, idx)
    }

    fn filtered_len(&self) -> usize {
        self.filtered().len()
    }

    fn page(&self) -> usize {
        ListEngine::page(self)
    }

    fn page_count(&self) -> usize {
        ListEngine::page_count(self)
    }

    fn page_size(&self) -> usize {
        ListEngine::page_size(self)
    }

    fn next_page(&mut self) {
        ListEngine::next_page(self)
    }

    fn prev_page(&mut self) {
        ListEngine::prev_page(self)
    }

    fn step_page_size(&mut self, grow: bool) {
        ListEngine::step_page_size(self, grow)
    }

    fn select_next(&mut self) {
        ListEngine::select_next(self)
    }

    fn select_prev(&mut self) {
        ListEngine::select_prev(self)
    }

    fn cursor(&self) -> usize {
        ListEngine::cursor(self)
    }

    fn selected_id(&self) -> Option<u32> {
        self.selected().map(Listable::id)
    }

    fn stage_delete(&mut self, id: u32) -> bool {
        ListEngine::stage_delete(self, id)
    }

    fn staged_delete_name(&self) -> Option<String> {
        self.staged_delete().map(|item| item.display_name().to_string())
    }

    fn cancel_delete(&mut self) {
        ListEngine::cancel_delete(self)
    }

    fn confirm_delete(&mut self) -> Option<u32> {
        ListEngine::confirm_delete(self)
    }
}

pub fn page_count(rows: usize, page_size: usize) -> usize {
    if rows == 0 || page_size == 0 {
        return 1;
    }
    rows.div_ceil(page_size)
}

/// Nearest allowed page size; ties go to the smaller one.
pub fn clamp_page_size(requested: usize) -> usize {
    PAGE_SIZES
        .iter()
        .copied()
        .min_by_key(|size| size.abs_diff(requested))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

fn filter_is_active(key: FilterKey, value: &str) -> bool {
    match key {
        FilterKey::Search => !value.is_empty(),
        _ => !value.is_empty() && value != ALL,
    }
}

fn predicate_matches<T: Listable>(item: &T, key: FilterKey, value: &str) -> bool {
    match key {
        FilterKey::Search => item
            .display_name()
            .to_lowercase()
            .contains(&value.to_lowercase()),
        _ => item.category(key) == Some(value),
    }
}

/// Numbers numerically, text case-folded first with lower case ahead of
/// upper case on ties. Numbers sort before text if a key ever mixes them.
pub fn compare_values(a: &SortValue, b: &SortValue) -> Ordering {
    match (a, b) {
        (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
        (SortValue::Text(a), SortValue::Text(b)) => compare_text(a, b),
        (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
        (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
    }
}

pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_clamps_to_nearest_allowed() {
        assert_eq!(clamp_page_size(0), 5);
        assert_eq!(clamp_page_size(7), 5);
        assert_eq!(clamp_page_size(8), 10);
        assert_eq!(clamp_page_size(30), 25);
        assert_eq!(clamp_page_size(1_000), 50);
    }

    #[test]
    fn text_ordering_folds_case() {
        assert_eq!(compare_text("alpha", "Beta"), Ordering::Less);
        assert_eq!(compare_text("a", "A"), Ordering::Less);
        assert_eq!(compare_text("", "a"), Ordering::Less);
        assert_eq!(compare_text("same", "same"), Ordering::Equal);
    }

    #[test]
    fn page_count_never_zero() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
    }
}
