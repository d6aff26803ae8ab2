//! Pair table engine — filter, rank, and paginate a pair collection.
//!
//! Everything here is a pure function of its inputs. The engine never mutates
//! the collection and never fails: records that are not hydrated are skipped,
//! and non-finite sort keys (APY over an empty reserve) rank last in either
//! direction.

use super::{PairCollection, PairRecord, SortDirection, SortSpec, TokenRef};
use crate::shared::PairAddress;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Page size used when the caller does not configure one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Link prefix for pair detail pages.
pub const DEFAULT_LINK_PREFIX: &str = "/pair/";

// ─── PageState ───────────────────────────────────────────────────────────────

/// Pagination cursor. Always satisfies `1 <= current_page <= max_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    page_size: usize,
    current_page: usize,
    max_page: usize,
}

impl PageState {
    /// First page of an empty table. A zero page size is treated as one.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
            max_page: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn max_page(&self) -> usize {
        self.max_page
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.max_page
    }

    /// Step back one page; no-op on the first page.
    pub fn prev(&mut self) {
        if self.has_prev() {
            self.current_page -= 1;
        }
    }

    /// Step forward one page; no-op on the last page.
    pub fn next(&mut self) {
        if self.has_next() {
            self.current_page += 1;
        }
    }

    /// Index of the first row of the current page.
    pub fn offset(&self) -> usize {
        self.page_size * (self.current_page - 1)
    }

    pub(crate) fn reset(&mut self) {
        self.current_page = 1;
    }

    pub(crate) fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    /// Recompute `max_page` for `eligible` rows and clamp the cursor into range.
    pub(crate) fn recompute(&mut self, eligible: usize) {
        self.max_page = max_page_for(eligible, self.page_size);
        self.current_page = self.current_page.clamp(1, self.max_page);
    }

    /// Same cursor, recomputed for `eligible` rows.
    pub fn recomputed(mut self, eligible: usize) -> Self {
        self.recompute(eligible);
        self
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page {} of {}", self.current_page, self.max_page)
    }
}

/// `ceil(eligible / page_size)`, never less than one.
pub fn max_page_for(eligible: usize, page_size: usize) -> usize {
    eligible.div_ceil(page_size.max(1)).max(1)
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// One display row, everything a presentational layer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairRow {
    pub address: PairAddress,
    /// 1-based position across all pages.
    pub rank: usize,
    pub pair_id: String,
    pub token0: TokenRef,
    pub token1: TokenRef,
    /// `"SYM0-SYM1"`.
    pub label: String,
    /// Link target for the pair detail page.
    pub link: String,
    /// Value the row was ranked by.
    pub sort_value: f64,
}

/// A computed page: ordered rows plus the pagination state they were cut with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub rows: Vec<PairRow>,
    pub page: PageState,
    /// Number of hydrated records across all pages.
    pub eligible: usize,
}

impl PageView {
    pub fn addresses(&self) -> Vec<&PairAddress> {
        self.rows.iter().map(|r| &r.address).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ─── Ranking ─────────────────────────────────────────────────────────────────

/// Three-way comparison of two sort keys.
///
/// Finite keys compare by value in the requested direction. Non-finite keys
/// sort after every finite key regardless of direction and are equal to each
/// other.
pub fn compare_keys(a: f64, b: f64, direction: SortDirection) -> Ordering {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

/// Hydrated records in display order, with their sort keys.
///
/// Candidates start in address order so that ties resolve the same way on
/// every call; the sort itself is stable.
pub fn ranked<'a>(
    collection: &'a PairCollection,
    sort: SortSpec,
) -> Vec<(&'a PairAddress, &'a PairRecord, f64)> {
    let mut candidates: Vec<_> = collection
        .iter()
        .filter(|(_, record)| record.is_hydrated())
        .map(|(address, record)| (address, record, record.sort_key(sort.field)))
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(b.0));
    candidates.sort_by(|a, b| compare_keys(a.2, b.2, sort.direction));
    candidates
}

/// Compute one page of rows.
///
/// The returned `page` has `max_page` recomputed from the eligible count and
/// the cursor clamped into range; the rows are cut with that clamped cursor.
pub fn compute_page(collection: &PairCollection, sort: SortSpec, page: &PageState) -> PageView {
    compute_page_with_prefix(collection, sort, page, DEFAULT_LINK_PREFIX)
}

pub(crate) fn compute_page_with_prefix(
    collection: &PairCollection,
    sort: SortSpec,
    page: &PageState,
    link_prefix: &str,
) -> PageView {
    let ranked = ranked(collection, sort);
    let eligible = ranked.len();
    let page = page.recomputed(eligible);
    let offset = page.offset();

    let rows = ranked
        .into_iter()
        .enumerate()
        .skip(offset)
        .take(page.page_size())
        .filter_map(|(index, (address, record, sort_value))| {
            let (token0, token1) = record.tokens()?;
            Some(PairRow {
                address: address.clone(),
                rank: index + 1,
                pair_id: record.id.clone(),
                token0: token0.clone(),
                token1: token1.clone(),
                label: format!("{}-{}", token0.symbol, token1.symbol),
                link: format!("{}{}", link_prefix, record.id),
                sort_value,
            })
        })
        .collect();

    PageView {
        rows,
        page,
        eligible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pair::test_support::*;
    use crate::domain::pair::SortField;
    use std::collections::HashSet;

    fn liquidity_desc() -> SortSpec {
        SortSpec::new(SortField::Liquidity, SortDirection::Descending)
    }

    fn numbered(n: usize) -> PairCollection {
        collection((0..n).map(|i| pair(&format!("p{i:02}"), i as f64 * 10.0)).collect())
    }

    #[test]
    fn test_max_page_for() {
        assert_eq!(max_page_for(0, 10), 1);
        assert_eq!(max_page_for(1, 10), 1);
        assert_eq!(max_page_for(10, 10), 1);
        assert_eq!(max_page_for(11, 10), 2);
        assert_eq!(max_page_for(25, 10), 3);
        assert_eq!(max_page_for(5, 0), 5);
    }

    #[test]
    fn test_first_page_of_25() {
        let c = numbered(25);
        let view = compute_page(&c, liquidity_desc(), &PageState::new(10));
        assert_eq!(view.page.max_page(), 3);
        assert_eq!(view.page.current_page(), 1);
        assert_eq!(view.rows.len(), 10);
        let values: Vec<f64> = view.rows.iter().map(|r| r.sort_value).collect();
        let expected: Vec<f64> = (15..25).rev().map(|i| i as f64 * 10.0).collect();
        assert_eq!(values, expected);
        assert_eq!(view.rows[0].rank, 1);
        assert_eq!(view.rows[9].rank, 10);
    }

    #[test]
    fn test_pages_partition_eligible_keys() {
        let mut records: Vec<_> = (0..23).map(|i| pair(&format!("p{i}"), (i % 7) as f64)).collect();
        records.push(unhydrated("ghost1", 1000.0));
        records.push(unhydrated("ghost2", 0.0));
        let c = collection(records);

        for page_size in [1, 3, 7, 10, 23, 50] {
            let mut page = PageState::new(page_size).recomputed(c.eligible_count());
            let mut seen = HashSet::new();
            let mut total = 0;
            loop {
                let view = compute_page(&c, liquidity_desc(), &page);
                total += view.rows.len();
                for row in &view.rows {
                    assert!(seen.insert(row.address.clone()), "duplicate row {}", row.address);
                }
                if !page.has_next() {
                    break;
                }
                page.next();
            }
            assert_eq!(total, 23, "page size {page_size}");
            assert_eq!(seen.len(), 23);
            assert!(!seen.contains(&PairAddress::from("ghost1")));
        }
    }

    #[test]
    fn test_unhydrated_not_counted() {
        let mut records: Vec<_> = (0..10).map(|i| pair(&format!("p{i}"), 1.0)).collect();
        records.push(unhydrated("ghost", 5.0));
        let view = compute_page(&collection(records), liquidity_desc(), &PageState::new(10));
        assert_eq!(view.eligible, 10);
        assert_eq!(view.page.max_page(), 1);
        assert!(view.rows.iter().all(|r| r.address.as_str() != "ghost"));
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let view = compute_page(&collection(vec![]), liquidity_desc(), &PageState::new(10));
        assert!(view.is_empty());
        assert_eq!(view.page.max_page(), 1);
        assert_eq!(view.page.current_page(), 1);
    }

    #[test]
    fn test_monotonic_for_every_field_and_direction() {
        let records: Vec<_> = (0..30)
            .map(|i| {
                let mut p = pair(&format!("p{i:02}"), ((i * 37) % 11) as f64);
                p.reserve_usd = ((i * 13) % 5) as f64;
                p.one_day_volume_usd = ((i * 7) % 9) as f64;
                p.one_week_volume_usd = ((i * 3) % 4) as f64;
                p
            })
            .collect();
        let c = collection(records);

        for field in SortField::ALL {
            for direction in [SortDirection::Ascending, SortDirection::Descending] {
                let keys: Vec<f64> = ranked(&c, SortSpec::new(field, direction))
                    .into_iter()
                    .map(|(_, _, k)| k)
                    .collect();
                for w in keys.windows(2) {
                    assert_ne!(
                        compare_keys(w[0], w[1], direction),
                        Ordering::Greater,
                        "{field} {direction:?}: {} before {}",
                        w[0],
                        w[1]
                    );
                }
            }
        }
    }

    #[test]
    fn test_ties_keep_address_order() {
        let c = collection(vec![pair("c", 5.0), pair("a", 5.0), pair("b", 5.0), pair("z", 9.0)]);
        for _ in 0..5 {
            let order: Vec<_> = ranked(&c, liquidity_desc())
                .into_iter()
                .map(|(a, _, _)| a.as_str().to_string())
                .collect();
            assert_eq!(order, ["z", "a", "b", "c"]);
        }
    }

    #[test]
    fn test_apy_zero_reserve_sorts_last_both_directions() {
        let mut dead = pair("dead", 0.0);
        dead.one_day_volume_usd = 100.0;
        let mut empty = pair("empty", 0.0);
        empty.one_day_volume_usd = 0.0;
        let mut low = pair("low", 1000.0);
        low.one_day_volume_usd = 1.0;
        let mut high = pair("high", 1000.0);
        high.one_day_volume_usd = 500.0;
        let c = collection(vec![dead, empty, low, high]);

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let order: Vec<_> = ranked(&c, SortSpec::new(SortField::Apy, direction))
                .into_iter()
                .map(|(a, _, _)| a.as_str().to_string())
                .collect();
            assert_eq!(&order[2..], ["dead", "empty"], "{direction:?}");
        }
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let c = numbered(5);
        let mut page = PageState::new(2).recomputed(50);
        for _ in 0..10 {
            page.next();
        }
        assert_eq!(page.current_page(), 11);
        let view = compute_page(&c, liquidity_desc(), &page);
        assert_eq!(view.page.max_page(), 3);
        assert_eq!(view.page.current_page(), 3);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].rank, 5);
    }

    #[test]
    fn test_row_link_and_label() {
        let view = compute_page(&numbered(1), liquidity_desc(), &PageState::new(10));
        let row = &view.rows[0];
        assert_eq!(row.link, "/pair/p00");
        assert_eq!(row.label, "AAA-BBB");
        assert_eq!(row.token0.id, "p00_t0");
    }

    #[test]
    fn test_prev_next_bounds() {
        let mut page = PageState::new(10).recomputed(25);
        page.prev();
        assert_eq!(page.current_page(), 1);
        page.next();
        page.next();
        assert_eq!(page.current_page(), 3);
        page.next();
        assert_eq!(page.current_page(), 3);
        assert_eq!(page.to_string(), "Page 3 of 3");
        assert!(!page.has_next());
        assert!(page.has_prev());
    }
}
