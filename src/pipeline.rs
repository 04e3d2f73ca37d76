use std::cmp::Ordering;

use crate::domain::PAGE_SIZE;
use crate::records::{Application, SortDirection, SortKey};

/// Inputs of the derivation chain. Owned by the model, read-only here.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub search: String,
    pub sort_key: Option<SortKey>,
    pub sort_direction: SortDirection,
    /// 1-based. Never clamped; an out-of-range page yields an empty slice.
    pub page: usize,
    pub page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_key: None,
            sort_direction: SortDirection::Ascending,
            page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

/// Derived output: row indices into the record collection.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    /// Indices of the rows on the current page, in display order.
    pub rows: Vec<usize>,
    /// Rows surviving the filter, before pagination.
    pub filtered_count: usize,
    pub total_pages: usize,
}

/// Full filter -> sort -> paginate derivation. Pure; recomputed wholesale
/// after every state transition.
pub fn run(records: &[Application], state: &QueryState) -> QueryOutput {
    let mut rows = filter(records, &state.search);
    let filtered_count = rows.len();
    if let Some(key) = state.sort_key {
        sort(records, &mut rows, key, state.sort_direction);
    }
    let (rows, total_pages) = paginate(&rows, state.page, state.page_size);
    QueryOutput {
        rows,
        filtered_count,
        total_pages,
    }
}

/// Keep a record iff applicant name, English status or student ID contains
/// the query case-insensitively. A missing field never matches, so a record
/// with none of the three searchable fields is dropped even under the empty
/// query. Source order is preserved.
pub fn filter(records: &[Application], query: &str) -> Vec<usize> {
    let query = query.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, app)| {
            field_contains(app.applicant_name.as_deref(), &query)
                || field_contains(app.status_english.as_deref(), &query)
                || field_contains(app.student_id.as_deref(), &query)
        })
        .map(|(idx, _)| idx)
        .collect()
}

fn field_contains(field: Option<&str>, lowercase_query: &str) -> bool {
    field
        .map(|f| f.to_lowercase().contains(lowercase_query))
        .unwrap_or(false)
}

/// Stable in-place reorder of the row mapping. Descending reverses the
/// comparator, so ties keep their filtered order under both directions.
pub fn sort(records: &[Application], rows: &mut [usize], key: SortKey, direction: SortDirection) {
    rows.sort_by(|&a, &b| {
        let ord = compare_values(key, &records[a], &records[b]);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Application numbers compare numerically when both sides parse as numbers
/// and lexicographically otherwise; names and dates compare lexicographically.
/// A missing field compares as the empty string.
fn compare_values(key: SortKey, a: &Application, b: &Application) -> Ordering {
    let va = a.sort_value(key);
    let vb = b.sort_value(key);
    match key {
        SortKey::ApplicationNumber => {
            match (va.parse::<f64>(), vb.parse::<f64>()) {
                (Ok(na), Ok(nb)) => na.partial_cmp(&nb).unwrap_or(Ordering::Equal),
                _ => va.cmp(&vb),
            }
        }
        SortKey::ApplicantName | SortKey::ApplicationDate => va.cmp(&vb),
    }
}

/// Slice out page `page` (1-based) and report the page count. A page past the
/// end yields an empty slice rather than an error; nothing clamps the page.
pub fn paginate(rows: &[usize], page: usize, page_size: usize) -> (Vec<usize>, usize) {
    let total_pages = rows.len().div_ceil(page_size);
    let begin = (page.max(1) - 1) * page_size;
    let end = (begin + page_size).min(rows.len());
    if begin >= rows.len() {
        (Vec::new(), total_pages)
    } else {
        (rows[begin..end].to_vec(), total_pages)
    }
}
