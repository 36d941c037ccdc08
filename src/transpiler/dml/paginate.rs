//! `rownum` pagination.
//!
//! `rownum` is assigned before an outer filter runs, so skipping rows needs a
//! ranked derived table (`t1`) filtered from outside (`t2`). A bare limit
//! only needs the upper bound.

/// 1-based inclusive range of row numbers kept by a limit/offset pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    /// First kept row number; `None` when no offset was given.
    pub start: Option<u64>,
    /// Last kept row number; `None` when no limit was given.
    pub end: Option<u64>,
}

impl RowRange {
    /// `None` when neither a limit nor an offset applies. Offset 0 is no
    /// offset.
    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Option<Self> {
        match (limit, offset.filter(|o| *o > 0)) {
            (None, None) => None,
            (Some(limit), None) => Some(Self {
                start: None,
                end: Some(limit),
            }),
            (None, Some(offset)) => Some(Self {
                start: Some(offset.saturating_add(1)),
                end: None,
            }),
            (Some(limit), Some(offset)) => Some(Self {
                start: Some(offset.saturating_add(1)),
                end: Some(offset.saturating_add(limit)),
            }),
        }
    }

    pub fn contains(&self, row_number: u64) -> bool {
        self.start.is_none_or(|s| row_number >= s) && self.end.is_none_or(|e| row_number <= e)
    }

    /// Keep the items of an already ordered result whose 1-based position is
    /// inside the range.
    pub fn apply<T: Clone>(&self, rows: &[T]) -> Vec<T> {
        rows.iter()
            .enumerate()
            .filter(|(i, _)| self.contains(*i as u64 + 1))
            .map(|(_, row)| row.clone())
            .collect()
    }

    /// Wrap a compiled select.
    pub fn wrap(&self, sql: &str) -> String {
        match (self.start, self.end) {
            (None, Some(end)) => format!("select * from ({}) where rownum <= {}", sql, end),
            (Some(start), Some(end)) => format!(
                "select t2.* from ( select rownum AS \"rn\", t1.* from ({}) t1 where rownum <= {}) t2 where t2.\"rn\" >= {}",
                sql, end, start
            ),
            (Some(start), None) => format!(
                "select t2.* from ( select rownum AS \"rn\", t1.* from ({}) t1 ) t2 where t2.\"rn\" >= {}",
                sql, start
            ),
            (None, None) => sql.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rows(n: u64) -> Vec<u64> {
        (0..n).collect()
    }

    #[test]
    fn test_range_matches_skip_take() {
        let all = rows(20);
        for (offset, limit) in [(0u64, 5u64), (5, 10), (18, 10), (25, 3), (3, 0), (0, 0)] {
            let range = RowRange::new(Some(limit), Some(offset)).unwrap();
            let expected: Vec<u64> = all
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .copied()
                .collect();
            assert_eq!(range.apply(&all), expected, "offset {} limit {}", offset, limit);
        }
    }

    #[test]
    fn test_offset_only_keeps_remaining_rows() {
        let all = rows(10);
        let range = RowRange::new(None, Some(7)).unwrap();
        assert_eq!(range.apply(&all), vec![7, 8, 9]);
        assert_eq!(RowRange::new(None, Some(0)), None);
    }

    #[test]
    fn test_limit_zero_is_empty() {
        let range = RowRange::new(Some(0), None).unwrap();
        assert!(range.apply(&rows(4)).is_empty());
    }

    #[test]
    fn test_no_range() {
        assert_eq!(RowRange::new(None, None), None);
    }

    #[test]
    fn test_zero_offset_uses_limit_wrapper() {
        let range = RowRange::new(Some(3), Some(0)).unwrap();
        assert_eq!(range.wrap("x"), "select * from (x) where rownum <= 3");
    }

    #[test]
    fn test_wrap_offset_and_limit() {
        let range = RowRange::new(Some(10), Some(5)).unwrap();
        assert_eq!(
            range.wrap("select * from \"USERS\""),
            "select t2.* from ( select rownum AS \"rn\", t1.* from (select * from \"USERS\") t1 where rownum <= 15) t2 where t2.\"rn\" >= 6"
        );
    }
}
