use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// RawTable – the decoded file before numeric conversion
// ---------------------------------------------------------------------------

/// Header names plus string records, exactly as read from the file.
///
/// Only the columns that are actually plotted get converted to numbers, so a
/// text column such as a timestamp never stops a load.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// Required names that are not among the headers, in the order given.
    pub fn missing_columns(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|c| self.position(c).is_none())
            .cloned()
            .collect()
    }

    /// Convert the named columns of rows `0..=max_row` into a numeric
    /// [`Table`]. Empty cells become `NaN`; anything else unparsable is an
    /// error naming the column and row.
    pub fn to_numeric(&self, columns: &[String], max_row: usize) -> Result<Table> {
        let row_limit = self.records.len().min(max_row.saturating_add(1));
        let mut out = Vec::with_capacity(columns.len());

        for name in columns {
            let idx = self
                .position(name)
                .ok_or_else(|| Error::MissingColumns(vec![name.clone()]))?;

            let values = self.records[..row_limit]
                .iter()
                .enumerate()
                .map(|(row, record)| {
                    let cell = record.get(idx).map(|s| s.trim()).unwrap_or("");
                    parse_cell(cell).ok_or_else(|| Error::Parse {
                        column: name.clone(),
                        row,
                        value: cell.to_string(),
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            out.push(Column::new(name.clone(), values));
        }

        Table::new(out)
    }
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// Column / Table – ordered numeric columns of equal length
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Minimum and maximum over the non-NaN samples.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Row-ordered table of numeric columns. Row order is time order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table, checking all columns have the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, |c| c.values.len());
        if let Some(bad) = columns.iter().find(|c| c.values.len() != n_rows) {
            return Err(Error::RaggedColumn {
                column: bad.name.clone(),
                expected: n_rows,
                actual: bad.values.len(),
            });
        }
        Ok(Self { columns, n_rows })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// A table with zero rows is empty regardless of its columns.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Rows `start..=end` as a new table indexed from 0. The caller checks
    /// bounds; see [`crate::data::slice::RowWindow`].
    pub(crate) fn rows(&self, start: usize, end: usize) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.values[start..=end].to_vec()))
            .collect();
        Self {
            columns,
            n_rows: end - start + 1,
        }
    }

    /// Same columns, zero rows.
    pub(crate) fn emptied(&self) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), Vec::new()))
            .collect();
        Self {
            columns,
            n_rows: 0,
        }
    }

    /// Replace the column names, e.g. Chinese headers → English names.
    pub fn renamed(&self, names: &[String]) -> Result<Self> {
        if names.len() != self.columns.len() {
            return Err(Error::LabelMismatch {
                expected: self.columns.len(),
                actual: names.len(),
            });
        }
        let columns = self
            .columns
            .iter()
            .zip(names)
            .map(|(c, n)| Column::new(n.clone(), c.values.clone()))
            .collect();
        Ok(Self {
            columns,
            n_rows: self.n_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawTable {
        RawTable {
            headers: vec!["time".into(), "A".into(), "B".into()],
            records: vec![
                vec!["2021-01-01 00:00".into(), "1.5".into(), "".into()],
                vec!["2021-01-01 00:01".into(), "2".into(), "-3e2".into()],
                vec!["2021-01-01 00:02".into(), "4".into(), "7".into()],
            ],
        }
    }

    #[test]
    fn test_to_numeric_ignores_text_columns() {
        let table = raw()
            .to_numeric(&["B".to_string(), "A".to_string()], usize::MAX)
            .unwrap();
        assert_eq!(table.column_names(), vec!["B", "A"]);
        assert_eq!(table.len(), 3);
        assert!(table.columns()[0].values[0].is_nan());
        assert_eq!(table.columns()[0].values[1], -300.0);
        assert_eq!(table.columns()[1].values, vec![1.5, 2.0, 4.0]);
    }

    #[test]
    fn test_to_numeric_respects_row_bound() {
        let table = raw().to_numeric(&["A".to_string()], 1).unwrap();
        assert_eq!(table.len(), 2);
        let table = raw().to_numeric(&["A".to_string()], 0).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_to_numeric_reports_bad_cell() {
        let err = raw().to_numeric(&["time".to_string()], usize::MAX).unwrap_err();
        match err {
            Error::Parse { column, row, .. } => {
                assert_eq!(column, "time");
                assert_eq!(row, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_columns_in_required_order() {
        let missing = raw().missing_columns(&["Z".into(), "A".into(), "Y".into()]);
        assert_eq!(missing, vec!["Z".to_string(), "Y".to_string()]);
    }

    #[test]
    fn test_table_rejects_ragged_columns() {
        let result = Table::new(vec![
            Column::new("A", vec![1.0, 2.0]),
            Column::new("B", vec![1.0]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_finite_range_skips_nan() {
        let col = Column::new("A", vec![f64::NAN, 3.0, -1.0, f64::NAN]);
        assert_eq!(col.finite_range(), Some((-1.0, 3.0)));
        let all_nan = Column::new("B", vec![f64::NAN]);
        assert_eq!(all_nan.finite_range(), None);
    }

    #[test]
    fn test_renamed_checks_count() {
        let table = Table::new(vec![Column::new("A", vec![1.0])]).unwrap();
        let renamed = table.renamed(&["Alpha".to_string()]).unwrap();
        assert_eq!(renamed.column_names(), vec!["Alpha"]);
        assert!(matches!(
            table.renamed(&[]),
            Err(Error::LabelMismatch { expected: 1, actual: 0 })
        ));
    }
}
