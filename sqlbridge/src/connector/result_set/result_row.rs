use crate::value::Cell;
use std::{ops, sync::Arc};

/// One row fetched from a cursor. The columns can be accessed either
/// through their position or using the column name.
///
/// ```
/// # use sqlbridge::connector::ResultRow;
/// # use sqlbridge::Cell;
/// let row = ResultRow::new(vec!["id".into(), "name".into()], vec![Cell::from(1001), Cell::from("Jane")]);
///
/// assert_eq!(row[0], row["id"]);
/// assert_eq!(Some("Jane"), row["name"].as_str());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub(crate) columns: Arc<Vec<String>>,
    pub(crate) values: Vec<Cell>,
}

impl ResultRow {
    pub fn new(columns: Vec<String>, values: Vec<Cell>) -> Self {
        Self {
            columns: Arc::new(columns),
            values,
        }
    }

    /// Take a value from a certain position in the row, if having a value in
    /// that position.
    pub fn at(&self, i: usize) -> Option<&Cell> {
        self.values.get(i)
    }

    /// Take a value with the given column name from the row. Oracle reports
    /// column names in upper case, so the lookup ignores case.
    pub fn get(&self, name: &str) -> Option<&Cell> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .and_then(|idx| self.values.get(idx))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Cell] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl IntoIterator for ResultRow {
    type Item = Cell;
    type IntoIter = std::vec::IntoIter<Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl ops::Index<usize> for ResultRow {
    type Output = Cell;

    fn index(&self, index: usize) -> &Cell {
        &self.values[index]
    }
}

impl ops::Index<&str> for ResultRow {
    type Output = Cell;

    fn index(&self, name: &str) -> &Cell {
        match self.get(name) {
            Some(cell) => cell,
            None => panic!("Column `{name}` not found in the row"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_ignores_case() {
        let row = ResultRow::new(vec!["EMPLOYEE_ID".into()], vec![Cell::from(1001)]);

        assert_eq!(Some(&Cell::Integer(1001)), row.get("employee_id"));
        assert_eq!(None, row.get("email"));
        assert_eq!(None, row.at(1));
    }
}
