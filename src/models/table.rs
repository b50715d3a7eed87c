/// An in-memory table: the declared column names plus the typed rows.
///
/// The declared columns travel with the rows so that every stage can reason
/// about the schema it was handed (and emit it again in the same order)
/// without re-reading the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    columns: Vec<String>,
    rows: Vec<R>
}

impl<R> Table<R> {
    pub fn new(columns: Vec<String>, rows: Vec<R>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|name| name == column)
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
