use anyhow::anyhow;

/// Resolve a column name to its zero based position in the header.
///
/// When a name appears more than once in the header the first occurrence
/// wins. An absent name fails with `"<name> is not found"`.
pub fn resolve_column(column_names: &[String], name: &str) -> Result<usize, anyhow::Error> {
    column_names
        .iter()
        .position(|column_name| column_name == name)
        .ok_or_else(|| anyhow!("{name} is not found"))
}

/// Resolve a list of column names to their positions, in caller order.
///
/// An empty list means "all columns" and resolves to the full index range in
/// header order. Resolution fails atomically: the first absent name aborts
/// with `"<name> is not found"` and no partial result is returned.
pub fn resolve_columns(
    column_names: &[String],
    names: &[String],
) -> Result<Vec<usize>, anyhow::Error> {
    if names.is_empty() {
        return Ok((0..column_names.len()).collect());
    }
    names
        .iter()
        .map(|name| resolve_column(column_names, name))
        .collect()
}
