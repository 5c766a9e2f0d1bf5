/// Backing variant for tables and sorted row sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backing {
    /// Keep all rows in process memory.
    Memory,
    /// Spill rows to an embedded key-value store in a temporary file. Use
    /// for inputs that do not fit comfortably in memory.
    File,
}
