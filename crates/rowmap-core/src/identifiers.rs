//! SQL identifier quoting.
//!
//! Every table and column name the builders emit goes through
//! [`quote_ident`], so field and struct names that collide with SQL keywords
//! (`order`, `group`, `from`, ...) are still valid identifiers.

/// Quote a SQL identifier using ANSI double-quoting.
///
/// Embedded double-quotes are escaped by doubling them.
///
/// ```
/// use rowmap_core::quote_ident;
///
/// assert_eq!(quote_ident("users"), "\"users\"");
/// assert_eq!(quote_ident("order"), "\"order\"");
/// assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
/// ```
#[inline]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
