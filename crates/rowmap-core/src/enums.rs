//! Enumerations stored as their symbolic name.

/// An enum whose variants are stored as text.
///
/// Derive it with `#[derive(SqlEnum)]`; the derive also provides the
/// `Value` conversions and a [`TypeInfo`](crate::TypeInfo) impl with
/// [`SqlType::Enum`](crate::SqlType::Enum).
pub trait SqlEnum: Sized + 'static {
    /// Stored names of all variants, in declaration order.
    const VARIANTS: &'static [&'static str];

    /// Name of the enum type, used in error messages.
    const TYPE_NAME: &'static str;

    /// The stored name of this variant.
    fn to_sql_str(&self) -> &'static str;

    /// Look up a variant by its stored name.
    fn from_sql_str(s: &str) -> Result<Self, String>;
}
