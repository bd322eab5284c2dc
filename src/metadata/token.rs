use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};

/// Entity table identifiers carried in the high byte of a [`Token`].
#[allow(non_snake_case, missing_docs)]
pub mod TABLE {
    pub const TYPEDEF: u8 = 0x02;
    pub const FIELD: u8 = 0x04;
    pub const METHODDEF: u8 = 0x06;
    pub const PARAM: u8 = 0x08;
    pub const EVENT: u8 = 0x14;
    pub const PROPERTY: u8 = 0x17;
    pub const TYPESPEC: u8 = 0x1B;
    pub const GENERICPARAM: u8 = 0x2A;
    pub const ASSEMBLY: u8 = 0x20;
}

/// Process-wide row counter, shared by every table and every registry
static NEXT_ROW: AtomicU32 = AtomicU32::new(1);

/// A token identifying one reflected entity.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the entity table
/// - The low 24 bits (bits 0-23) indicate the row within that table
///
/// Rows are handed out from a single process-wide counter, so two entities never share a token,
/// even when they live in different registries. This is what allows the process-wide attribute
/// cache to key on tokens alone. The value `0` is the null token and denotes an absent entity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Allocates a fresh, process-unique token in the given table
    ///
    /// ## Arguments
    /// * 'table' - The entity table, see [`TABLE`]
    #[must_use]
    pub fn allocate(table: u8) -> Self {
        let row = NEXT_ROW.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;
        debug_assert!(row != 0, "We ran out of rows and are going to reuse tokens");

        Token((u32::from(table) << 24) | row)
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
