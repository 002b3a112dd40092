//! Binary operators and the per-language tables that map them to text.

use serde::{Deserialize, Serialize};

/// Language-neutral binary operator.
///
/// `Not` is kept here because source operator tables list logical negation
/// alongside the binary operators. `Unknown` is what a reader produces for a
/// token its table does not list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanEqualTo,
    LessThan,
    LessThanEqualTo,
    And,
    Or,
    Bor,
    Minus,
    Plus,
    Not,
    Unknown,
}

impl BinaryOperator {
    /// Every operator except `Unknown`.
    pub const ALL: [BinaryOperator; 12] = [
        BinaryOperator::Equal,
        BinaryOperator::NotEqual,
        BinaryOperator::GreaterThan,
        BinaryOperator::GreaterThanEqualTo,
        BinaryOperator::LessThan,
        BinaryOperator::LessThanEqualTo,
        BinaryOperator::And,
        BinaryOperator::Or,
        BinaryOperator::Bor,
        BinaryOperator::Minus,
        BinaryOperator::Plus,
        BinaryOperator::Not,
    ];
}

/// Source token to operator mapping used by a reader.
#[derive(Debug, Clone, Copy)]
pub struct OperatorTable {
    entries: &'static [(&'static str, BinaryOperator)],
    ignore_case: bool,
}

const CSHARP_TOKENS: &[(&str, BinaryOperator)] = &[
    ("==", BinaryOperator::Equal),
    ("!=", BinaryOperator::NotEqual),
    (">", BinaryOperator::GreaterThan),
    (">=", BinaryOperator::GreaterThanEqualTo),
    ("<", BinaryOperator::LessThan),
    ("<=", BinaryOperator::LessThanEqualTo),
    ("&&", BinaryOperator::And),
    ("||", BinaryOperator::Or),
    ("|", BinaryOperator::Bor),
    ("-", BinaryOperator::Minus),
    ("+", BinaryOperator::Plus),
    ("!", BinaryOperator::Not),
];

// PowerShell comparison operators also come in explicit case-insensitive
// (`-i`) and case-sensitive (`-c`) forms.
const POWERSHELL_TOKENS: &[(&str, BinaryOperator)] = &[
    ("-eq", BinaryOperator::Equal),
    ("-ieq", BinaryOperator::Equal),
    ("-ceq", BinaryOperator::Equal),
    ("-ne", BinaryOperator::NotEqual),
    ("-ine", BinaryOperator::NotEqual),
    ("-cne", BinaryOperator::NotEqual),
    ("-gt", BinaryOperator::GreaterThan),
    ("-igt", BinaryOperator::GreaterThan),
    ("-cgt", BinaryOperator::GreaterThan),
    ("-ge", BinaryOperator::GreaterThanEqualTo),
    ("-ige", BinaryOperator::GreaterThanEqualTo),
    ("-cge", BinaryOperator::GreaterThanEqualTo),
    ("-lt", BinaryOperator::LessThan),
    ("-ilt", BinaryOperator::LessThan),
    ("-clt", BinaryOperator::LessThan),
    ("-le", BinaryOperator::LessThanEqualTo),
    ("-ile", BinaryOperator::LessThanEqualTo),
    ("-cle", BinaryOperator::LessThanEqualTo),
    ("-and", BinaryOperator::And),
    ("-or", BinaryOperator::Or),
    ("-bor", BinaryOperator::Bor),
    ("-", BinaryOperator::Minus),
    ("+", BinaryOperator::Plus),
    ("-not", BinaryOperator::Not),
    ("!", BinaryOperator::Not),
];

impl OperatorTable {
    pub const fn new(entries: &'static [(&'static str, BinaryOperator)], ignore_case: bool) -> Self {
        Self {
            entries,
            ignore_case,
        }
    }

    pub const fn csharp() -> Self {
        Self::new(CSHARP_TOKENS, false)
    }

    /// PowerShell operators are case-insensitive (`-EQ` is `-eq`).
    pub const fn powershell() -> Self {
        Self::new(POWERSHELL_TOKENS, true)
    }

    /// Map a source token to an operator; unlisted tokens become `Unknown`.
    pub fn lookup(&self, token: &str) -> BinaryOperator {
        let token = token.trim();
        self.entries
            .iter()
            .find(|(text, _)| {
                if self.ignore_case {
                    text.eq_ignore_ascii_case(token)
                } else {
                    *text == token
                }
            })
            .map(|(_, op)| *op)
            .unwrap_or(BinaryOperator::Unknown)
    }
}

/// Operator to target text mapping used by a writer.
#[derive(Debug, Clone, Copy)]
pub struct OperatorSpelling {
    entries: &'static [(BinaryOperator, &'static str)],
}

const CSHARP_SPELLING: &[(BinaryOperator, &str)] = &[
    (BinaryOperator::Equal, "=="),
    (BinaryOperator::NotEqual, "!="),
    (BinaryOperator::GreaterThan, ">"),
    (BinaryOperator::GreaterThanEqualTo, ">="),
    (BinaryOperator::LessThan, "<"),
    (BinaryOperator::LessThanEqualTo, "<="),
    (BinaryOperator::And, "&&"),
    (BinaryOperator::Or, "||"),
    (BinaryOperator::Bor, "|"),
    (BinaryOperator::Minus, "-"),
    (BinaryOperator::Plus, "+"),
    (BinaryOperator::Not, "!"),
];

const POWERSHELL_SPELLING: &[(BinaryOperator, &str)] = &[
    (BinaryOperator::Equal, "-eq"),
    (BinaryOperator::NotEqual, "-ne"),
    (BinaryOperator::GreaterThan, "-gt"),
    (BinaryOperator::GreaterThanEqualTo, "-ge"),
    (BinaryOperator::LessThan, "-lt"),
    (BinaryOperator::LessThanEqualTo, "-le"),
    (BinaryOperator::And, "-and"),
    (BinaryOperator::Or, "-or"),
    (BinaryOperator::Bor, "-bor"),
    (BinaryOperator::Minus, "-"),
    (BinaryOperator::Plus, "+"),
    (BinaryOperator::Not, "-not"),
];

impl OperatorSpelling {
    pub const fn new(entries: &'static [(BinaryOperator, &'static str)]) -> Self {
        Self { entries }
    }

    pub const fn csharp() -> Self {
        Self::new(CSHARP_SPELLING)
    }

    pub const fn powershell() -> Self {
        Self::new(POWERSHELL_SPELLING)
    }

    pub fn spell(&self, operator: BinaryOperator) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(op, _)| *op == operator)
            .map(|(_, text)| *text)
    }
}
