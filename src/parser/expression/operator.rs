use compact_str::CompactString;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    Multiply,
    Divide,
    Add,
    Subtract,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    EqualEqual,
    BangEqual,
    /// An operator run outside the supported set. Rejected when evaluated.
    Unsupported(CompactString),
}

impl BinaryOperator {
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "*" => Self::Multiply,
            "/" => Self::Divide,
            "+" => Self::Add,
            "-" => Self::Subtract,
            "<" => Self::LessThan,
            "<=" => Self::LessThanEqual,
            ">" => Self::GreaterThan,
            ">=" => Self::GreaterThanEqual,
            "==" => Self::EqualEqual,
            "!=" => Self::BangEqual,
            other => Self::Unsupported(other.into()),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::LessThan => "<",
            Self::LessThanEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanEqual => ">=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::Unsupported(symbol) => symbol,
        }
    }

    /// Higher binds tighter. Every level is left-associative.
    pub fn get_binding_power(&self) -> u8 {
        match self {
            // 1. Multiplicative operators
            Self::Multiply | Self::Divide => 3,
            // 2. Additive operators
            Self::Add | Self::Subtract => 2,
            // 3. Comparison and equality operators
            Self::LessThan
            | Self::LessThanEqual
            | Self::GreaterThan
            | Self::GreaterThanEqual
            | Self::EqualEqual
            | Self::BangEqual
            | Self::Unsupported(_) => 1,
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
