//! Operator precedence for binary operators.

use dscript_ast::node::BinaryOperator;
use dscript_ast::syntax_kind::SyntaxKind;

/// Precedence levels, lowest to highest. Every binary level is
/// left-associative. The ternary operator sits below `Logical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    /// `||` `??` `&&`
    Logical = 0,
    /// Equality, comparison and the bitwise `&` `^` `|`.
    Relational = 1,
    /// `+` `-` `<<` `>>`
    Additive = 2,
    /// `*` `/` `%` `**`
    Multiplicative = 3,
    /// Prefix `+` `-` `~` `!`; no binary operator binds this tightly.
    Unary = 4,
}

impl OperatorPrecedence {
    /// The next tighter level, used as the minimum for a right operand.
    pub fn next(self) -> OperatorPrecedence {
        match self {
            OperatorPrecedence::Logical => OperatorPrecedence::Relational,
            OperatorPrecedence::Relational => OperatorPrecedence::Additive,
            OperatorPrecedence::Additive => OperatorPrecedence::Multiplicative,
            OperatorPrecedence::Multiplicative | OperatorPrecedence::Unary => OperatorPrecedence::Unary,
        }
    }
}

/// The binary operator a single token stands for, with its precedence.
///
/// `>>` never comes out of the scanner as one token; the parser recognizes
/// two adjacent `>` itself, see [`SHIFT_RIGHT`].
pub fn get_binary_operator(kind: SyntaxKind) -> Option<(BinaryOperator, OperatorPrecedence)> {
    use BinaryOperator as Op;
    use OperatorPrecedence as Prec;

    let entry = match kind {
        SyntaxKind::BarBarToken => (Op::LogicalOr, Prec::Logical),
        SyntaxKind::QuestionQuestionToken => (Op::Nullish, Prec::Logical),
        SyntaxKind::AmpersandAmpersandToken => (Op::LogicalAnd, Prec::Logical),
        SyntaxKind::EqualsEqualsToken => (Op::Eq, Prec::Relational),
        SyntaxKind::ExclamationEqualsToken => (Op::NotEq, Prec::Relational),
        SyntaxKind::EqualsEqualsEqualsToken => (Op::StrictEq, Prec::Relational),
        SyntaxKind::ExclamationEqualsEqualsToken => (Op::StrictNotEq, Prec::Relational),
        SyntaxKind::LessThanToken => (Op::Lt, Prec::Relational),
        SyntaxKind::LessThanEqualsToken => (Op::LtEq, Prec::Relational),
        SyntaxKind::GreaterThanToken => (Op::Gt, Prec::Relational),
        SyntaxKind::GreaterThanEqualsToken => (Op::GtEq, Prec::Relational),
        SyntaxKind::AmpersandToken => (Op::BitAnd, Prec::Relational),
        SyntaxKind::CaretToken => (Op::BitXor, Prec::Relational),
        SyntaxKind::BarToken => (Op::BitOr, Prec::Relational),
        SyntaxKind::PlusToken => (Op::Add, Prec::Additive),
        SyntaxKind::MinusToken => (Op::Sub, Prec::Additive),
        SyntaxKind::LessThanLessThanToken => (Op::Shl, Prec::Additive),
        SyntaxKind::AsteriskToken => (Op::Mul, Prec::Multiplicative),
        SyntaxKind::SlashToken => (Op::Div, Prec::Multiplicative),
        SyntaxKind::PercentToken => (Op::Mod, Prec::Multiplicative),
        SyntaxKind::AsteriskAsteriskToken => (Op::Exp, Prec::Multiplicative),
        _ => return None,
    };
    Some(entry)
}

/// `>>`, built from two adjacent `>` tokens.
pub const SHIFT_RIGHT: (BinaryOperator, OperatorPrecedence) =
    (BinaryOperator::Shr, OperatorPrecedence::Additive);

/// The operator a compound assignment token applies, e.g. `+` for `+=`.
pub fn get_compound_assignment_operator(kind: SyntaxKind) -> Option<BinaryOperator> {
    match kind {
        SyntaxKind::PlusEqualsToken => Some(BinaryOperator::Add),
        SyntaxKind::MinusEqualsToken => Some(BinaryOperator::Sub),
        SyntaxKind::AsteriskEqualsToken => Some(BinaryOperator::Mul),
        SyntaxKind::SlashEqualsToken => Some(BinaryOperator::Div),
        SyntaxKind::PercentEqualsToken => Some(BinaryOperator::Mod),
        SyntaxKind::BarEqualsToken => Some(BinaryOperator::BitOr),
        SyntaxKind::CaretEqualsToken => Some(BinaryOperator::BitXor),
        _ => None,
    }
}
