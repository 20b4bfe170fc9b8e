//! Condition parsing.
//!
//! A condition string is split on whitespace into `column`, `operator` and
//! `terms`. The operator decides the condition kind once: `contains` and
//! `not_contains` carry a term alternation, anything else is parsed as a
//! boolean predicate over the whole string.
//!
//! Predicate grammar (lowest precedence first):
//!
//! ```text
//! or         := and ( ("|" | "or") and )*
//! and        := unary ( ("&" | "and") unary )*
//! unary      := ("~" | "not") unary | "(" or ")" | comparison
//! comparison := operand ( cmp operand )+
//! operand    := number | "string" | 'string' | `name` | word
//! cmp        := "==" | "!=" | "<" | "<=" | ">" | ">="
//! ```
//!
//! Chained comparisons (`0 < A <= 1`) are the conjunction of each pair.

use std::iter::Peekable;
use std::str::CharIndices;

use dff_model::{
    CompareOp, Condition, Operand, Predicate, PredicateError, Relation, SpecificationError,
    TermSet, is_word_delimiter,
};

use crate::error::Result;

/// Term operators, looked up by keyword.
const TERM_OPERATORS: [(&str, Relation); 2] = [
    ("contains", Relation::Contains),
    ("not_contains", Relation::NotContains),
];

/// The three whitespace-separated parts of a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCondition {
    pub column: String,
    pub operator: String,
    pub terms: String,
}

/// Splits a condition into column, operator and the remaining terms.
///
/// The column may be back-quoted to include spaces. Everything after the
/// operator, inner whitespace included, belongs to the terms.
pub fn split_condition(text: &str) -> std::result::Result<RawCondition, SpecificationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SpecificationError::malformed(text, "empty condition"));
    }

    let (column, rest) = match trimmed.strip_prefix('`') {
        Some(quoted) => {
            let end = quoted.find('`').ok_or_else(|| {
                SpecificationError::malformed(text, "unterminated ` quote in column name")
            })?;
            let rest = &quoted[end + 1..];
            if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                return Err(SpecificationError::malformed(
                    text,
                    "expected whitespace after quoted column name",
                ));
            }
            (&quoted[..end], rest)
        }
        None => split_word(trimmed),
    };
    if column.is_empty() {
        return Err(SpecificationError::malformed(text, "empty column name"));
    }

    let (operator, terms) = split_word(rest.trim_start());
    if operator.is_empty() {
        return Err(SpecificationError::malformed(text, "missing operator"));
    }
    let terms = terms.trim_start();
    if terms.is_empty() {
        return Err(SpecificationError::malformed(text, "missing terms"));
    }

    Ok(RawCondition {
        column: column.to_string(),
        operator: operator.to_string(),
        terms: terms.to_string(),
    })
}

fn split_word(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(idx) => text.split_at(idx),
        None => (text, ""),
    }
}

/// Parses one condition string.
pub fn parse_condition(text: &str) -> Result<Condition> {
    let raw = split_condition(text)?;

    let relation = TERM_OPERATORS
        .iter()
        .find(|(keyword, _)| *keyword == raw.operator)
        .map(|(_, relation)| *relation);
    if let Some(relation) = relation {
        return Ok(Condition::with_relation(
            relation,
            raw.column,
            TermSet::new(raw.terms),
        ));
    }

    let predicate = parse_predicate(text.trim())?;
    // A leading `(` or `~` is not part of the column name.
    let column = predicate
        .columns()
        .first()
        .map_or(raw.column, |name| (*name).to_string());
    Ok(Condition::Predicate { column, predicate })
}

/// Parses a boolean predicate expression.
pub fn parse_predicate(text: &str) -> std::result::Result<Predicate, PredicateError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        source: text,
        tokens,
        pos: 0,
    };
    let predicate = parser.parse_or()?;
    match parser.peek() {
        None => Ok(predicate),
        Some(_) => Err(parser.error("unexpected trailing input")),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    Or,
    And,
    Not,
    Cmp(CompareOp),
    Word(String),
    Str(String),
    Name(String),
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

fn tokenize(source: &str) -> std::result::Result<Vec<(usize, Token)>, PredicateError> {
    let mut lexer = Lexer {
        source,
        chars: source.char_indices().peekable(),
    };
    let mut tokens = Vec::new();
    while let Some(spanned) = lexer.next_token()? {
        tokens.push(spanned);
    }
    Ok(tokens)
}

impl Lexer<'_> {
    fn next_token(&mut self) -> std::result::Result<Option<(usize, Token)>, PredicateError> {
        while self.chars.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}
        let Some((start, ch)) = self.chars.next() else {
            return Ok(None);
        };

        let token = match ch {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '~' => Token::Not,
            '|' => {
                self.chars.next_if(|(_, c)| *c == '|');
                Token::Or
            }
            '&' => {
                self.chars.next_if(|(_, c)| *c == '&');
                Token::And
            }
            '<' | '>' | '=' | '!' => self.comparison(start, ch)?,
            '"' | '\'' => Token::Str(self.quoted(ch, true)?),
            '`' => Token::Name(self.quoted(ch, false)?),
            _ => {
                let mut end = start + ch.len_utf8();
                while let Some((idx, c)) = self.chars.next_if(|(_, c)| !is_word_delimiter(*c)) {
                    end = idx + c.len_utf8();
                }
                match &self.source[start..end] {
                    "or" => Token::Or,
                    "and" => Token::And,
                    "not" => Token::Not,
                    word => Token::Word(word.to_string()),
                }
            }
        };
        Ok(Some((start, token)))
    }

    fn comparison(&mut self, start: usize, first: char) -> std::result::Result<Token, PredicateError> {
        let followed_by_eq = self.chars.next_if(|(_, c)| *c == '=').is_some();
        let op = match (first, followed_by_eq) {
            ('<', false) => CompareOp::Lt,
            ('<', true) => CompareOp::Le,
            ('>', false) => CompareOp::Gt,
            ('>', true) => CompareOp::Ge,
            ('=', true) => CompareOp::Eq,
            ('!', true) => CompareOp::Ne,
            ('=', false) => return Err(self.error(start, "expected '==' for equality")),
            _ => return Err(self.error(start, "expected '!=' after '!'")),
        };
        Ok(Token::Cmp(op))
    }

    /// Reads up to the closing `quote`; the opening one is already consumed.
    fn quoted(&mut self, quote: char, escapes: bool) -> std::result::Result<String, PredicateError> {
        let mut out = String::new();
        while let Some((_, ch)) = self.chars.next() {
            match ch {
                c if c == quote => return Ok(out),
                '\\' if escapes => match self.chars.next() {
                    Some((_, escaped)) => out.push(escaped),
                    None => break,
                },
                c => out.push(c),
            }
        }
        Err(PredicateError::Unterminated {
            condition: self.source.to_string(),
            quote,
        })
    }

    fn error(&self, position: usize, message: &str) -> PredicateError {
        PredicateError::Syntax {
            condition: self.source.to_string(),
            position,
            message: message.to_string(),
        }
    }
}

/// A bare word is a number when it looks like one and parses as `f64`.
fn number_literal(word: &str) -> Option<f64> {
    let mut chars = word.chars();
    let first = chars.next()?;
    let numeric_start = first.is_ascii_digit()
        || (matches!(first, '-' | '+' | '.') && word.chars().any(|c| c.is_ascii_digit()));
    if !numeric_start {
        return None;
    }
    word.parse::<f64>().ok()
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, token)| token)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, token)| token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: &str) -> PredicateError {
        let position = self
            .tokens
            .get(self.pos)
            .map_or(self.source.len(), |(offset, _)| *offset);
        PredicateError::Syntax {
            condition: self.source.to_string(),
            position,
            message: message.to_string(),
        }
    }

    fn parse_or(&mut self) -> std::result::Result<Predicate, PredicateError> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&Token::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Predicate::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> std::result::Result<Predicate, PredicateError> {
        let mut left = self.parse_unary()?;
        while self.peek() == Some(&Token::And) {
            self.advance();
            let right = self.parse_unary()?;
            left = Predicate::and(left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> std::result::Result<Predicate, PredicateError> {
        match self.peek() {
            Some(Token::Not) => {
                self.advance();
                Ok(Predicate::negate(self.parse_unary()?))
            }
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_or()?;
                if self.peek() != Some(&Token::RParen) {
                    return Err(self.error("expected ')'"));
                }
                self.advance();
                Ok(inner)
            }
            _ => self.parse_comparison(),
        }
    }

    fn parse_comparison(&mut self) -> std::result::Result<Predicate, PredicateError> {
        let mut left = self.parse_operand()?;
        let mut result: Option<Predicate> = None;
        while let Some(Token::Cmp(op)) = self.peek() {
            let op = *op;
            self.advance();
            let right = self.parse_operand()?;
            let comparison = Predicate::compare(left, op, right.clone());
            result = Some(match result {
                Some(prev) => Predicate::and(prev, comparison),
                None => comparison,
            });
            left = right;
        }
        result.ok_or_else(|| self.error("expected comparison operator"))
    }

    fn parse_operand(&mut self) -> std::result::Result<Operand, PredicateError> {
        let operand = match self.peek() {
            Some(Token::Word(word)) => match number_literal(word) {
                Some(value) => Operand::Number(value),
                None => Operand::Column(word.clone()),
            },
            Some(Token::Str(text)) => Operand::Text(text.clone()),
            Some(Token::Name(name)) => Operand::Column(name.clone()),
            _ => return Err(self.error("expected column, number or string")),
        };
        self.advance();
        Ok(operand)
    }
}
