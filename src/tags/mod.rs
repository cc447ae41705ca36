//! Boolean tag expressions evaluated against a scenario's labels.
//!
//! Expressions use the Cucumber tag-expression syntax and are parsed by
//! [`gherkin::tagexpr::TagOperation`]: tags such as `@smoke` combined with
//! `not`, `and` and `or` (binding in that order, tightest first), grouped
//! with parentheses. A backslash escapes `(`, `)`, `\` or a space inside a
//! tag. An empty expression matches every tag set.
//!
//! ```
//! use hookwise::tags::TagExpression;
//!
//! let expr: TagExpression = "@foo and not @bar".parse()?;
//! assert!(expr.evaluate(&["@foo".to_owned()]));
//! assert!(!expr.evaluate(&["@foo".to_owned(), "@bar".to_owned()]));
//! # Ok::<(), hookwise::error::DeclarationError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use gherkin::tagexpr::TagOperation;

use crate::error::DeclarationError;

/// Most operators and groups one expression may contain.
///
/// Parsing, evaluation and drop all recurse once per level of the tree, and
/// the tree is never deeper than this count.
pub const MAX_NESTING: usize = 256;

/// Count the `and`, `or`, `not` and `(` tokens of an expression.
fn nesting_of(expression: &str) -> usize {
    let is_operator = |word: &str| matches!(word, "and" | "or" | "not");
    let mut count = 0;
    let mut word = String::new();
    let mut chars = expression.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                word.push(ch);
                word.extend(chars.next());
            }
            '(' | ')' => {
                count += usize::from(is_operator(&word)) + usize::from(ch == '(');
                word.clear();
            }
            _ if ch.is_whitespace() => {
                count += usize::from(is_operator(&word));
                word.clear();
            }
            _ => word.push(ch),
        }
    }
    count + usize::from(is_operator(&word))
}

/// Whether `tags` holds `@name`.
fn has_tag(tags: &[String], name: &str) -> bool {
    tags.iter().any(|tag| tag.strip_prefix('@') == Some(name))
}

fn evaluate(operation: &TagOperation, tags: &[String]) -> bool {
    match operation {
        TagOperation::Tag(name) => has_tag(tags, name),
        TagOperation::Not(inner) => !evaluate(inner, tags),
        TagOperation::And(lhs, rhs) => evaluate(lhs, tags) && evaluate(rhs, tags),
        TagOperation::Or(lhs, rhs) => evaluate(lhs, tags) || evaluate(rhs, tags),
    }
}

fn write_operation(f: &mut fmt::Formatter<'_>, operation: &TagOperation) -> fmt::Result {
    match operation {
        TagOperation::Tag(name) => {
            f.write_str("@")?;
            for ch in name.chars() {
                if matches!(ch, '(' | ')' | '\\' | ' ') {
                    f.write_str("\\")?;
                }
                write!(f, "{ch}")?;
            }
            Ok(())
        }
        TagOperation::Not(inner) => {
            f.write_str("not ( ")?;
            write_operation(f, inner)?;
            f.write_str(" )")
        }
        TagOperation::And(lhs, rhs) => write_binary(f, lhs, "and", rhs),
        TagOperation::Or(lhs, rhs) => write_binary(f, lhs, "or", rhs),
    }
}

fn write_binary(
    f: &mut fmt::Formatter<'_>,
    lhs: &TagOperation,
    operator: &str,
    rhs: &TagOperation,
) -> fmt::Result {
    f.write_str("( ")?;
    write_operation(f, lhs)?;
    write!(f, " {operator} ")?;
    write_operation(f, rhs)?;
    f.write_str(" )")
}

/// A compiled tag expression.
///
/// Compile once with [`TagExpression::parse`] and evaluate as often as
/// needed; evaluation never fails.
#[derive(Debug, Clone)]
pub struct TagExpression {
    source: String,
    root: Option<TagOperation>,
}

impl TagExpression {
    /// Compile an expression.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::InvalidTagExpression`] when the expression
    /// is malformed (unbalanced parentheses, a missing operand, two adjacent
    /// tags without an operator, an illegal escape) or holds more than
    /// [`MAX_NESTING`] operators and groups.
    pub fn parse(expression: &str) -> Result<Self, DeclarationError> {
        let invalid = |reason: String| DeclarationError::InvalidTagExpression {
            expression: String::from(expression),
            reason,
        };
        if nesting_of(expression) > MAX_NESTING {
            return Err(invalid(String::from("nesting too deep")));
        }
        let trimmed = expression.trim();
        let root = if trimmed.is_empty() {
            None
        } else {
            let operation = trimmed
                .parse::<TagOperation>()
                .map_err(|error| invalid(error.to_string()))?;
            Some(operation)
        };
        Ok(Self {
            source: String::from(expression),
            root,
        })
    }

    /// Evaluate the expression against a scenario's tag set.
    ///
    /// Scenario tags carry their leading `@`.
    #[must_use]
    pub fn evaluate(&self, tags: &[String]) -> bool {
        self.root
            .as_ref()
            .is_none_or(|operation| evaluate(operation, tags))
    }

    /// The expression as originally written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl PartialEq for TagExpression {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for TagExpression {}

impl FromStr for TagExpression {
    type Err = DeclarationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Renders the fully parenthesised canonical form.
impl fmt::Display for TagExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root.as_ref() {
            Some(operation) => write_operation(f, operation),
            None => f.write_str("true"),
        }
    }
}
