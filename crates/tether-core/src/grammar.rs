//! Line-oriented descriptor grammar.
//!
//! A descriptor body is unfolded into logical lines first: a physical line
//! starting with whitespace continues the previous one and is joined to it
//! with a single space. Each logical line is then offered to every registered
//! [`LineParser`] in order. A parser only acts on lines starting with its own
//! keyword (case-insensitive, followed by `:`); lines nobody owns are ignored.
//!
//! ```text
//! depends: sauron = 1.0.0
//! depends: one-ring > 1.0 and = 1.2
//! override: ring-of-power => one-ring
//! description: Forged in the fires
//!   of Mount Doom
//! anchored: true
//! ```

use tether_util::errors::TetherError;

use crate::dependency::{DependencyRequirement, NameOverride};
use crate::descriptor::Descriptor;
use crate::version::{Version, VersionConstraint};

/// Fold continuation lines into their predecessor and drop blank lines.
///
/// An empty line ends the current logical line, so an indented line after it
/// starts a new one.
pub fn unfold_lines(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut after_blank = true;
    for raw in content.lines() {
        if raw.is_empty() {
            after_blank = true;
            continue;
        }
        let trimmed = raw.trim();
        let is_continuation = raw.starts_with(char::is_whitespace) && !after_blank;
        after_blank = false;
        if trimmed.is_empty() {
            continue;
        }
        match lines.last_mut() {
            Some(prev) if is_continuation => {
                prev.push(' ');
                prev.push_str(trimmed);
            }
            _ => lines.push(trimmed.to_string()),
        }
    }
    lines
}

/// Return the value after `keyword:` if `line` starts with it.
fn strip_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let head = line.get(..keyword.len())?;
    if !head.eq_ignore_ascii_case(keyword) {
        return None;
    }
    line[keyword.len()..]
        .trim_start()
        .strip_prefix(':')
        .map(str::trim)
}

/// A parser for one descriptor keyword.
pub trait LineParser {
    /// The keyword this parser owns, without the trailing colon.
    fn keyword(&self) -> &'static str;

    /// Apply the value following `keyword:` to the descriptor.
    fn apply(&self, value: &str, descriptor: &mut Descriptor) -> Result<(), TetherError>;

    /// Parse `line` if it belongs to this parser. Returns whether it did.
    fn parse(&self, line: &str, descriptor: &mut Descriptor) -> Result<bool, TetherError> {
        match strip_keyword(line, self.keyword()) {
            Some(value) => self.apply(value, descriptor).map(|()| true),
            None => Ok(false),
        }
    }
}

fn validate_name(name: &str, what: &str) -> Result<(), TetherError> {
    if name.is_empty() {
        return Err(TetherError::Descriptor {
            message: format!("missing {what} name"),
        });
    }
    if name.chars().any(char::is_whitespace) {
        return Err(TetherError::Descriptor {
            message: format!("{what} name `{name}` contains whitespace"),
        });
    }
    Ok(())
}

/// `depends: <name>[ <op> <version>[ and <op> <version>...]]` where `<op>` is `=` or `>`.
#[derive(Debug, Default)]
pub struct DependsParser;

impl DependsParser {
    /// Parse the value of a `depends:` line into a requirement.
    pub fn parse_requirement(value: &str) -> Result<DependencyRequirement, TetherError> {
        let value = value.trim();
        let (name, clauses) = match value.find(['=', '>']) {
            Some(idx) => (value[..idx].trim(), Some(&value[idx..])),
            None => (value, None),
        };
        validate_name(name, "dependency")?;

        let mut requirement = DependencyRequirement::any(name);
        if let Some(clauses) = clauses {
            for clause in clauses.split(" and ") {
                requirement = requirement.with_constraint(parse_clause(clause.trim())?);
            }
        }
        Ok(requirement)
    }
}

fn parse_clause(clause: &str) -> Result<VersionConstraint, TetherError> {
    let mut chars = clause.chars();
    let op = chars.next();
    let operand = chars.as_str().trim();
    match op {
        Some('=') => Ok(VersionConstraint::EqualTo(Version::parse(operand)?)),
        Some('>') => Ok(VersionConstraint::GreaterThan(Version::parse(operand)?)),
        _ => Err(TetherError::Descriptor {
            message: format!("unsupported version clause `{clause}`"),
        }),
    }
}

impl LineParser for DependsParser {
    fn keyword(&self) -> &'static str {
        "depends"
    }

    fn apply(&self, value: &str, descriptor: &mut Descriptor) -> Result<(), TetherError> {
        let requirement = Self::parse_requirement(value)?;
        descriptor.dependencies.push(requirement);
        Ok(())
    }
}

/// `override: <from> => <to>` or `override: <from> <to>`.
#[derive(Debug, Default)]
pub struct OverrideParser;

impl LineParser for OverrideParser {
    fn keyword(&self) -> &'static str {
        "override"
    }

    fn apply(&self, value: &str, descriptor: &mut Descriptor) -> Result<(), TetherError> {
        let (from, to) = match value.split_once("=>") {
            Some((from, to)) => (from.trim(), to.trim()),
            None => {
                let tokens: Vec<&str> = value.split_whitespace().collect();
                match tokens.as_slice() {
                    [from, to] => (*from, *to),
                    _ => {
                        return Err(TetherError::Descriptor {
                            message: format!("expected `override: <from> => <to>`, got `{value}`"),
                        })
                    }
                }
            }
        };
        validate_name(from, "override source")?;
        validate_name(to, "override target")?;
        descriptor.overrides.push(NameOverride::new(from, to));
        Ok(())
    }
}

/// `description: <free text>`. Repeated lines are joined with a space.
#[derive(Debug, Default)]
pub struct DescriptionParser;

impl LineParser for DescriptionParser {
    fn keyword(&self) -> &'static str {
        "description"
    }

    fn apply(&self, value: &str, descriptor: &mut Descriptor) -> Result<(), TetherError> {
        match descriptor.description.as_mut() {
            Some(existing) if !value.is_empty() => {
                existing.push(' ');
                existing.push_str(value);
            }
            Some(_) => {}
            None => descriptor.description = Some(value.to_string()),
        }
        Ok(())
    }
}

/// `anchored: true|false`.
#[derive(Debug, Default)]
pub struct AnchorParser;

impl LineParser for AnchorParser {
    fn keyword(&self) -> &'static str {
        "anchored"
    }

    fn apply(&self, value: &str, descriptor: &mut Descriptor) -> Result<(), TetherError> {
        descriptor.anchored = match value.to_ascii_lowercase().as_str() {
            "true" | "yes" => true,
            "false" | "no" => false,
            _ => {
                return Err(TetherError::Descriptor {
                    message: format!("expected `anchored: true|false`, got `{value}`"),
                })
            }
        };
        Ok(())
    }
}

/// The ordered set of line parsers applied to every descriptor line.
pub struct DescriptorParser {
    parsers: Vec<Box<dyn LineParser + Send + Sync>>,
}

impl DescriptorParser {
    pub fn new(parsers: Vec<Box<dyn LineParser + Send + Sync>>) -> Self {
        Self { parsers }
    }

    /// Parse `content` into `descriptor`, appending to what it already holds.
    ///
    /// Failures name the offending logical line.
    pub fn parse_into(&self, content: &str, descriptor: &mut Descriptor) -> Result<(), TetherError> {
        for line in unfold_lines(content) {
            for parser in &self.parsers {
                parser
                    .parse(&line, descriptor)
                    .map_err(|e| TetherError::Descriptor {
                        message: format!("`{line}`: {}", inner_message(&e)),
                    })?;
            }
        }
        Ok(())
    }
}

fn inner_message(e: &TetherError) -> String {
    match e {
        TetherError::Descriptor { message } => message.clone(),
        other => other.to_string(),
    }
}

impl Default for DescriptorParser {
    fn default() -> Self {
        Self::new(vec![
            Box::new(DependsParser),
            Box::new(DescriptionParser),
            Box::new(OverrideParser),
            Box::new(AnchorParser),
        ])
    }
}
