//! Descriptor parsing for the two accepted grammars.
//!
//! The **flat** grammar is a dependency snapshot, one module per line:
//!
//! ```text
//! github.com/solo-io/solo-projects
//! github.com/solo-io/foo v0.0.0-20180207000608-0eeff89b0690
//! github.com/solo-io/bar v1.2.3 => github.com/solo-io/bar v1.2.4
//! ```
//!
//! The **sectioned** grammar is a module file with `module` and `go` lines
//! and `require ( ... )` / `replace ( ... )` blocks:
//!
//! ```text
//! module github.com/solo-io/ext-auth-plugin-examples
//!
//! go 1.14
//!
//! require (
//!     github.com/solo-io/foo v0.0.0-20180207000608-0eeff89b0690
//! )
//! ```

use std::path::Path;

use crate::descriptor::{ModuleDescriptor, ModuleRef, ReplaceDirective, Requirement};
use crate::error::{Error, Result};

const FLAT_EXPECTED: &str = "'NAME VERSION' or 'NAME VERSION => REPLACE_NAME REPLACE_VERSION'";
const REQUIRE_EXPECTED: &str = "'NAME VERSION'";
const REPLACE_EXPECTED: &str = "'NAME [VERSION] => REPLACE_NAME [REPLACE_VERSION]'";
const DIRECTIVE_EXPECTED: &str = "'KEYWORD VALUE'";

const MODULE_KEYWORD: &str = "module";
const TOOL_VERSION_KEYWORD: &str = "go";
const REQUIRE_KEYWORD: &str = "require";
const REPLACE_KEYWORD: &str = "replace";
const COMMENT_MARKER: &str = "//";
const ARROW: &str = "=>";

/// Which grammar a descriptor text is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// `NAME VERSION` / `NAME VERSION => NAME VERSION` lines.
    Flat,
    /// `module`, `go`, `require (...)` and `replace (...)`.
    Sectioned,
}

impl Grammar {
    /// Guess the grammar from the text.
    ///
    /// Sectioned if any meaningful line starts with the `module`, `require`
    /// or `replace` keyword, flat otherwise.
    pub fn detect(text: &str) -> Self {
        let sectioned = text.lines().any(|raw| {
            let tokens: Vec<&str> = strip_comment(raw).split_whitespace().collect();
            match tokens.as_slice() {
                [MODULE_KEYWORD | REQUIRE_KEYWORD | REPLACE_KEYWORD, _, ..] => true,
                _ => false,
            }
        });
        if sectioned {
            Grammar::Sectioned
        } else {
            Grammar::Flat
        }
    }
}

/// Parse `text`, detecting its grammar.
pub fn parse(text: &str) -> Result<ModuleDescriptor> {
    parse_with(text, Grammar::detect(text))
}

/// Parse `text` with an explicit grammar.
pub fn parse_with(text: &str, grammar: Grammar) -> Result<ModuleDescriptor> {
    match grammar {
        Grammar::Flat => parse_flat(text),
        Grammar::Sectioned => parse_sectioned(text),
    }
}

/// Read and parse a descriptor file.
///
/// A missing path or a directory fails before anything is read.
pub fn load(path: &Path, grammar: Option<Grammar>) -> Result<ModuleDescriptor> {
    let text = modsync_fs::io::read_text(path)?;
    let grammar = grammar.unwrap_or_else(|| Grammar::detect(&text));
    tracing::debug!(path = %path.display(), ?grammar, "parsing descriptor");
    parse_with(&text, grammar)
}

/// Parse the flat dependency-list grammar.
///
/// The first single-token line names the module; every other non-blank line
/// must have exactly 2 or exactly 5 tokens.
pub fn parse_flat(text: &str) -> Result<ModuleDescriptor> {
    let mut descriptor = ModuleDescriptor::default();
    let mut named = false;

    for (idx, raw) in text.lines().enumerate() {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        if !named && tokens.len() == 1 {
            descriptor.name = tokens[0].to_string();
            named = true;
            continue;
        }

        descriptor = match tokens.as_slice() {
            [path, version] => descriptor.with_requirement(Requirement {
                path: path.to_string(),
                version: version.to_string(),
                line: raw.trim().to_string(),
            }),
            [old, old_version, ARROW, new, new_version] => {
                descriptor.with_replacement(ReplaceDirective {
                    old: ModuleRef::new(*old, *old_version),
                    new: ModuleRef::new(*new, *new_version),
                    line: raw.trim().to_string(),
                })
            }
            _ => {
                return Err(Error::MalformedLine {
                    line_number: idx + 1,
                    line: raw.to_string(),
                    expected: FLAT_EXPECTED,
                });
            }
        };
    }

    Ok(descriptor)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Require,
    Replace,
}

impl Section {
    fn keyword(self) -> &'static str {
        match self {
            Section::Require => REQUIRE_KEYWORD,
            Section::Replace => REPLACE_KEYWORD,
        }
    }
}

/// Parse the sectioned module-file grammar.
pub fn parse_sectioned(text: &str) -> Result<ModuleDescriptor> {
    let mut descriptor = ModuleDescriptor::default();
    let mut section: Option<Section> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_number = idx + 1;
        let line = raw.trim();
        let content = strip_comment(raw).trim();
        if content.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = content.split_whitespace().collect();

        if let Some(current) = section {
            if tokens == [")"] {
                section = None;
                continue;
            }
            descriptor = add_entry(descriptor, current, &tokens, line, line_number)?;
            continue;
        }

        let keyword = tokens[0];
        let rest = &tokens[1..];
        match keyword {
            MODULE_KEYWORD => {
                let name = single_value(rest, raw, line_number)?;
                descriptor.name = name.trim_matches('"').to_string();
            }
            TOOL_VERSION_KEYWORD => {
                let version = single_value(rest, raw, line_number)?;
                descriptor.tool_version = Some(version.to_string());
            }
            REQUIRE_KEYWORD | REPLACE_KEYWORD => {
                let kind = if keyword == REQUIRE_KEYWORD {
                    Section::Require
                } else {
                    Section::Replace
                };
                if rest == ["("] {
                    section = Some(kind);
                } else {
                    let entry_line = line[keyword.len()..].trim();
                    descriptor = add_entry(descriptor, kind, rest, entry_line, line_number)?;
                }
            }
            _ if rest.first() == Some(&"(") => {
                return Err(Error::UnknownSection {
                    line_number,
                    line: raw.to_string(),
                });
            }
            _ => {
                tracing::warn!(line_number, line, "ignoring unsupported directive");
            }
        }
    }

    if let Some(open) = section {
        return Err(Error::UnterminatedSection {
            section: open.keyword().to_string(),
        });
    }

    Ok(descriptor)
}

fn add_entry(
    descriptor: ModuleDescriptor,
    section: Section,
    tokens: &[&str],
    line: &str,
    line_number: usize,
) -> Result<ModuleDescriptor> {
    match section {
        Section::Require => match tokens {
            [path, version] => Ok(descriptor.with_requirement(Requirement {
                path: path.to_string(),
                version: version.to_string(),
                line: line.to_string(),
            })),
            _ => Err(Error::MalformedLine {
                line_number,
                line: line.to_string(),
                expected: REQUIRE_EXPECTED,
            }),
        },
        Section::Replace => {
            let directive = parse_replace(tokens, line).ok_or_else(|| Error::MalformedLine {
                line_number,
                line: line.to_string(),
                expected: REPLACE_EXPECTED,
            })?;
            Ok(descriptor.with_replacement(directive))
        }
    }
}

fn parse_replace(tokens: &[&str], line: &str) -> Option<ReplaceDirective> {
    let arrow = tokens.iter().position(|t| *t == ARROW)?;
    let old = module_ref(&tokens[..arrow])?;
    let new = module_ref(&tokens[arrow + 1..])?;
    Some(ReplaceDirective {
        old,
        new,
        line: line.to_string(),
    })
}

fn module_ref(tokens: &[&str]) -> Option<ModuleRef> {
    match tokens {
        [path] => Some(ModuleRef::unversioned(*path)),
        [path, version] => Some(ModuleRef::new(*path, *version)),
        _ => None,
    }
}

fn single_value<'a>(rest: &[&'a str], raw: &str, line_number: usize) -> Result<&'a str> {
    match rest {
        [value] => Ok(*value),
        _ => Err(Error::MalformedLine {
            line_number,
            line: raw.to_string(),
            expected: DIRECTIVE_EXPECTED,
        }),
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT_MARKER) {
        Some(idx) => &line[..idx],
        None => line,
    }
}
