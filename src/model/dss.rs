//! OpenDSS script reader
//!
//! Reads the command subset feeder models are written in and records every
//! element definition as a [`Component`]. Electrical values are kept as the
//! strings the script wrote; nothing is solved or validated.
//!
//! Supported commands:
//!
//! - `Clear` resets the model.
//! - `New [Object=]Class.Name key=value ...` defines an element. A
//!   `Circuit` must be defined before any other element.
//! - `Edit Class.Name key=value ...` appends properties to an element.
//! - `~` / `More` continue the last `New` or `Edit`.
//! - `Redirect file` / `Compile file` read another script, relative to the
//!   directory of the script that names it.
//! - `Set key=value ...` records options.
//!
//! Solution and reporting commands (`Solve`, `BusCoords`, `Show`, ...) are
//! skipped. Any other command is an error.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::{Component, ModelReader, Property, SystemModel};
use crate::error::{Error, Result};

/// Commands that do not change the network description.
const SKIPPED_COMMANDS: &[&str] = &[
    "addbusmarker",
    "allocateloads",
    "batchedit",
    "buildy",
    "buscoords",
    "calcv",
    "calcvoltagebases",
    "capacity",
    "cleanup",
    "close",
    "closedi",
    "currents",
    "disable",
    "dump",
    "enable",
    "estimate",
    "export",
    "get",
    "help",
    "interpolate",
    "latlongcoords",
    "losses",
    "makebuslist",
    "makeposseq",
    "nodediff",
    "open",
    "plot",
    "powers",
    "relcalc",
    "reset",
    "sample",
    "setbusxy",
    "setkvbase",
    "show",
    "solve",
    "summary",
    "totals",
    "visualize",
    "voltages",
    "zsc",
    "zsc10",
    "zscrefresh",
];

/// Reader for OpenDSS `.dss` scripts.
#[derive(Debug, Clone, Default)]
pub struct DssReader;

impl DssReader {
    pub fn new() -> Self {
        Self
    }

    /// Parse a script held in memory.
    ///
    /// `origin` names the script in errors and anchors relative `Redirect`
    /// paths.
    pub fn read_str(&self, origin: &Path, script: &str) -> Result<SystemModel> {
        let mut session = Session::new(origin);
        session.run_script(origin, script)?;
        session.finish(origin)
    }
}

impl ModelReader for DssReader {
    fn read(&self, entry_point: &Path) -> Result<SystemModel> {
        if !entry_point.is_file() {
            return Err(Error::MissingEntryPoint {
                path: entry_point.to_path_buf(),
            });
        }

        let mut session = Session::new(entry_point);
        session.run_file(entry_point)?;
        session.finish(entry_point)
    }
}

/// A `key=value` or bare positional token.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    key: Option<String>,
    value: String,
}

/// Mutable state while one entry point and its redirects are read.
struct Session {
    model: SystemModel,
    /// `class.name` (lowercase) to index in `model.components`.
    index: HashMap<String, usize>,
    /// Target of `~` continuations.
    last: Option<usize>,
    /// Scripts currently being read, for cycle detection.
    stack: Vec<PathBuf>,
}

impl Session {
    fn new(entry_point: &Path) -> Self {
        Self {
            model: SystemModel {
                source: entry_point.display().to_string(),
                ..SystemModel::default()
            },
            index: HashMap::new(),
            last: None,
            stack: Vec::new(),
        }
    }

    fn finish(self, entry_point: &Path) -> Result<SystemModel> {
        if self.model.name.is_empty() {
            return Err(Error::EmptyModel {
                path: entry_point.to_path_buf(),
            });
        }
        debug!(
            "Read circuit '{}' with {} components from {}",
            self.model.name,
            self.model.components.len(),
            entry_point.display()
        );
        Ok(self.model)
    }

    fn run_file(&mut self, path: &Path) -> Result<()> {
        let script = fs::read_to_string(path).map_err(|source| Error::ModelRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.run_script(path, &script)
    }

    fn run_script(&mut self, path: &Path, script: &str) -> Result<()> {
        self.stack.push(canonical(path));
        for (line_no, line) in logical_lines(script) {
            self.execute(path, line_no, &line)?;
        }
        self.stack.pop();
        Ok(())
    }

    fn execute(&mut self, path: &Path, line_no: usize, line: &str) -> Result<()> {
        let fail = |message: String| Error::ModelParse {
            path: path.to_path_buf(),
            line: line_no,
            message,
        };

        // `~bus1=x` is legal without a space after the tilde.
        if let Some(rest) = line.strip_prefix('~') {
            let tokens = tokenize(rest).map_err(fail)?;
            return self.continue_last(tokens).map_err(fail);
        }

        let (command, rest) = split_command(line);
        let tokens = tokenize(rest).map_err(fail)?;

        match command.to_lowercase().as_str() {
            "new" => self.define(tokens).map_err(fail),
            "edit" => self.edit(tokens).map_err(fail),
            "more" | "m" => self.continue_last(tokens).map_err(fail),
            "set" => self.set(tokens).map_err(fail),
            "clear" => {
                self.clear();
                Ok(())
            }
            "redirect" | "compile" => self.redirect(path, line_no, tokens),
            other if SKIPPED_COMMANDS.contains(&other) => {
                debug!("{}:{}: skipping '{}'", path.display(), line_no, command);
                Ok(())
            }
            _ => Err(fail(format!("unknown command '{}'", command))),
        }
    }

    fn define(&mut self, tokens: Vec<Token>) -> std::result::Result<(), String> {
        let mut tokens = tokens.into_iter();
        let object = match tokens.next() {
            Some(Token { key: None, value }) => value,
            Some(Token { key: Some(key), value }) if key.eq_ignore_ascii_case("object") => value,
            Some(Token { key: Some(key), .. }) => {
                return Err(format!("expected Class.Name after New, found '{}='", key))
            }
            None => return Err("New requires an element name".to_string()),
        };
        let (class, name) = split_object(&object)?;

        if class == "circuit" {
            if !self.model.name.is_empty() {
                warn!(
                    "Circuit '{}' replaces circuit '{}'",
                    name, self.model.name
                );
            }
            self.model.name = name.clone();
        } else if self.model.name.is_empty() {
            return Err(format!(
                "no active circuit for '{}.{}'; define 'New Circuit.<name>' first",
                class, name
            ));
        }

        let mut component = Component::new(class, name);
        append_properties(&mut component, tokens);

        let key = component.key();
        let position = match self.index.get(&key) {
            Some(&existing) => {
                warn!("Element '{}' redefined; keeping the later definition", key);
                self.model.components[existing] = component;
                existing
            }
            None => {
                self.model.components.push(component);
                let position = self.model.components.len() - 1;
                self.index.insert(key, position);
                position
            }
        };
        self.last = Some(position);
        Ok(())
    }

    fn edit(&mut self, tokens: Vec<Token>) -> std::result::Result<(), String> {
        let mut tokens = tokens.into_iter();
        let object = match tokens.next() {
            Some(Token { key: None, value }) => value,
            Some(Token { key: Some(key), value }) if key.eq_ignore_ascii_case("object") => value,
            _ => return Err("Edit requires an element name".to_string()),
        };
        let (class, name) = split_object(&object)?;
        let key = format!("{}.{}", class, name.to_lowercase());

        let position = *self
            .index
            .get(&key)
            .ok_or_else(|| format!("cannot edit undefined element '{}'", key))?;
        append_properties(&mut self.model.components[position], tokens);
        self.last = Some(position);
        Ok(())
    }

    fn continue_last(&mut self, tokens: Vec<Token>) -> std::result::Result<(), String> {
        let position = self
            .last
            .ok_or_else(|| "continuation line without a preceding New or Edit".to_string())?;
        append_properties(&mut self.model.components[position], tokens);
        Ok(())
    }

    fn set(&mut self, tokens: Vec<Token>) -> std::result::Result<(), String> {
        for token in tokens {
            match token.key {
                Some(key) => {
                    self.model.settings.insert(key.to_lowercase(), token.value);
                }
                None => return Err(format!("expected key=value in Set, found '{}'", token.value)),
            }
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.model.name.clear();
        self.model.settings.clear();
        self.model.components.clear();
        self.index.clear();
        self.last = None;
    }

    fn redirect(&mut self, path: &Path, line_no: usize, tokens: Vec<Token>) -> Result<()> {
        let fail = |message: String| Error::ModelParse {
            path: path.to_path_buf(),
            line: line_no,
            message,
        };

        let target = tokens
            .into_iter()
            .find(|t| t.key.is_none() || t.key.as_deref().is_some_and(|k| k.eq_ignore_ascii_case("file")))
            .map(|t| t.value)
            .ok_or_else(|| fail("Redirect requires a file name".to_string()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let resolved = base.join(&target);

        if self.stack.contains(&canonical(&resolved)) {
            return Err(fail(format!("redirect cycle through '{}'", target)));
        }
        if !resolved.is_file() {
            return Err(fail(format!("redirected file '{}' not found", target)));
        }

        debug!("{}:{}: redirect to {}", path.display(), line_no, resolved.display());
        self.run_file(&resolved)
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Split `Class.Name` into a lowercase class and the name as written.
fn split_object(object: &str) -> std::result::Result<(String, String), String> {
    match object.split_once('.') {
        Some((class, name)) if !class.is_empty() && !name.is_empty() => {
            Ok((class.to_lowercase(), name.to_string()))
        }
        _ => Err(format!("expected Class.Name, found '{}'", object)),
    }
}

/// Positional tokens become properties `_1`, `_2`, ... numbered per element.
fn append_properties(component: &mut Component, tokens: impl IntoIterator<Item = Token>) {
    for token in tokens {
        let name = match token.key {
            Some(key) => key,
            None => {
                let positional = component
                    .properties
                    .iter()
                    .filter(|p| p.name.starts_with('_'))
                    .count();
                format!("_{}", positional + 1)
            }
        };
        component.properties.push(Property {
            name,
            value: token.value,
        });
    }
}

fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim_start();
    match line.find(|c: char| c.is_whitespace()) {
        Some(end) => (&line[..end], &line[end..]),
        None => (line, ""),
    }
}

/// Strip comments and blank lines, yielding 1-based line numbers.
fn logical_lines(script: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut in_block = false;

    for (index, raw) in script.lines().enumerate() {
        let mut text = String::new();
        let mut chars = raw.chars().peekable();
        let mut quote: Option<char> = None;

        while let Some(c) = chars.next() {
            if in_block {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    in_block = false;
                }
                continue;
            }
            if let Some(q) = quote {
                if c == q {
                    quote = None;
                }
                text.push(c);
                continue;
            }
            match c {
                '"' | '\'' => {
                    quote = Some(c);
                    text.push(c);
                }
                '!' => break,
                '/' if chars.peek() == Some(&'/') => break,
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    in_block = true;
                }
                _ => text.push(c),
            }
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            lines.push((index + 1, trimmed.to_string()));
        }
    }

    lines
}

fn closing(open: char) -> Option<char> {
    match open {
        '"' => Some('"'),
        '\'' => Some('\''),
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == ','
}

/// Split the argument part of a command into tokens.
///
/// `"..."` and `'...'` are unwrapped; bracketed values keep their brackets
/// so arrays stay recognisable.
fn tokenize(input: &str) -> std::result::Result<Vec<Token>, String> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        if is_delimiter(chars[pos]) {
            pos += 1;
            continue;
        }

        let (first, next) = read_value(&chars, pos)?;
        pos = next;

        let mut lookahead = pos;
        while lookahead < chars.len() && chars[lookahead].is_whitespace() {
            lookahead += 1;
        }

        if lookahead < chars.len() && chars[lookahead] == '=' {
            pos = lookahead + 1;
            while pos < chars.len() && chars[pos].is_whitespace() {
                pos += 1;
            }
            if pos >= chars.len() || chars[pos] == ',' {
                return Err(format!("missing value for '{}'", first));
            }
            let (value, next) = read_value(&chars, pos)?;
            pos = next;
            tokens.push(Token {
                key: Some(first),
                value,
            });
        } else {
            tokens.push(Token {
                key: None,
                value: first,
            });
        }
    }

    Ok(tokens)
}

/// Read one bare or quoted value starting at `start`.
fn read_value(chars: &[char], start: usize) -> std::result::Result<(String, usize), String> {
    let open = chars[start];

    if let Some(close) = closing(open) {
        let end = chars[start + 1..]
            .iter()
            .position(|&c| c == close)
            .map(|offset| start + 1 + offset)
            .ok_or_else(|| format!("unterminated {} in value", open))?;

        let value = if open == '"' || open == '\'' {
            chars[start + 1..end].iter().collect()
        } else {
            chars[start..=end].iter().collect()
        };
        return Ok((value, end + 1));
    }

    if open == '=' {
        return Err("unexpected '='".to_string());
    }

    let mut end = start;
    while end < chars.len() && !is_delimiter(chars[end]) && chars[end] != '=' {
        end += 1;
    }
    Ok((chars[start..end].iter().collect(), end))
}
