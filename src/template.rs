//! Code templates with typed holes.
//!
//! A template is source text containing placeholders: `$` marks a scalar
//! hole filled by one value, `@` a splice hole filled by a sequence. Holes
//! are addressed positionally (`$1`, `@2`, numbered per sigil family) or by
//! name (`$LHS`, matched case-insensitively). Expansion substitutes source
//! text, parses the result in the template's language, and hands back typed
//! nodes, so template output is always a well-formed tree, never a string.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AstError, Result};
use crate::language::Language;
use crate::parse::parse;
use crate::tree::{Ast, Value};

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"([$@])([A-Za-z_][A-Za-z0-9_]*|[1-9][0-9]*)").unwrap();
}

/// A template plus its hole bindings. Construct with [`Template::new`],
/// fill holes with the builder methods, then [`build`](Template::build) or
/// [`build_all`](Template::build_all).
pub struct Template {
    text: String,
    language: Language,
    args: Vec<Value>,
    splice_args: Vec<Vec<Value>>,
    named: Vec<(String, Value)>,
    named_splices: Vec<(String, Vec<Value>)>,
}

impl Template {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
            args: Vec::new(),
            splice_args: Vec::new(),
            named: Vec::new(),
            named_splices: Vec::new(),
        }
    }

    /// Supply the next positional scalar value, filling `$1`, `$2`, ... in
    /// call order.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Supply the next positional splice sequence, filling `@1`, `@2`, ...
    /// in call order.
    pub fn splice_arg(mut self, values: Vec<Value>) -> Self {
        self.splice_args.push(values);
        self
    }

    /// Bind a named scalar hole.
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    /// Bind a named splice hole.
    pub fn bind_splice(mut self, name: impl Into<String>, values: Vec<Value>) -> Self {
        self.named_splices.push((name.into(), values));
        self
    }

    /// Expand to source text, recording the byte range each hole produced.
    fn expand(&self) -> Result<(String, Vec<(usize, usize)>)> {
        let mut out = String::new();
        let mut ranges = Vec::new();
        let mut last = 0;
        let mut args_used = vec![false; self.args.len()];
        let mut splice_args_used = vec![false; self.splice_args.len()];
        let mut named_used = vec![false; self.named.len()];
        let mut named_splices_used = vec![false; self.named_splices.len()];

        for caps in PLACEHOLDER.captures_iter(&self.text) {
            let whole = caps.get(0).ok_or_else(|| {
                AstError::Template("placeholder match without a range".to_string())
            })?;
            out.push_str(&self.text[last..whole.start()]);
            last = whole.end();

            let splice = &caps[1] == "@";
            let name = &caps[2];
            let rendered = if let Ok(n) = name.parse::<usize>() {
                if splice {
                    let values = self.splice_args.get(n - 1).ok_or_else(|| {
                        AstError::Template(format!("no splice argument for @{n}"))
                    })?;
                    splice_args_used[n - 1] = true;
                    self.join(values)
                } else {
                    let value = self
                        .args
                        .get(n - 1)
                        .ok_or_else(|| AstError::Template(format!("no argument for ${n}")))?;
                    args_used[n - 1] = true;
                    value.to_source(self.language)
                }
            } else if splice {
                let (i, (_, values)) = self
                    .named_splices
                    .iter()
                    .enumerate()
                    .find(|(_, (bound, _))| bound.eq_ignore_ascii_case(name))
                    .ok_or_else(|| AstError::Template(format!("no binding for @{name}")))?;
                named_splices_used[i] = true;
                self.join(values)
            } else {
                let (i, (_, value)) = self
                    .named
                    .iter()
                    .enumerate()
                    .find(|(_, (bound, _))| bound.eq_ignore_ascii_case(name))
                    .ok_or_else(|| AstError::Template(format!("no binding for ${name}")))?;
                named_used[i] = true;
                value.to_source(self.language)
            };

            let start = out.len();
            out.push_str(&rendered);
            ranges.push((start, out.len()));
        }
        out.push_str(&self.text[last..]);

        if let Some(i) = args_used.iter().position(|used| !used) {
            return Err(AstError::Template(format!(
                "positional value {} is never used by the template",
                i + 1
            )));
        }
        if let Some(i) = splice_args_used.iter().position(|used| !used) {
            return Err(AstError::Template(format!(
                "positional splice {} is never used by the template",
                i + 1
            )));
        }
        if let Some(i) = named_used.iter().position(|used| !used) {
            return Err(AstError::Template(format!(
                "binding {} does not appear in the template",
                self.named[i].0
            )));
        }
        if let Some(i) = named_splices_used.iter().position(|used| !used) {
            return Err(AstError::Template(format!(
                "splice binding {} does not appear in the template",
                self.named_splices[i].0
            )));
        }
        Ok((out, ranges))
    }

    fn join(&self, values: &[Value]) -> String {
        values
            .iter()
            .map(|v| v.to_source(self.language))
            .collect::<Vec<_>>()
            .join(self.language.argument_separator())
    }

    /// Expand and parse, returning the most specific node for the whole
    /// template.
    pub fn build(&self) -> Result<Ast> {
        let (source, _) = self.expand()?;
        let root = parse(&source, self.language)?;
        if root.child_entries().is_empty() {
            return Err(AstError::Template(format!(
                "template expanded to no code: {source:?}"
            )));
        }
        Ok(root.deepest())
    }

    /// Expand and parse, returning the node each hole produced, in template
    /// order. A splice hole contributes one node per spliced construct; a
    /// template without holes yields the top-level constructs.
    pub fn build_all(&self) -> Result<Vec<Ast>> {
        let (source, ranges) = self.expand()?;
        let root = parse(&source, self.language)?;
        if ranges.is_empty() {
            return Ok(root.children());
        }
        let mut out = Vec::new();
        for (start, end) in ranges {
            let mut within = Vec::new();
            collect_within(&root, start, end, &mut within);
            out.extend(within.into_iter().map(|node| node.deepest()));
        }
        Ok(out)
    }
}

/// Maximal nodes lying entirely inside `[start, end)`, in source order.
fn collect_within(node: &Ast, start: usize, end: usize, out: &mut Vec<Ast>) {
    for child in node.children() {
        let range = child.range();
        if range.start_byte >= start && range.end_byte <= end && range.end_byte > range.start_byte
        {
            out.push(child);
        } else if range.start_byte < end && range.end_byte > start {
            collect_within(&child, start, end, out);
        }
    }
}
