//! RcDoc-based pretty-printer with termcolor annotations for sentences, terms and contexts.
//!
//! Role
//! - Convert AST nodes into annotated documents suitable for width-aware rendering.
//! - Provide colored output for terminals (TTY-aware) and plain strings for logs/tests.
//!
//! At unbounded width the plain rendering is exactly the canonical display text
//! (`short_text` / [`Context::name`]); narrower widths only break lines after connectives,
//! quantifier colons and list commas.
use std::io::{self, Write};

use pretty::{RcDoc, RenderAnnotated};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::context::Context;
use crate::env::{Assumption, AssumptionKind, Environment};
use crate::sentence::{Sentence, SentenceKind};
use crate::term::{Term, TermKind};

/// Width used for plain strings; wide enough that nothing is ever broken.
const UNBOUNDED_WIDTH: usize = 1 << 20;

/// Styles used to annotate parts of the pretty-printed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Punct, // commas, colons, brackets, quotes
    /// Parentheses are colored by nesting depth so matching pairs share a color.
    Paren(u8),
    Keyword,  // FOR ALL, assuming, letting, formula
    Operator, // AND, OR, IMPLIES, infix operators and relations
    Ident,    // atoms and variables
    Symbol,   // primitive terms, prefix operators and predicates
}

impl Style {
    fn to_color_spec(self) -> ColorSpec {
        let mut s = ColorSpec::new();
        match self {
            Style::Punct => {
                s.set_dimmed(true);
            }
            Style::Paren(depth) => {
                let fg = match depth % 4 {
                    0 => Color::Blue,
                    1 => Color::Green,
                    2 => Color::Yellow,
                    _ => Color::Magenta,
                };
                s.set_fg(Some(fg)).set_dimmed(true);
            }
            Style::Keyword => {
                s.set_fg(Some(Color::Cyan)).set_bold(true);
            }
            Style::Operator => {
                s.set_fg(Some(Color::Yellow)).set_bold(true);
            }
            Style::Ident => {
                s.set_fg(Some(Color::Green)).set_bold(true);
            }
            Style::Symbol => {
                s.set_fg(Some(Color::Magenta));
            }
        }
        s
    }
}

fn styled(style: Style, s: impl Into<String>) -> RcDoc<'static, Style> {
    RcDoc::as_string(s.into()).annotate(style)
}

fn punct(s: &'static str) -> RcDoc<'static, Style> {
    styled(Style::Punct, s)
}

fn kw(s: impl Into<String>) -> RcDoc<'static, Style> {
    styled(Style::Keyword, s)
}

fn op(s: impl Into<String>) -> RcDoc<'static, Style> {
    styled(Style::Operator, s)
}

fn ident(s: impl Into<String>) -> RcDoc<'static, Style> {
    styled(Style::Ident, s)
}

/// Wrap `inner` in depth-colored parentheses when the long form of a node differs.
fn parenthesized(
    compound: bool,
    depth: u8,
    inner: impl FnOnce(u8) -> RcDoc<'static, Style>,
) -> RcDoc<'static, Style> {
    if compound {
        styled(Style::Paren(depth), "(")
            .append(inner(depth.wrapping_add(1)))
            .append(styled(Style::Paren(depth), ")"))
            .group()
    } else {
        inner(depth)
    }
}

/// Comma-separated list; breaks are allowed after each comma.
fn comma_list(docs: impl IntoIterator<Item = RcDoc<'static, Style>>) -> RcDoc<'static, Style> {
    RcDoc::intersperse(docs, punct(",").append(RcDoc::line())).group()
}

fn term_doc(term: &Term, depth: u8) -> RcDoc<'static, Style> {
    match term.kind() {
        TermKind::Free(v) => ident(v.name()),
        TermKind::Bound(v) => ident(v.name()),
        TermKind::Primitive(name) => styled(Style::Symbol, name.to_string()),
        TermKind::Apply { operator, args } if operator.is_infix() => {
            long_term_doc(&args[0], depth)
                .append(RcDoc::space())
                .append(op(operator.name()))
                .append(RcDoc::line())
                .append(long_term_doc(&args[1], depth))
                .group()
        }
        TermKind::Apply { operator, args } if args.is_empty() => {
            styled(Style::Symbol, operator.name())
        }
        TermKind::Apply { operator, args } => styled(Style::Symbol, operator.name())
            .append(styled(Style::Paren(depth), "("))
            .append(comma_list(args.iter().map(|a| term_doc(a, depth.wrapping_add(1)))))
            .append(styled(Style::Paren(depth), ")"))
            .group(),
    }
}

fn long_term_doc(term: &Term, depth: u8) -> RcDoc<'static, Style> {
    parenthesized(term.long_text() != term.short_text(), depth, |d| {
        term_doc(term, d)
    })
}

fn sentence_doc(sentence: &Sentence, depth: u8) -> RcDoc<'static, Style> {
    match sentence.kind() {
        SentenceKind::Atomic(name) => ident(name.to_string()),
        SentenceKind::Predicate { predicate, args } if predicate.is_infix() => {
            long_term_doc(&args[0], depth)
                .append(RcDoc::space())
                .append(op(predicate.name()))
                .append(RcDoc::line())
                .append(long_term_doc(&args[1], depth))
                .group()
        }
        SentenceKind::Predicate { predicate, args } if args.is_empty() => {
            styled(Style::Symbol, predicate.name())
        }
        SentenceKind::Predicate { predicate, args } => styled(Style::Symbol, predicate.name())
            .append(styled(Style::Paren(depth), "("))
            .append(comma_list(args.iter().map(|a| term_doc(a, depth.wrapping_add(1)))))
            .append(styled(Style::Paren(depth), ")"))
            .group(),
        SentenceKind::Connective { connective, args } => match args.as_slice() {
            [] => kw(connective.to_string()),
            [a] => op(connective.to_string())
                .append(RcDoc::space())
                .append(long_sentence_doc(a, depth)),
            [a, b, ..] => long_sentence_doc(a, depth)
                .append(RcDoc::space())
                .append(op(connective.to_string()))
                .append(RcDoc::line())
                .append(long_sentence_doc(b, depth))
                .group(),
        },
        SentenceKind::Quantifier {
            quantifier,
            variable,
            body,
        } => kw(quantifier.to_string())
            .append(RcDoc::space())
            .append(ident(variable.name()))
            .append(punct(":"))
            .append(RcDoc::line())
            .append(long_sentence_doc(body, depth))
            .group()
            .nest(2),
    }
}

fn long_sentence_doc(sentence: &Sentence, depth: u8) -> RcDoc<'static, Style> {
    parenthesized(sentence.long_text() != sentence.short_text(), depth, |d| {
        sentence_doc(sentence, d)
    })
}

fn environment_doc(environment: &Environment) -> RcDoc<'static, Style> {
    if environment.is_root() {
        return kw("root environment");
    }

    // runs of consecutive assuming / letting frames share one keyword
    let mut runs: Vec<Vec<&Assumption>> = Vec::new();
    for frame in environment.frames() {
        let continues = runs.last().and_then(|run| run.last()).is_some_and(|last| {
            last.kind() == frame.kind() && frame.kind() != AssumptionKind::Setting
        });
        match runs.last_mut() {
            Some(run) if continues => run.push(frame),
            _ => runs.push(vec![frame]),
        }
    }

    comma_list(runs.into_iter().map(|run| match run.as_slice() {
        [Assumption::Setting(v, s)] => kw("setting")
            .append(RcDoc::space())
            .append(ident(v.name()))
            .append(RcDoc::space())
            .append(kw("s.t."))
            .append(RcDoc::space())
            .append(sentence_doc(s, 0)),
        [Assumption::Letting(_), ..] => kw("letting")
            .append(RcDoc::space())
            .append(comma_list(
                run.iter()
                    .filter_map(|frame| frame.variable())
                    .map(|v| ident(v.name())),
            ))
            .append(RcDoc::space())
            .append(kw("be arbitrary")),
        _ => kw("assuming").append(RcDoc::space()).append(comma_list(
            run.iter()
                .filter_map(|frame| frame.sentence())
                .map(|s| sentence_doc(s, 0)),
        )),
    }))
}

fn bracketed(environment: &Environment) -> RcDoc<'static, Style> {
    punct("[")
        .append(environment_doc(environment))
        .append(punct("]"))
}

fn context_doc(context: &Context) -> RcDoc<'static, Style> {
    match context {
        Context::Formula(s) => kw("formula")
            .append(RcDoc::space())
            .append(punct("\""))
            .append(sentence_doc(s, 0))
            .append(punct("\"")),
        Context::Term(t) => kw("term")
            .append(RcDoc::space())
            .append(punct("\""))
            .append(term_doc(t, 0))
            .append(punct("\"")),
        Context::Environment(e) => bracketed(e),
        Context::Fact {
            sentence,
            environment,
        } if environment.is_root() => sentence_doc(sentence, 0),
        Context::Fact {
            sentence,
            environment,
        } => sentence_doc(sentence, 0)
            .append(RcDoc::line())
            .append(bracketed(environment))
            .group(),
    }
}

// A writer that maps Style annotations to termcolor ColorSpec on a WriteColor sink.
struct ColorWriter<'w, W: WriteColor + Write> {
    out: &'w mut W,
}

impl<'a, 'w, W: WriteColor + Write> RenderAnnotated<'a, Style> for ColorWriter<'w, W> {
    fn push_annotation(&mut self, ann: &'a Style) -> io::Result<()> {
        self.out.set_color(&ann.to_color_spec())
    }
    fn pop_annotation(&mut self) -> io::Result<()> {
        self.out.reset()
    }
}

impl<'w, W: WriteColor + Write> pretty::Render for ColorWriter<'w, W> {
    type Error = io::Error;
    fn write_str(&mut self, s: &str) -> io::Result<usize> {
        self.out.write_all(s.as_bytes())?;
        Ok(s.len())
    }
    fn write_str_all(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }
    fn fail_doc(&self) -> Self::Error {
        io::Error::other("render failed")
    }
}

/// Render a document to a `termcolor::WriteColor` with width-aware layout.
fn render_to<W: WriteColor + Write>(
    doc: &RcDoc<'_, Style>,
    width: usize,
    out: &mut W,
) -> io::Result<()> {
    let mut cw = ColorWriter { out };
    doc.render_raw(width, &mut cw)
}

/// Width of the terminal, or 80 if it cannot be determined.
fn terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Pretty-printing conveniences for sentences, terms, environments and contexts.
pub trait PrettyNode {
    /// Build an RcDoc representation with style annotations.
    fn pretty_doc(&self) -> RcDoc<'static, Style>;

    /// Render with colors to any termcolor writer at the given width.
    fn pretty_render_to<W: WriteColor + Write>(&self, width: usize, out: &mut W) -> io::Result<()> {
        render_to(&self.pretty_doc(), width, out)
    }

    /// Print to stdout with colors (TTY-aware), at auto-detected width (or 80 if not a TTY).
    fn pretty_print(&self) -> io::Result<()> {
        let stdout = StandardStream::stdout(ColorChoice::Auto);
        let mut stdout = stdout.lock();
        self.pretty_render_to(terminal_width(), &mut stdout)?;
        writeln!(stdout)
    }

    /// Plain string (no colors) at the given width.
    fn pretty_string_width(&self, width: usize) -> String {
        self.pretty_doc().pretty(width).to_string()
    }

    /// Plain string (no colors); equal to the canonical display text.
    fn pretty_string(&self) -> String {
        self.pretty_string_width(UNBOUNDED_WIDTH)
    }
}

impl PrettyNode for Term {
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        term_doc(self, 0)
    }
}

impl PrettyNode for Sentence {
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        sentence_doc(self, 0)
    }
}

impl PrettyNode for Environment {
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        environment_doc(self)
    }
}

impl PrettyNode for Context {
    fn pretty_doc(&self) -> RcDoc<'static, Style> {
        context_doc(self)
    }
}
