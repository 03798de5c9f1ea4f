//! Recorded event scripts: a line-oriented text form of host events.
//!
//! Scripts let a session captured from a live map be replayed against an
//! engine. The grammar lives in `events.pest`.

use miette::{NamedSource, SourceSpan};
use pest::Parser;
use pest::error::{ErrorVariant, InputLocation};
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;

use crate::engine::{AnnotationEngine, Event};
use crate::errors::ScriptError;
use crate::host::Host;
use crate::log;
use crate::types::{MapPoint, SpatialRef, Tool, Unit, finite};

#[derive(Parser)]
#[grammar = "events.pest"]
struct EventScriptParser;

/// Parse a script into events. `name` is used in diagnostics only.
pub fn parse(name: &str, source: &str) -> Result<Vec<Event>, ScriptError> {
    let ctx = Ctx { name, source };
    let pairs = EventScriptParser::parse(Rule::script, source).map_err(|e| ctx.syntax_error(e))?;

    let mut events = Vec::new();
    for pair in pairs.flat_map(|script| script.into_inner()) {
        let event = match pair.as_rule() {
            Rule::session => {
                let end = pair.as_span().end();
                let mut inner = pair.into_inner();
                let unit = ctx.unit(ctx.take(&mut inner, "unit name", end)?)?;
                Event::SessionStart { unit }
            }
            Rule::cursor => {
                let end = pair.as_span().end();
                let mut inner = pair.into_inner();
                let point = ctx.point(ctx.take(&mut inner, "point", end)?)?;
                Event::CursorMoved { point }
            }
            Rule::segment => {
                let end = pair.as_span().end();
                let mut inner = pair.into_inner();
                let point = ctx.point(ctx.take(&mut inner, "point", end)?)?;
                let total = ctx.number(ctx.take(&mut inner, "total length", end)?)?;
                let tool = match inner.next() {
                    Some(word) => ctx.tool(word)?,
                    None => Tool::Distance,
                };
                Event::SegmentCompleted { point, total, tool }
            }
            Rule::unit_changed => {
                let end = pair.as_span().end();
                let mut inner = pair.into_inner();
                let unit = ctx.unit(ctx.take(&mut inner, "unit name", end)?)?;
                Event::UnitChanged { unit }
            }
            Rule::tool_changed => Event::ToolChanged,
            _ => continue,
        };
        events.push(event);
    }

    log::debug!(name, events = events.len(), "parsed event script");
    Ok(events)
}

/// Feed `events` to `engine` in order.
pub fn replay(engine: &mut AnnotationEngine, events: &[Event], host: &mut dyn Host) {
    for &event in events {
        log::trace!(?event, "replaying");
        engine.dispatch(event, host);
    }
}

/// Parse `source` and replay it.
pub fn run(
    engine: &mut AnnotationEngine,
    name: &str,
    source: &str,
    host: &mut dyn Host,
) -> Result<(), ScriptError> {
    let events = parse(name, source)?;
    replay(engine, &events, host);
    Ok(())
}

/// Source being parsed, for building diagnostics
struct Ctx<'a> {
    name: &'a str,
    source: &'a str,
}

impl Ctx<'_> {
    fn src(&self) -> NamedSource<String> {
        NamedSource::new(self.name, self.source.to_string())
    }

    fn span(pair: &Pair<'_, Rule>) -> SourceSpan {
        let span = pair.as_span();
        (span.start(), span.end() - span.start()).into()
    }

    fn syntax_error(&self, error: pest::error::Error<Rule>) -> ScriptError {
        let (offset, len) = match error.location {
            InputLocation::Pos(pos) => (pos, 0),
            InputLocation::Span((start, end)) => (start, end - start),
        };
        let expected = match &error.variant {
            ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => positives
                .iter()
                .map(|rule| describe(*rule))
                .collect::<Vec<_>>()
                .join(", "),
            ErrorVariant::ParsingError { .. } => "an event".to_string(),
            ErrorVariant::CustomError { message } => message.clone(),
        };
        ScriptError::Syntax { expected, src: self.src(), span: (offset, len).into() }
    }

    /// Next inner pair; the grammar guarantees it, so absence is reported at `at`.
    fn take<'i>(&self, inner: &mut Pairs<'i, Rule>, what: &str, at: usize) -> Result<Pair<'i, Rule>, ScriptError> {
        inner.next().ok_or_else(|| ScriptError::Syntax {
            expected: what.to_string(),
            src: self.src(),
            span: (at, 0).into(),
        })
    }

    fn number(&self, pair: Pair<'_, Rule>) -> Result<f64, ScriptError> {
        let invalid = |reason: String| ScriptError::InvalidNumber {
            reason,
            src: self.src(),
            span: Self::span(&pair),
        };
        let value: f64 = pair.as_str().parse().map_err(|e: std::num::ParseFloatError| invalid(e.to_string()))?;
        finite(value).map_err(|e| invalid(e.to_string()))
    }

    fn point(&self, pair: Pair<'_, Rule>) -> Result<MapPoint, ScriptError> {
        let end = pair.as_span().end();
        let mut inner = pair.into_inner();
        let x = self.number(self.take(&mut inner, "x coordinate", end)?)?;
        let y = self.number(self.take(&mut inner, "y coordinate", end)?)?;
        let spatial_ref = match inner.next() {
            Some(wkid) => {
                let id = self.take(&mut wkid.into_inner(), "wkid", end)?;
                let value = id.as_str().parse::<u32>().map_err(|e| ScriptError::InvalidNumber {
                    reason: e.to_string(),
                    src: self.src(),
                    span: Self::span(&id),
                })?;
                SpatialRef::wkid(value)
            }
            None => SpatialRef::UNKNOWN,
        };
        Ok(MapPoint { x, y, spatial_ref })
    }

    fn unit(&self, pair: Pair<'_, Rule>) -> Result<Unit, ScriptError> {
        pair.as_str().parse().map_err(|_| ScriptError::UnknownUnit {
            name: pair.as_str().to_string(),
            src: self.src(),
            span: Self::span(&pair),
        })
    }

    fn tool(&self, pair: Pair<'_, Rule>) -> Result<Tool, ScriptError> {
        Tool::from_name(pair.as_str()).ok_or_else(|| ScriptError::UnknownTool {
            name: pair.as_str().to_string(),
            src: self.src(),
            span: Self::span(&pair),
        })
    }
}

fn describe(rule: Rule) -> &'static str {
    match rule {
        Rule::number => "a number",
        Rule::integer => "an integer",
        Rule::word => "a name",
        Rule::wkid => "a spatial reference",
        Rule::point => "a point",
        Rule::session | Rule::cursor | Rule::segment | Rule::unit_changed | Rule::tool_changed => "an event",
        Rule::script => "a script",
        Rule::EOI => "end of input",
        _ => "input",
    }
}
