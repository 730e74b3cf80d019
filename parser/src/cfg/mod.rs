//! This parses the chordtap configuration file into the per-modifier action tables and the
//! active-function registry.
//!
//! The file is line oriented. Blank lines and lines starting with `#` are skipped. Every other
//! line binds one chord of one modifier table:
//!
//! ```text
//! # modifier   chord        value
//!              0x01       = a
//!   Shift      0x01       = A
//!   Ctrl+Shift 0b00000011 = "two words"
//!              0x03       = F1
//!   Alt        0x0f       = Console(2)
//!              0x30       = Exec(date > /dev/tty1)
//! ```
//!
//! The modifier keyword is resolved with [`resolve_modifier_keyword`], so it may be abbreviated
//! (`Sh 0x01`) and is omitted for the no-modifier table. The chord is a byte in
//! hex, binary or decimal. The value is, in order of precedence: a built-in function call, a
//! special key name from [`crate::keys`], a quoted string or a bare string. Strings may contain
//! escapes, see [`unescape`].

mod error;
pub use error::*;

mod str_ext;
pub use str_ext::*;


use anyhow::anyhow;
use std::path::Path;

use crate::action::Action;
use crate::functions::*;
use crate::keys::str_to_escape;
use crate::tables::*;

// local log prefix
const LP: &str = "cfg:";

/// Everything the configuration file defines.
#[derive(Debug, Default, Clone)]
pub struct Cfg {
    /// One action table per modifier selector.
    pub tables: ActionTables,
    /// Functions referenced by `Invoke` actions in `tables`.
    pub functions: FunctionRegistry,
}

pub fn new_from_file(p: &Path) -> MResult<Cfg> {
    let text = std::fs::read_to_string(p)
        .map_err(|e| anyhow!("failed to read config file {}: {e}", p.display()))
        .map_err(|e| error_with_source(e.into()))?;
    parse_cfg_raw_string(&text, &p.to_string_lossy()).map_err(error_with_source)
}

pub fn new_from_str(cfg_text: &str) -> MResult<Cfg> {
    parse_cfg_raw_string(cfg_text, "configuration").map_err(error_with_source)
}

/// Location of the line being parsed, used for error spans.
pub(crate) struct LineCtx<'a> {
    /// 1-based line number.
    pub(crate) number: usize,
    /// Byte offset of the line within the file.
    pub(crate) start: usize,
    pub(crate) file_name: &'a str,
    pub(crate) file_content: &'a str,
}

fn parse_cfg_raw_string(text: &str, file_name: &str) -> Result<Cfg> {
    let mut cfg = Cfg::default();
    let mut offset = 0;
    for (i, raw_line) in text.split_inclusive('\n').enumerate() {
        let start = offset;
        offset += raw_line.len();
        let line = raw_line.trim_end_matches(['\n', '\r']);
        let content = line.trim_start();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }
        let ctx = LineCtx {
            number: i + 1,
            start,
            file_name,
            file_content: text,
        };
        parse_line(line, &ctx, &mut cfg)?;
    }
    let bindings: usize = ModSelector::ALL
        .iter()
        .map(|sel| cfg.tables.table(*sel).populated())
        .sum();
    log::info!(
        "{LP} loaded {bindings} chord bindings, {} of them bound to functions",
        cfg.functions.len()
    );
    Ok(cfg)
}

fn parse_line(line: &str, ctx: &LineCtx, cfg: &mut Cfg) -> Result<()> {
    let Some(eq) = line.find('=') else {
        return Err(error_in_line(
            ctx,
            0..line.len(),
            "expected `<chord> = <value>`",
        ));
    };
    let (keyword, code) = parse_lhs(&line[..eq]).map_err(|msg| error_in_line(ctx, 0..eq, msg))?;
    let Some(table) = cfg.tables.table_for_keyword_mut(keyword) else {
        return Err(error_in_line(
            ctx,
            0..eq,
            format!(
                "`{keyword}` is not a modifier; expected Shift, Numeric, Function, \
                 Control (Ctrl), Alt (Meta), Ctrl+Shift or an abbreviation of one"
            ),
        ));
    };

    let rhs = &line[eq + 1..];
    let value = rhs.trim();
    let value_start = eq + 1 + (rhs.len() - rhs.trim_start().len());
    let value_range = if value.is_empty() {
        eq..eq + 1
    } else {
        value_start..value_start + value.len()
    };

    let action = match parse_value(value).map_err(|msg| error_in_line(ctx, value_range.clone(), msg))? {
        ParsedValue::Bytes(bytes) => Action::from_bytes(bytes)
            .ok_or_else(|| error_in_line(ctx, value_range, "value produces no bytes"))?,
        ParsedValue::Function(kind, arg) => match cfg.functions.register(kind, arg.as_str()) {
            Ok(idx) => Action::Invoke(idx),
            Err(e) => {
                log::warn!(
                    "{LP} line {}: {e}, dropping {}({arg})",
                    ctx.number,
                    kind.name()
                );
                return Ok(());
            }
        },
    };
    log::trace!("{LP} `{keyword}` {code:#04x} => {action:?}");
    if let Some(prev) = table.set(code, action) {
        log::warn!(
            "{LP} line {}: chord {code:#04x} in the `{keyword}` table was already bound to \
             {prev:?}, the later binding wins",
            ctx.number
        );
    }
    Ok(())
}

/// Split `[modifier] <chord>` into the modifier keyword, empty when absent, and the chord code.
fn parse_lhs(lhs: &str) -> std::result::Result<(&str, u8), String> {
    let mut tokens = lhs.split_whitespace();
    let (keyword, chord) = match (tokens.next(), tokens.next(), tokens.next()) {
        (None, _, _) => return Err("missing chord before `=`".into()),
        (Some(chord), None, _) => ("", chord),
        (Some(keyword), Some(chord), None) => (keyword, chord),
        (Some(_), Some(_), Some(_)) => {
            return Err("expected `[modifier] <chord>` before `=`".into());
        }
    };
    match parse_chord(chord) {
        Some(code) => Ok((keyword, code)),
        None => Err(format!(
            "`{chord}` is not a chord; expected a number from 0 to 255 \
             written in hex (0x03), binary (0b00000011) or decimal (3)"
        )),
    }
}

/// Parse a chord code written in hex, binary or decimal.
pub fn parse_chord(s: &str) -> Option<u8> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        u8::from_str_radix(bin, 2).ok()
    } else {
        s.parse::<u8>().ok()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ParsedValue {
    Bytes(Vec<u8>),
    Function(FnKind, String),
}

fn parse_value(value: &str) -> std::result::Result<ParsedValue, String> {
    if value.is_empty() {
        return Err("missing value after `=`".into());
    }
    if let Some((kind, arg)) = parse_function_call(value) {
        return Ok(ParsedValue::Function(kind, arg.to_string()));
    }
    if let Some(seq) = str_to_escape(value) {
        return Ok(ParsedValue::Bytes(seq.to_vec()));
    }
    let text = value.trim_value_quotes().unwrap_or(value);
    unescape(text).map(ParsedValue::Bytes)
}

/// Recognize `Name(argument)` where `Name` is a built-in function.
fn parse_function_call(value: &str) -> Option<(FnKind, &str)> {
    let (name, rest) = value.split_once('(')?;
    let arg = rest.strip_suffix(')')?;
    let kind = FnKind::from_name(name.trim())?;
    Some((kind, arg.trim()))
}
