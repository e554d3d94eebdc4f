//! Text form of event-sheet rows.
//!
//! A row reads `Cond(a=1) AND Cond2(b=x) => Act(c=(255,0,0)), Act2()`. The
//! editor shows rows this way and parses what the user types back into
//! [`EventData`]. Values that would be ambiguous are written in double quotes
//! with `\"` and `\\` escapes.

use super::types::{ClauseData, EventData, Params};
use crate::core::{EngineError, Result};
use std::fmt;

const AND: &str = " AND ";
const ARROW: &str = "=>";

impl fmt::Display for ClauseData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", quote_key(key), quote_if_needed(value))?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for EventData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.conditions_text(), ARROW, self.actions_text())
    }
}

impl EventData {
    /// Conditions joined with ` AND `.
    pub fn conditions_text(&self) -> String {
        join(&self.conditions, AND)
    }

    /// Actions joined with `, `.
    pub fn actions_text(&self) -> String {
        join(&self.actions, ", ")
    }
}

fn join(clauses: &[ClauseData], sep: &str) -> String {
    clauses
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

/// Parse one full row. The condition side may be empty (the row always fires).
pub fn parse_event(line: &str) -> Result<EventData> {
    let sides = split_top_level(line, ARROW)?;
    if sides.len() != 2 {
        return Err(EngineError::SheetParse(format!(
            "expected exactly one `{}` in `{}`",
            ARROW,
            line.trim()
        )));
    }

    let conditions = parse_clause_list(sides[0], AND)?;
    let actions = parse_clause_list(sides[1], ",")?;
    if actions.is_empty() {
        return Err(EngineError::SheetParse("row has no actions".to_string()));
    }
    Ok(EventData::new(conditions, actions))
}

/// Parse a single `Type(k=v, ...)` clause. A bare `Type` has no parameters.
pub fn parse_clause(text: &str) -> Result<ClauseData> {
    let text = text.trim();
    let (name, args) = match text.find('(') {
        Some(open) => {
            let inner = text[open + 1..].strip_suffix(')').ok_or_else(|| {
                EngineError::SheetParse(format!("missing `)` in `{}`", text))
            })?;
            (text[..open].trim(), inner)
        }
        None => (text, ""),
    };

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(EngineError::SheetParse(format!(
            "bad clause name `{}`",
            name
        )));
    }

    let mut params = Params::default();
    for arg in split_top_level(args, ",")? {
        let arg = arg.trim();
        if arg.is_empty() {
            continue;
        }
        let (key, value) = split_key_value(arg).ok_or_else(|| {
            EngineError::SheetParse(format!("expected key=value, got `{}`", arg))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(EngineError::SheetParse(format!("empty key in `{}`", arg)));
        }
        params.insert(&unquote(key)?, unquote(value.trim())?);
    }

    Ok(ClauseData {
        kind: name.to_string(),
        params,
    })
}

fn parse_clause_list(text: &str, sep: &str) -> Result<Vec<ClauseData>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_top_level(text, sep)?
        .into_iter()
        .map(parse_clause)
        .collect()
}

/// Split on `sep` where it appears outside quotes and parentheses.
fn split_top_level<'a>(text: &'a str, sep: &str) -> Result<Vec<&'a str>> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == b'\\' {
                escaped = true;
            } else if c == b'"' {
                in_quotes = false;
            }
            i += 1;
            continue;
        }
        match c {
            b'"' => in_quotes = true,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(EngineError::SheetParse(format!(
                        "unbalanced `)` in `{}`",
                        text.trim()
                    )));
                }
            }
            _ if depth == 0 && text.is_char_boundary(i) && text[i..].starts_with(sep) => {
                parts.push(&text[start..i]);
                i += sep.len();
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    if in_quotes {
        return Err(EngineError::SheetParse(format!(
            "unterminated quote in `{}`",
            text.trim()
        )));
    }
    if depth != 0 {
        return Err(EngineError::SheetParse(format!(
            "unbalanced `(` in `{}`",
            text.trim()
        )));
    }
    parts.push(&text[start..]);
    Ok(parts)
}

/// Split at the first `=` outside quotes, so quoted keys may contain one.
fn split_key_value(arg: &str) -> Option<(&str, &str)> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in arg.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == '=' {
            return Some((&arg[..i], &arg[i + 1..]));
        }
    }
    None
}

/// Keys follow the value rules, and must also never contain a bare `=`.
fn quote_key(key: &str) -> String {
    if key.is_empty() || key.contains(['=', '(', ')']) {
        let escaped = key.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{}\"", escaped)
    } else {
        quote_if_needed(key)
    }
}

fn quote_if_needed(value: &str) -> String {
    if needs_quotes(value) {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{}\"", escaped)
    } else {
        value.to_string()
    }
}

fn needs_quotes(value: &str) -> bool {
    if value.trim() != value || value.contains(['"', '\\']) || value.contains(ARROW) {
        return true;
    }
    let mut depth: i32 = 0;
    for c in value.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return true;
                }
            }
            ',' if depth == 0 => return true,
            _ => {}
        }
    }
    depth != 0
}

fn unquote(value: &str) -> Result<String> {
    let Some(inner) = value.strip_prefix('"') else {
        return Ok(value.to_string());
    };
    let inner = inner
        .strip_suffix('"')
        .ok_or_else(|| EngineError::SheetParse(format!("unterminated quote `{}`", value)))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => {
                    return Err(EngineError::SheetParse(format!(
                        "dangling escape in `{}`",
                        value
                    )))
                }
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_editor_columns() {
        let event = EventData::new(
            vec![
                ClauseData::new("KeyPressed").with("key", "K_RIGHT"),
                ClauseData::new("ObjectCollision")
                    .with("obj_a", "Player")
                    .with("obj_b", "Goal"),
            ],
            vec![
                ClauseData::new("ChangeObjectColor")
                    .with("obj_name", "Player")
                    .with("color_str", "(0,255,0)"),
                ClauseData::new("GoToFrame").with("frame_name", "Level2"),
            ],
        );

        assert_eq!(
            event.conditions_text(),
            "KeyPressed(key=K_RIGHT) AND ObjectCollision(obj_a=Player, obj_b=Goal)"
        );
        assert_eq!(
            event.actions_text(),
            "ChangeObjectColor(obj_name=Player, color_str=(0,255,0)), GoToFrame(frame_name=Level2)"
        );
        assert_eq!(parse_event(&event.to_string()).unwrap(), event);
    }

    #[test]
    fn test_parse_without_conditions() {
        let event = parse_event(" => SetCounterValue(counter_name=Score, value=0)").unwrap();
        assert!(event.conditions.is_empty());
        assert_eq!(event.actions[0].kind, "SetCounterValue");
        assert_eq!(event.actions[0].params.get("value"), Some("0"));
    }

    #[test]
    fn test_bare_clause_names() {
        let event = parse_event("Always => QuitGame").unwrap();
        assert_eq!(event.conditions[0].kind, "Always");
        assert!(event.actions[0].params.is_empty());
    }

    #[test]
    fn test_quoted_values_keep_commas_and_spaces() {
        let clause = ClauseData::new("SetText").with("text", "Hi, there ");
        let shown = clause.to_string();
        assert_eq!(shown, r#"SetText(text="Hi, there ")"#);
        assert_eq!(parse_clause(&shown).unwrap(), clause);

        let tricky = ClauseData::new("SetText").with("text", r#"say "go" => \o/"#);
        assert_eq!(parse_clause(&tricky.to_string()).unwrap(), tricky);
    }

    #[test]
    fn test_and_inside_value_is_not_a_separator() {
        let event = parse_event(r#"KeyPressed(key=K_a) => SetText(obj_name=T, text="A AND B")"#)
            .unwrap();
        assert_eq!(event.conditions.len(), 1);
        assert_eq!(event.actions[0].params.get("text"), Some("A AND B"));
    }

    #[test]
    fn test_awkward_keys_survive_display() {
        let clause = ClauseData::new("X")
            .with("a=b", "1")
            .with(" padded ", "2")
            .with("f(x)", "3")
            .with("k,v", "4")
            .with("plain", "a=b");
        let shown = clause.to_string();
        assert_eq!(
            shown,
            r#"X("a=b"=1, " padded "=2, "f(x)"=3, "k,v"=4, plain=a=b)"#
        );
        assert_eq!(parse_clause(&shown).unwrap(), clause);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_event("KeyPressed(key=K_a)").is_err());
        assert!(parse_event("KeyPressed(key=K_a) =>").is_err());
        assert!(parse_event("KeyPressed(key=K_a => GoToFrame()").is_err());
        assert!(parse_clause("Bad Name()").is_err());
        assert!(parse_clause("GoToFrame(frame_name)").is_err());
        assert!(parse_clause(r#"SetText(text="open)"#).is_err());
    }
}
