//! Signature text parsing.
//!
//! Slots keep the signature of the callable they wrap, e.g.
//! `(self, todo_id: str, quiet: bool = False) -> Todo`. Annotations may
//! contain commas, colons and `=` inside brackets or string literals, so
//! every split here happens at bracket depth zero.

/// A parameter read from signature text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParam {
    pub name: String,
    pub annotation: Option<String>,
}

/// Parameters (without `self`) and return annotation of a callable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub parameters: Vec<SignatureParam>,
    pub return_annotation: Option<String>,
}

/// Parses `(params) -> ret`. Defaults are removed, `self` is removed only
/// in first position, and the bare `*` / `/` markers as well as variadic
/// parameters are dropped.
pub fn parse_signature(text: &str) -> Signature {
    let text = text.trim();
    let (params_text, rest) = match split_parenthesized(text) {
        Some(parts) => parts,
        None => (text, ""),
    };

    let return_annotation = rest
        .trim()
        .strip_prefix("->")
        .map(str::trim)
        .filter(|ret| !ret.is_empty())
        .map(str::to_string);

    let mut parameters = Vec::new();
    for (index, raw) in split_top_level(params_text, ',').into_iter().enumerate() {
        let without_default = split_top_level(raw, '=').into_iter().next().unwrap_or("");
        let (name, annotation) = match split_once_top_level(without_default, ':') {
            Some((name, annotation)) => (name.trim(), Some(annotation.trim())),
            None => (without_default.trim(), None),
        };

        if name.is_empty() || name.starts_with('*') || name == "/" {
            continue;
        }
        if index == 0 && name == "self" {
            continue;
        }

        parameters.push(SignatureParam {
            name: name.to_string(),
            annotation: annotation.filter(|a| !a.is_empty()).map(str::to_string),
        });
    }

    Signature {
        parameters,
        return_annotation,
    }
}

/// Splits `(inner) rest` at the parenthesis matching the first `(`.
fn split_parenthesized(text: &str) -> Option<(&str, &str)> {
    let open = text.find('(')?;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in text.char_indices().skip_while(|(i, _)| *i < open) {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some((&text[open + 1..i], &text[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Byte offsets of every `sep` outside brackets and quotes.
fn top_level_positions(text: &str, sep: char) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => positions.push(i),
            _ => {}
        }
    }
    positions
}

/// Splits on `sep` wherever it appears outside brackets and quotes.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for i in top_level_positions(text, sep) {
        parts.push(&text[start..i]);
        start = i + sep.len_utf8();
    }
    parts.push(&text[start..]);

    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

fn split_once_top_level(text: &str, sep: char) -> Option<(&str, &str)> {
    let i = *top_level_positions(text, sep).first()?;
    Some((&text[..i], &text[i + sep.len_utf8()..]))
}
