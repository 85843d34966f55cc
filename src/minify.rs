//! Lightweight artifact minification
//!
//! Pure deletion transforms: comments and insignificant whitespace are
//! removed, nothing is renamed or re-parsed. Output length therefore never
//! exceeds input length for well-formed input. Structural minification
//! (mangling, constant folding) belongs to the external toolchain.

/// Strip comments and blank lines from script text.
///
/// String, template-literal, and regex-literal contents are preserved
/// verbatim. Newlines are kept so automatic-semicolon-insertion behavior is
/// unchanged.
pub fn minify_js(code: &str) -> String {
    #[derive(Clone, Copy)]
    enum State {
        Normal,
        Quoted(char),
        Template,
        Regex { in_class: bool },
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(code.len());
    let mut state = State::Normal;
    // Last significant char, to tell a regex literal from division
    let mut last_significant: Option<char> = None;
    // Trailing identifier, so `/` after `return`, `typeof` etc. reads as a
    // regex literal rather than division
    let mut word = String::new();
    let mut word_done = false;
    // Start of the current line in `out`, for blank-line dropping
    let mut line_start = 0usize;
    let mut chars = code.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Normal => match c {
                '\n' => {
                    word_done = !word.is_empty();
                    if out[line_start..].trim().is_empty() {
                        // Line held only whitespace or removed comments
                        out.truncate(line_start);
                    } else {
                        out.push('\n');
                        line_start = out.len();
                    }
                }
                '"' | '\'' => {
                    state = State::Quoted(c);
                    out.push(c);
                    last_significant = Some(c);
                    word.clear();
                }
                '`' => {
                    state = State::Template;
                    out.push(c);
                    last_significant = Some(c);
                    word.clear();
                }
                '/' => match chars.peek() {
                    Some('/') => {
                        chars.next();
                        state = State::LineComment;
                    }
                    Some('*') => {
                        chars.next();
                        state = State::BlockComment;
                    }
                    _ => {
                        if regex_can_follow(last_significant) || regex_after_keyword(&word) {
                            state = State::Regex { in_class: false };
                        }
                        out.push(c);
                        last_significant = Some(c);
                        word.clear();
                    }
                },
                _ => {
                    out.push(c);
                    if c.is_alphanumeric() || c == '_' || c == '$' {
                        if word_done {
                            word.clear();
                            word_done = false;
                        }
                        word.push(c);
                        last_significant = Some(c);
                    } else if c.is_whitespace() {
                        word_done = !word.is_empty();
                    } else {
                        word.clear();
                        word_done = false;
                        last_significant = Some(c);
                    }
                }
            },
            State::Quoted(quote) => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == quote {
                    state = State::Normal;
                }
            }
            State::Template => {
                out.push(c);
                if c == '\n' {
                    // Template content is verbatim; the line is never blank-checked
                    line_start = out.len();
                } else if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == '`' {
                    state = State::Normal;
                }
            }
            State::Regex { in_class } => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == '[' {
                    state = State::Regex { in_class: true };
                } else if c == ']' && in_class {
                    state = State::Regex { in_class: false };
                } else if c == '/' && !in_class {
                    state = State::Normal;
                    last_significant = Some(c);
                }
            }
            State::LineComment => {
                if c == '\n' {
                    state = State::Normal;
                    if out[line_start..].trim().is_empty() {
                        out.truncate(line_start);
                    } else {
                        out.push('\n');
                        line_start = out.len();
                    }
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Normal;
                }
            }
        }
    }
    out
}

/// Keywords after which a `/` begins a regex literal even though the
/// preceding significant char is an identifier char.
fn regex_after_keyword(word: &str) -> bool {
    matches!(
        word,
        "return"
            | "typeof"
            | "instanceof"
            | "case"
            | "delete"
            | "void"
            | "in"
            | "of"
            | "do"
            | "else"
            | "new"
            | "throw"
            | "yield"
            | "await"
    )
}

fn regex_can_follow(last: Option<char>) -> bool {
    match last {
        None => true,
        Some(c) => matches!(
            c,
            '(' | '[' | '{' | ',' | ';' | ':' | '=' | '!' | '&' | '|' | '?' | '+' | '-' | '*'
                | '%' | '~' | '^' | '<' | '>'
        ),
    }
}

/// Strip comments and collapse whitespace in stylesheet text.
pub fn minify_css(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut chars = css.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            c if c.is_whitespace() => {
                // Collapse runs; drop entirely next to structural tokens
                while chars.peek().is_some_and(|n| n.is_whitespace()) {
                    chars.next();
                }
                let next = chars.peek().copied();
                let prev = out.chars().last();
                let droppable = |c: Option<char>| {
                    matches!(
                        c,
                        None | Some('{') | Some('}') | Some(';') | Some(',') | Some(' ')
                    )
                };
                if !droppable(prev) && !matches!(next, None | Some('{') | Some('}')) {
                    out.push(' ');
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Strip comments and inter-tag whitespace from markup text.
pub fn minify_xml(xml: &str) -> String {
    let without_comments = strip_xml_comments(xml);
    let mut out = String::with_capacity(without_comments.len());
    for line in without_comments.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        // Lines are glued when a tag ends and the next begins
        if !(out.ends_with('>') && trimmed.starts_with('<')) && !out.is_empty() {
            out.push(' ');
        }
        out.push_str(trimmed);
    }
    out
}

fn strip_xml_comments(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;
    while let Some(start) = rest.find("<!--") {
        out.push_str(&rest[..start]);
        match rest[start..].find("-->") {
            Some(end) => rest = &rest[start + end + 3..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Minify an auxiliary asset by file extension; unknown kinds are copied
/// verbatim.
pub fn minify_asset(content: &str, extension: &str) -> String {
    match extension {
        ".js" => minify_js(content),
        ".css" | ".acss" | ".wxss" => minify_css(content),
        ".xml" | ".axml" | ".wxml" | ".ux" => minify_xml(content),
        _ => content.to_string(),
    }
}
