//! Inline `style` attribute helpers

/// Normalize a property name to CSS kebab-case (`fontSize` → `font-size`)
pub fn to_kebab_case(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") {
        return name.to_string();
    }

    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Split a declaration list on the `;` separators that sit outside quotes
/// and parentheses, so `url(data:image/png;base64,...)` stays whole
pub fn split_declarations(source: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut start = 0;
    let mut scan = Scan::default();

    for (i, ch) in source.char_indices() {
        if scan.step(ch) && ch == ';' {
            fragments.push(&source[start..i]);
            start = i + 1;
        }
    }
    fragments.push(&source[start..]);
    fragments
}

/// Whether `value` can be written as one declaration value without
/// escaping its declaration, its rule block, or an enclosing `<style>`
pub fn is_safe_value(value: &str) -> bool {
    let mut scan = Scan::default();
    for ch in value.chars() {
        if matches!(ch, '{' | '}' | '<' | '>' | '\n' | '\r') {
            return false;
        }
        if scan.step(ch) && ch == ';' {
            return false;
        }
    }
    scan.quote.is_none() && scan.depth == 0 && !scan.escaped
}

/// Quote and parenthesis state while walking a declaration list
#[derive(Default)]
struct Scan {
    quote: Option<char>,
    depth: usize,
    escaped: bool,
}

impl Scan {
    /// Feed one character; returns true when it sits at the top level
    fn step(&mut self, ch: char) -> bool {
        if self.escaped {
            self.escaped = false;
            return false;
        }
        if ch == '\\' {
            self.escaped = true;
            return false;
        }
        if let Some(q) = self.quote {
            if ch == q {
                self.quote = None;
            }
            return false;
        }
        match ch {
            '"' | '\'' => {
                self.quote = Some(ch);
                false
            }
            '(' => {
                self.depth += 1;
                false
            }
            ')' => {
                self.depth = self.depth.saturating_sub(1);
                false
            }
            _ => self.depth == 0,
        }
    }
}

/// Parse `prop: value; prop: value` into ordered pairs
///
/// Later duplicates overwrite earlier ones in place. Malformed fragments
/// without a colon are dropped.
pub fn parse_declarations(source: &str) -> Vec<(String, String)> {
    let mut declarations: Vec<(String, String)> = Vec::new();

    for fragment in split_declarations(source) {
        let Some((name, value)) = fragment.split_once(':') else {
            continue;
        };
        let name = to_kebab_case(name);
        let value = value.trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }

        match declarations.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => declarations.push((name, value.to_string())),
        }
    }

    declarations
}

/// Format ordered pairs as `prop: value; prop: value;`
pub fn format_declarations(declarations: &[(String, String)]) -> String {
    declarations
        .iter()
        .map(|(name, value)| format!("{}: {};", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}
