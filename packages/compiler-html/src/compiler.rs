use crate::theme::Theme;
use sitecraft_parser::{Element, Serializer};

/// Options for HTML export
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Document title
    pub title: String,
    /// Keep `data-node-id` attributes (required for rule-table selectors)
    pub include_ids: bool,
    /// Pretty print the boilerplate
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            title: "My Website".to_string(),
            include_ids: true,
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

struct Context {
    options: CompileOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    fn new(options: CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    /// Add multi-line text, indenting every non-empty line
    fn add_block(&mut self, text: &str) {
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            self.add_line(line);
        }
    }

    fn add_indent(&mut self) {
        let indent = self.options.indent.clone();
        for _ in 0..self.depth {
            self.add(&indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Theme-derived base rules shared by export and the live canvas
pub fn base_css(theme: &Theme) -> String {
    let accent = theme.to_hex();
    let hover = theme.hover().to_hex();

    [
        "body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; padding: 20px; max-width: 1200px; margin: 0 auto; color: #333; }".to_string(),
        format!("button, .btn {{ background: {}; color: white; padding: 12px 20px; border: none; border-radius: 6px; cursor: pointer; display: inline-block; text-decoration: none; font-weight: 600; transition: background 0.3s; }}", accent),
        format!("button:hover, .btn:hover {{ background: {}; }}", hover),
        format!("h1, h2, h3, h4, h5, h6 {{ color: {}; margin-top: 0; }}", accent),
        "img { max-width: 100%; height: auto; }".to_string(),
        format!("a {{ color: {}; text-decoration: none; }}", accent),
        "a.btn { color: white; }".to_string(),
        "a:hover { text-decoration: underline; }".to_string(),
    ]
    .join("\n")
}

/// Compile the document root, the accumulated rule text and the theme into a
/// standalone HTML document.
///
/// Output depends only on the inputs: the same tree, rules and theme always
/// produce byte-identical documents.
pub fn compile_to_html(
    root: &Element,
    rules_css: &str,
    theme: &Theme,
    options: CompileOptions,
) -> String {
    let serializer = if options.include_ids {
        Serializer::new()
    } else {
        Serializer::without_ids()
    };
    let body = serializer.inner_markup(root);

    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();

    compile_head(rules_css, theme, &mut ctx);

    ctx.add_line("<body>");
    ctx.indent();
    if !body.is_empty() {
        ctx.add_line(&body);
    }
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    ctx.get_output()
}

/// Keep rule text from closing the enclosing `<style>` element early
fn escape_style_text(css: &str) -> String {
    css.replace("</", "<\\/")
}

fn compile_head(rules_css: &str, theme: &Theme, ctx: &mut Context) {
    ctx.add_line("<head>");
    ctx.indent();

    let title = format!("<title>{}</title>", html_escape::encode_text(&ctx.options.title));
    ctx.add_line(&title);
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");

    ctx.add_line("<style>");
    ctx.indent();
    ctx.add_block(&base_css(theme));
    ctx.add_block(&escape_style_text(rules_css));
    ctx.dedent();
    ctx.add_line("</style>");

    ctx.dedent();
    ctx.add_line("</head>");
}
