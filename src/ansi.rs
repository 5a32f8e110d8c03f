//! Conversion of ANSI terminal escapes into styled text runs.
//!
//! Only SGR sequences (`ESC [ ... m`) carry styling; every other escape
//! (cursor movement, OSC titles, charset selection) is dropped. The output is
//! plain text plus a [`Style`] per run, which the renderer turns into inline
//! CSS on escaped text nodes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Group 1 captures the parameter list of SGR sequences; the other branches
/// match escapes that are stripped.
static ESCAPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\x1b\[([0-9;]*)m",        // SGR
        r"|\x1b\[[0-9;?]*[A-Za-z]", // other CSI
        r"|\x1b\][^\x07]*\x07",     // OSC ending with BEL
        r"|\x1b\][^\x1b]*\x1b\\",   // OSC ending with ST
        r"|\x1b\][^\x07\x1b]*",     // unterminated OSC
        r"|\x1b[()][A-Z0-9]",       // charset selection
        r"|\x1b[=>MNOP78]",         // single-char escapes
        r"|\x1b",                   // stray ESC
    ))
    .expect("escape pattern is valid")
});

/// xterm-style palette for the 16 basic colors.
const BASE_PALETTE: [&str; 16] = [
    "#000", "#A00", "#0A0", "#A50", "#00A", "#A0A", "#0AA", "#AAA", "#555", "#F55", "#5F5",
    "#FF5", "#55F", "#F5F", "#5FF", "#FFF",
];

const DEFAULT_FG: Color = Color::Indexed(15);
const DEFAULT_BG: Color = Color::Indexed(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Index into the 256-color palette.
    Indexed(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    pub fn to_css(self) -> String {
        match self {
            Color::Indexed(index @ 0..=15) => BASE_PALETTE[usize::from(index)].to_string(),
            Color::Indexed(index @ 16..=231) => {
                let offset = index - 16;
                let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
                format!(
                    "#{:02x}{:02x}{:02x}",
                    level(offset / 36),
                    level((offset / 6) % 6),
                    level(offset % 6)
                )
            }
            Color::Indexed(index) => {
                let gray = 8 + (index - 232) * 10;
                format!("#{gray:02x}{gray:02x}{gray:02x}")
            }
            Color::Rgb(r, g, b) => format!("#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub faint: bool,
    pub italic: bool,
    pub underline: bool,
    pub blink: bool,
    pub inverse: bool,
    pub hidden: bool,
    pub strikethrough: bool,
}

impl Style {
    pub fn is_plain(&self) -> bool {
        *self == Style::default()
    }

    /// Applies one SGR parameter list. An empty list is a reset.
    fn apply_sgr(&mut self, params: &[u16]) {
        if params.is_empty() {
            *self = Style::default();
            return;
        }
        let mut iter = params.iter().copied();
        while let Some(code) = iter.next() {
            match code {
                0 => *self = Style::default(),
                1 => self.bold = true,
                2 => self.faint = true,
                3 => self.italic = true,
                4 => self.underline = true,
                5 | 6 => self.blink = true,
                7 => self.inverse = true,
                8 => self.hidden = true,
                9 => self.strikethrough = true,
                22 => {
                    self.bold = false;
                    self.faint = false;
                }
                23 => self.italic = false,
                24 => self.underline = false,
                25 => self.blink = false,
                27 => self.inverse = false,
                28 => self.hidden = false,
                29 => self.strikethrough = false,
                30..=37 => self.fg = Some(Color::Indexed((code - 30) as u8)),
                38 => {
                    if let Some(color) = extended_color(&mut iter) {
                        self.fg = Some(color);
                    }
                }
                39 => self.fg = None,
                40..=47 => self.bg = Some(Color::Indexed((code - 40) as u8)),
                48 => {
                    if let Some(color) = extended_color(&mut iter) {
                        self.bg = Some(color);
                    }
                }
                49 => self.bg = None,
                90..=97 => self.fg = Some(Color::Indexed((code - 90 + 8) as u8)),
                100..=107 => self.bg = Some(Color::Indexed((code - 100 + 8) as u8)),
                _ => {}
            }
        }
    }

    /// Inline CSS declarations for this style; empty for the default style.
    pub fn to_css(&self) -> String {
        let (fg, bg) = if self.inverse {
            (
                Some(self.bg.unwrap_or(DEFAULT_BG)),
                Some(self.fg.unwrap_or(DEFAULT_FG)),
            )
        } else {
            (self.fg, self.bg)
        };

        let mut decls = Vec::new();
        if let Some(color) = fg {
            decls.push(format!("color:{}", color.to_css()));
        }
        if let Some(color) = bg {
            decls.push(format!("background-color:{}", color.to_css()));
        }
        if self.bold {
            decls.push("font-weight:bold".to_string());
        }
        if self.faint {
            decls.push("opacity:0.5".to_string());
        }
        if self.italic {
            decls.push("font-style:italic".to_string());
        }

        let decorations: Vec<&str> = [
            (self.underline, "underline"),
            (self.strikethrough, "line-through"),
            (self.blink, "blink"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();
        if !decorations.is_empty() {
            decls.push(format!("text-decoration:{}", decorations.join(" ")));
        }

        if self.hidden {
            decls.push("visibility:hidden".to_string());
        }
        decls.join(";")
    }
}

/// Reads the tail of a `38`/`48` sequence: `5;n` or `2;r;g;b`.
fn extended_color(iter: &mut impl Iterator<Item = u16>) -> Option<Color> {
    match iter.next()? {
        5 => iter.next().map(|n| Color::Indexed(clamp_u8(n))),
        2 => {
            let r = iter.next()?;
            let g = iter.next()?;
            let b = iter.next()?;
            Some(Color::Rgb(clamp_u8(r), clamp_u8(g), clamp_u8(b)))
        }
        _ => None,
    }
}

fn clamp_u8(value: u16) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

fn parse_params(raw: &str) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(';')
        .map(|p| p.parse::<u16>().unwrap_or(0))
        .collect()
}

/// Splits `input` into styled runs. Adjacent runs with the same style are
/// merged and empty runs are omitted.
pub fn parse(input: &str) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    let mut style = Style::default();
    let mut cursor = 0;

    for caps in ESCAPE_REGEX.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        push_run(&mut spans, &input[cursor..whole.start()], style);
        if let Some(params) = caps.get(1) {
            style.apply_sgr(&parse_params(params.as_str()));
        }
        cursor = whole.end();
    }
    push_run(&mut spans, &input[cursor..], style);
    spans
}

fn push_run(spans: &mut Vec<Span>, text: &str, style: Style) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => spans.push(Span {
            text: text.to_string(),
            style,
        }),
    }
}
