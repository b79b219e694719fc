//! Conversion of ANSI colored text into HTML with inline styles.
//!
//! Only SGR sequences (`ESC [ ... m`) affect the output. Every other escape
//! sequence is dropped. Line breaks are kept as they are, and no stylesheet
//! or document wrapper is produced, so the result can be embedded directly
//! into a `<pre>` element.

use std::fmt::Write as _;

const ESC: char = '\x1b';

/// The 16 base colors of the xterm scheme.
const XTERM_BASE: [(u8, u8, u8); 16] = [
    (0x00, 0x00, 0x00),
    (0xcd, 0x00, 0x00),
    (0x00, 0xcd, 0x00),
    (0xcd, 0xcd, 0x00),
    (0x00, 0x00, 0xee),
    (0xcd, 0x00, 0xcd),
    (0x00, 0xcd, 0xcd),
    (0xe5, 0xe5, 0xe5),
    (0x7f, 0x7f, 0x7f),
    (0xff, 0x00, 0x00),
    (0x00, 0xff, 0x00),
    (0xff, 0xff, 0x00),
    (0x5c, 0x5c, 0xff),
    (0xff, 0x00, 0xff),
    (0x00, 0xff, 0xff),
    (0xff, 0xff, 0xff),
];

/// Channel levels of the 6x6x6 color cube (indices 16 to 231).
const CUBE_LEVELS: [u8; 6] = [0x00, 0x5f, 0x87, 0xaf, 0xd7, 0xff];

const DEFAULT_FOREGROUND: Color = Color::Indexed(7);
const DEFAULT_BACKGROUND: Color = Color::Indexed(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Indexed(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Rgb(r, g, b) => (r, g, b),
            Color::Indexed(i) if i < 16 => XTERM_BASE[usize::from(i)],
            Color::Indexed(i) if i < 232 => {
                let i = i - 16;
                (
                    CUBE_LEVELS[usize::from(i / 36)],
                    CUBE_LEVELS[usize::from((i / 6) % 6)],
                    CUBE_LEVELS[usize::from(i % 6)],
                )
            }
            Color::Indexed(i) => {
                let level = 8 + 10 * (i - 232);
                (level, level, level)
            }
        }
    }

    fn css(self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Current graphic rendition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Style {
    foreground: Option<Color>,
    background: Option<Color>,
    bold: bool,
    faint: bool,
    italic: bool,
    underline: bool,
    blink: bool,
    inverse: bool,
    conceal: bool,
    strike: bool,
}

impl Style {
    fn is_plain(&self) -> bool {
        *self == Style::default()
    }

    /// Apply the parameters of one SGR sequence.
    fn apply(&mut self, params: &[u32]) {
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
                8 => self.conceal = true,
                9 => self.strike = true,
                21 => self.underline = true,
                22 => {
                    self.bold = false;
                    self.faint = false;
                }
                23 => self.italic = false,
                24 => self.underline = false,
                25 => self.blink = false,
                27 => self.inverse = false,
                28 => self.conceal = false,
                29 => self.strike = false,
                30..=37 => self.foreground = Some(Color::Indexed((code - 30) as u8)),
                38 => self.foreground = extended_color(&mut iter),
                39 => self.foreground = None,
                40..=47 => self.background = Some(Color::Indexed((code - 40) as u8)),
                48 => self.background = extended_color(&mut iter),
                49 => self.background = None,
                90..=97 => self.foreground = Some(Color::Indexed((code - 90 + 8) as u8)),
                100..=107 => self.background = Some(Color::Indexed((code - 100 + 8) as u8)),
                _ => {}
            }
        }
    }

    fn css(&self) -> String {
        let (mut fg, mut bg) = (self.foreground, self.background);
        if self.inverse {
            fg = Some(self.background.unwrap_or(DEFAULT_BACKGROUND));
            bg = Some(self.foreground.unwrap_or(DEFAULT_FOREGROUND));
        }

        let mut rules = Vec::new();
        if let Some(color) = fg {
            rules.push(format!("color: {}", color.css()));
        }
        if let Some(color) = bg {
            rules.push(format!("background-color: {}", color.css()));
        }
        if self.bold {
            rules.push("font-weight: bold".to_string());
        }
        if self.faint {
            rules.push("opacity: 0.5".to_string());
        }
        if self.italic {
            rules.push("font-style: italic".to_string());
        }

        let decorations: Vec<&str> = [
            (self.underline, "underline"),
            (self.strike, "line-through"),
            (self.blink, "blink"),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, name)| *name)
        .collect();
        if !decorations.is_empty() {
            rules.push(format!("text-decoration: {}", decorations.join(" ")));
        }

        if self.conceal {
            rules.push("visibility: hidden".to_string());
        }
        rules.join("; ")
    }
}

/// Read the rest of a `38;...` or `48;...` color specification.
fn extended_color(iter: &mut impl Iterator<Item = u32>) -> Option<Color> {
    match iter.next()? {
        5 => iter.next().map(|i| Color::Indexed(clamp_channel(i))),
        2 => {
            let r = iter.next()?;
            let g = iter.next()?;
            let b = iter.next()?;
            Some(Color::Rgb(clamp_channel(r), clamp_channel(g), clamp_channel(b)))
        }
        _ => None,
    }
}

fn clamp_channel(value: u32) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        _ => out.push(c),
    }
}

/// Builds the HTML while tracking which span is open.
#[derive(Default)]
struct Writer {
    out: String,
    style: Style,
    span_open: bool,
    dirty: bool,
}

impl Writer {
    fn set_style(&mut self, params: &[u32]) {
        self.style.apply(params);
        self.dirty = true;
    }

    fn text(&mut self, c: char) {
        if self.dirty {
            self.close_span();
            if !self.style.is_plain() {
                let _ = write!(self.out, "<span style=\"{}\">", self.style.css());
                self.span_open = true;
            }
            self.dirty = false;
        }
        push_escaped(&mut self.out, c);
    }

    fn close_span(&mut self) {
        if self.span_open {
            self.out.push_str("</span>");
            self.span_open = false;
        }
    }

    fn finish(mut self) -> String {
        self.close_span();
        self.out
    }
}

/// Convert ANSI colored `text` into HTML with inline styles.
pub fn to_html(text: &str) -> String {
    let mut writer = Writer::default();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != ESC {
            writer.text(c);
            continue;
        }

        match chars.peek() {
            Some('[') => {
                chars.next();
                let mut body = String::new();
                let mut terminator = None;
                for next in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&next) {
                        terminator = Some(next);
                        break;
                    }
                    body.push(next);
                }
                if terminator == Some('m') {
                    writer.set_style(&parse_params(&body));
                }
            }
            Some(next) if ('\x40'..='\x5f').contains(next) => {
                chars.next();
            }
            _ => {}
        }
    }

    writer.finish()
}

fn parse_params(body: &str) -> Vec<u32> {
    if body.is_empty() {
        return Vec::new();
    }
    body.split([';', ':'])
        .map(|p| p.parse().unwrap_or(0))
        .collect()
}
