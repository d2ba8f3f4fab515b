//! Strings with text attributes.
//!
//! A Rad string is a sequence of segments, each carrying its own color and
//! emphasis, so `red("a") + "b"` keeps `a` red when printed. Comparisons,
//! hashing, and lengths only ever look at the plain text.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

/// Terminal colors a string segment can carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Orange,
    Pink,
}

impl Color {
    pub const ALL: [Color; 10] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
        Color::Orange,
        Color::Pink,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::White => "white",
            Color::Orange => "orange",
            Color::Pink => "pink",
        }
    }

    pub fn from_name(name: &str) -> Option<Color> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// SGR parameters selecting this foreground color.
    const fn sgr(self) -> &'static str {
        match self {
            Color::Black => "30",
            Color::Red => "31",
            Color::Green => "32",
            Color::Yellow => "33",
            Color::Blue => "34",
            Color::Magenta => "35",
            Color::Cyan => "36",
            Color::White => "37",
            Color::Orange => "38;5;208",
            Color::Pink => "38;5;218",
        }
    }
}

/// Color and emphasis of one segment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextAttrs {
    pub color: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TextAttrs {
    pub fn is_plain(&self) -> bool {
        *self == TextAttrs::default()
    }

    fn sgr_codes(&self) -> Vec<&'static str> {
        let mut codes = Vec::new();
        if self.bold {
            codes.push("1");
        }
        if self.italic {
            codes.push("3");
        }
        if self.underline {
            codes.push("4");
        }
        if let Some(color) = self.color {
            codes.push(color.sgr());
        }
        codes
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub text: String,
    pub attrs: TextAttrs,
}

/// Immutable, cheaply clonable string value.
#[derive(Clone)]
pub struct RadString {
    segments: Rc<[Segment]>,
}

impl RadString {
    pub fn new(text: impl Into<String>) -> Self {
        Self::styled(text, TextAttrs::default())
    }

    pub fn styled(text: impl Into<String>, attrs: TextAttrs) -> Self {
        let text = text.into();
        if text.is_empty() {
            return RadString {
                segments: Rc::from(Vec::new()),
            };
        }
        RadString {
            segments: Rc::from(vec![Segment { text, attrs }]),
        }
    }

    fn from_segments(segments: Vec<Segment>) -> Self {
        // Adjacent segments with equal attributes are merged.
        let mut merged: Vec<Segment> = Vec::with_capacity(segments.len());
        for seg in segments {
            if seg.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.attrs == seg.attrs => last.text.push_str(&seg.text),
                _ => merged.push(seg),
            }
        }
        RadString {
            segments: Rc::from(merged),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Text without attributes.
    pub fn plain(&self) -> Cow<'_, str> {
        match &*self.segments {
            [] => Cow::Borrowed(""),
            [only] => Cow::Borrowed(only.text.as_str()),
            many => Cow::Owned(many.iter().map(|s| s.text.as_str()).collect()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.segments.iter().map(|s| s.text.chars().count()).sum()
    }

    pub fn has_attrs(&self) -> bool {
        self.segments.iter().any(|s| !s.attrs.is_plain())
    }

    #[must_use]
    pub fn concat(&self, other: &RadString) -> RadString {
        let segments = self
            .segments
            .iter()
            .chain(other.segments.iter())
            .cloned()
            .collect();
        Self::from_segments(segments)
    }

    /// Apply `f` to the attributes of every segment.
    #[must_use]
    pub fn map_attrs(&self, f: impl Fn(TextAttrs) -> TextAttrs) -> RadString {
        let segments = self
            .segments
            .iter()
            .map(|s| Segment {
                text: s.text.clone(),
                attrs: f(s.attrs),
            })
            .collect();
        Self::from_segments(segments)
    }

    /// Apply `f` to the text of every segment, keeping attributes.
    #[must_use]
    pub fn map_text(&self, f: impl Fn(&str) -> String) -> RadString {
        let segments = self
            .segments
            .iter()
            .map(|s| Segment {
                text: f(&s.text),
                attrs: s.attrs,
            })
            .collect();
        Self::from_segments(segments)
    }

    /// Characters `start..end`, keeping each character's attributes.
    #[must_use]
    pub fn char_slice(&self, start: usize, end: usize) -> RadString {
        let mut out = Vec::new();
        let mut pos = 0usize;
        for seg in self.segments.iter() {
            let len = seg.text.chars().count();
            let seg_start = start.max(pos);
            let seg_end = end.min(pos + len);
            if seg_start < seg_end {
                let text = seg
                    .text
                    .chars()
                    .skip(seg_start - pos)
                    .take(seg_end - seg_start)
                    .collect();
                out.push(Segment {
                    text,
                    attrs: seg.attrs,
                });
            }
            pos += len;
        }
        Self::from_segments(out)
    }

    /// Length in bytes.
    pub fn byte_len(&self) -> usize {
        self.segments.iter().map(|s| s.text.len()).sum()
    }

    #[must_use]
    pub fn repeat(&self, times: usize) -> RadString {
        if self.is_empty() {
            return self.clone();
        }
        let mut segments = Vec::with_capacity(self.segments.len() * times);
        for _ in 0..times {
            segments.extend(self.segments.iter().cloned());
        }
        Self::from_segments(segments)
    }

    /// Text with ANSI escapes for attributes when `color` is set.
    pub fn render(&self, color: bool) -> String {
        if !color {
            return self.plain().into_owned();
        }
        let mut out = String::new();
        for seg in self.segments.iter() {
            let codes = seg.attrs.sgr_codes();
            if codes.is_empty() {
                out.push_str(&seg.text);
            } else {
                out.push_str("\x1b[");
                out.push_str(&codes.join(";"));
                out.push('m');
                out.push_str(&seg.text);
                out.push_str("\x1b[0m");
            }
        }
        out
    }
}

impl PartialEq for RadString {
    fn eq(&self, other: &Self) -> bool {
        self.plain() == other.plain()
    }
}

impl fmt::Debug for RadString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.plain())
    }
}

impl fmt::Display for RadString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain())
    }
}

impl From<&str> for RadString {
    fn from(text: &str) -> Self {
        RadString::new(text)
    }
}

impl From<String> for RadString {
    fn from(text: String) -> Self {
        RadString::new(text)
    }
}

/// Number of characters a terminal would show, skipping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // CSI sequences end with a letter.
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}
