//! Static glyph-width tables for the two PDF standard faces the renderer uses.
//!
//! Widths are the Adobe AFM advance widths in 1/1000 em for the WinAnsi code
//! points 0x20..=0x7E (95 printable characters, index = byte - 32). A handful of
//! WinAnsi punctuation glyphs outside ASCII are looked up by `special_width`;
//! anything else falls back to `average_char_width`.
//!
//! Because the standard 14 fonts are never embedded, these tables are the only
//! source of truth for line breaking and centring.

/// Measures rendered text width in points.
///
/// The PDF layout depends on this seam only, so wrapping can be tested against a
/// synthetic monospaced face.
pub trait TextMeasure {
    fn width_of(&self, text: &str, size_pt: f32) -> f32;
}

/// The two faces used on a generated resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Typeface {
    Regular,
    Bold,
}

impl Typeface {
    /// PostScript name of the standard Type1 font.
    pub fn base_font(self) -> &'static str {
        match self {
            Typeface::Regular => "Helvetica",
            Typeface::Bold => "Helvetica-Bold",
        }
    }

    /// Resource name used in page content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            Typeface::Regular => "F1",
            Typeface::Bold => "F2",
        }
    }
}

/// Static character-width table for one face.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [u16; 95],
    /// Fallback width for characters without an entry.
    pub average_char_width: u16,
    bullet_width: u16,
    quote_width: u16,
    double_quote_width: u16,
}

impl FontMetricTable {
    /// Width of one character in 1/1000 em.
    fn char_units(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        self.special_width(c).unwrap_or(self.average_char_width)
    }

    fn special_width(&self, c: char) -> Option<u16> {
        match c {
            '\u{2022}' => Some(self.bullet_width),
            '\u{2013}' => Some(556),
            '\u{2014}' | '\u{2026}' => Some(1000),
            '\u{2018}' | '\u{2019}' => Some(self.quote_width),
            '\u{201C}' | '\u{201D}' => Some(self.double_quote_width),
            '\u{00A0}' => Some(self.widths[0]),
            _ => None,
        }
    }

    /// Measures a string in em units.
    pub fn measure_em(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_units(c) as f32).sum::<f32>() / 1000.0
    }
}

impl TextMeasure for FontMetricTable {
    fn width_of(&self, text: &str, size_pt: f32) -> f32 {
        self.measure_em(text) * size_pt
    }
}

/// Helvetica (regular).
static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    average_char_width: 556,
    bullet_width: 350,
    quote_width: 222,
    double_quote_width: 333,
};

/// Helvetica-Bold.
static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0    1    2    3    4    5    6    7    8    9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A    B    C    D    E    F    G    H    I    J    K    L    M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a    b    c    d    e    f    g    h    i    j    k    l    m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n    o    p    q    r    s    t    u    v    w    x    y    z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    average_char_width: 611,
    bullet_width: 350,
    quote_width: 278,
    double_quote_width: 500,
};

/// Returns the static metric table for a face.
pub fn get_metrics(face: Typeface) -> &'static FontMetricTable {
    match face {
        Typeface::Regular => &HELVETICA_TABLE,
        Typeface::Bold => &HELVETICA_BOLD_TABLE,
    }
}
