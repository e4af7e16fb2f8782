//! PDF encoder. Lays the shared resume blocks out by hand on US Letter pages
//! and writes them with the standard Helvetica faces.
//!
//! Layout and encoding are separate passes: `layout_pages` produces positioned
//! draw operations per page, `encode_pages` turns those into PDF objects.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::errors::AppError;
use crate::generation::content::SynthesizedContent;
use crate::layout::document::{compose, Block, ResumeDocument};
use crate::layout::font_metrics::{get_metrics, TextMeasure, Typeface};
use crate::layout::text_flow::{
    wrap_text, PageCursor, CONTENT_WIDTH, MARGIN, PAGE_HEIGHT, PAGE_WIDTH,
};
use crate::models::user::UserIdentity;

const NAME_SIZE: f32 = 18.0;
const HEADER_SIZE: f32 = 9.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const META_SIZE: f32 = 9.0;
const BULLET_INDENT: f32 = 10.0;
const ENTRY_GAP: f32 = 5.0;

const LINK_BLUE: Color = Color::Rgb(0.0, 0.4, 0.8);
const MUTED_GRAY: Color = Color::Gray(0.4);
const RULE_GRAY: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Black,
    Gray(f32),
    Rgb(f32, f32, f32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        face: Typeface,
        size: f32,
        x: f32,
        y: f32,
        color: Color,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        gray: f32,
    },
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    face: Typeface,
    size: f32,
    color: Color,
    indent: f32,
}

impl TextStyle {
    const fn plain(size: f32) -> Self {
        Self {
            face: Typeface::Regular,
            size,
            color: Color::Black,
            indent: 0.0,
        }
    }
}

/// Accumulates draw operations while walking the page cursor.
struct PdfLayout {
    cursor: PageCursor,
    pages: Vec<Vec<DrawOp>>,
}

impl PdfLayout {
    fn push(&mut self, page: usize, op: DrawOp) {
        while self.pages.len() <= page {
            self.pages.push(Vec::new());
        }
        self.pages[page].push(op);
    }

    fn draw_paragraph(&mut self, text: &str, style: TextStyle) {
        let measure = get_metrics(style.face);
        for line in wrap_text(text, measure, style.size, CONTENT_WIDTH - style.indent) {
            let slot = self.cursor.next_line();
            self.push(
                slot.page,
                DrawOp::Text {
                    face: style.face,
                    size: style.size,
                    x: MARGIN + style.indent,
                    y: slot.y,
                    color: style.color,
                    text: line,
                },
            );
        }
    }

    fn draw_centered(&mut self, text: &str, style: TextStyle) {
        let measure = get_metrics(style.face);
        for line in wrap_text(text, measure, style.size, CONTENT_WIDTH) {
            let width = measure.width_of(&line, style.size);
            let slot = self.cursor.next_line();
            self.push(
                slot.page,
                DrawOp::Text {
                    face: style.face,
                    size: style.size,
                    // Lines wider than the content box start at the left margin.
                    x: (PAGE_WIDTH / 2.0 - width / 2.0).max(MARGIN),
                    y: slot.y,
                    color: style.color,
                    text: line,
                },
            );
        }
    }

    fn draw_rule(&mut self, y: f32, gray: f32) {
        let page = self.cursor.page();
        self.push(
            page,
            DrawOp::Rule {
                x1: MARGIN,
                x2: PAGE_WIDTH - MARGIN,
                y,
                gray,
            },
        );
    }

    fn draw_section(&mut self, title: &str) {
        self.cursor.start_section();
        self.draw_paragraph(
            title,
            TextStyle {
                face: Typeface::Bold,
                ..TextStyle::plain(HEADING_SIZE)
            },
        );
        self.cursor.advance(5.0);
        let y = self.cursor.y() + 5.0;
        self.draw_rule(y, RULE_GRAY);
    }

    fn draw_block(&mut self, block: &Block) {
        match block {
            Block::Name(name) => {
                self.draw_centered(
                    name,
                    TextStyle {
                        face: Typeface::Bold,
                        ..TextStyle::plain(NAME_SIZE)
                    },
                );
                self.cursor.advance(5.0);
            }
            Block::ContactLine(text) => self.draw_centered(text, TextStyle::plain(HEADER_SIZE)),
            Block::LinksLine(text) => self.draw_centered(
                text,
                TextStyle {
                    color: LINK_BLUE,
                    ..TextStyle::plain(HEADER_SIZE)
                },
            ),
            Block::Divider => {
                let y = self.cursor.y() + 4.0;
                self.draw_rule(y, 0.0);
                self.cursor.advance(4.0);
            }
            Block::SectionHeading(title) => self.draw_section(title),
            Block::Body(text) => self.draw_paragraph(text, TextStyle::plain(BODY_SIZE)),
            Block::EntryTitle { emphasis, rest } => {
                self.cursor.advance(ENTRY_GAP);
                self.draw_paragraph(
                    &format!("{emphasis}{rest}"),
                    TextStyle {
                        face: Typeface::Bold,
                        ..TextStyle::plain(BODY_SIZE)
                    },
                );
            }
            Block::Meta { text, muted } => self.draw_paragraph(
                text,
                TextStyle {
                    color: if *muted { MUTED_GRAY } else { Color::Black },
                    ..TextStyle::plain(META_SIZE)
                },
            ),
            Block::Bullet(text) => self.draw_paragraph(
                &format!("\u{2022} {text}"),
                TextStyle {
                    indent: BULLET_INDENT,
                    ..TextStyle::plain(BODY_SIZE)
                },
            ),
        }
    }
}

/// Positions every block. Always returns at least one page.
pub fn layout_pages(document: &ResumeDocument) -> Vec<Vec<DrawOp>> {
    let mut layout = PdfLayout {
        cursor: PageCursor::new(),
        pages: vec![Vec::new()],
    };
    for block in &document.blocks {
        layout.draw_block(block);
    }
    layout.pages
}

/// Renders the resume as PDF bytes.
pub fn render_pdf(content: &SynthesizedContent, identity: &UserIdentity) -> Result<Vec<u8>, AppError> {
    let pages = layout_pages(&compose(content, identity));
    encode_pages(&pages)
}

/// Writes positioned pages as a PDF 1.5 file with uncompressed content streams.
pub fn encode_pages(pages: &[Vec<DrawOp>]) -> Result<Vec<u8>, AppError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for face in [Typeface::Regular, Typeface::Bold] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! { "Font" => fonts });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for ops in pages {
        let content = Content {
            operations: page_operations(ops),
        };
        let encoded = content
            .encode()
            .map_err(|e| AppError::Render(format!("PDF content encoding failed: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| AppError::Render(format!("PDF serialization failed: {e}")))?;
    Ok(bytes)
}

fn page_operations(ops: &[DrawOp]) -> Vec<Operation> {
    let mut operations = Vec::new();
    for op in ops {
        match op {
            DrawOp::Text {
                face,
                size,
                x,
                y,
                color,
                text,
            } => {
                operations.push(Operation::new("BT", vec![]));
                operations.push(fill_color(*color));
                operations.push(Operation::new(
                    "Tf",
                    vec![face.resource_name().into(), (*size).into()],
                ));
                operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_win_ansi(text))],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rule { x1, x2, y, gray } => {
                operations.push(Operation::new("G", vec![(*gray).into()]));
                operations.push(Operation::new("w", vec![1.into()]));
                operations.push(Operation::new("m", vec![(*x1).into(), (*y).into()]));
                operations.push(Operation::new("l", vec![(*x2).into(), (*y).into()]));
                operations.push(Operation::new("S", vec![]));
            }
        }
    }
    operations
}

fn fill_color(color: Color) -> Operation {
    match color {
        Color::Black => Operation::new("g", vec![0.into()]),
        Color::Gray(level) => Operation::new("g", vec![level.into()]),
        Color::Rgb(r, g, b) => Operation::new("rg", vec![r.into(), g.into(), b.into()]),
    }
}

/// Maps text onto the WinAnsi code page of the standard fonts. Characters the
/// code page cannot represent become '?'.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\t' | '\n' | '\r' => b' ',
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::content::ExperienceBlock;
    use crate::layout::text_flow::{BOTTOM_MARGIN, TOP};
    use crate::testing::{sample_content, sample_profile};

    fn texts(pages: &[Vec<DrawOp>]) -> Vec<&str> {
        pages
            .iter()
            .flatten()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::Rule { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_scenario_pdf_contains_experience_and_omits_certifications() {
        let profile = sample_profile();
        let bytes = render_pdf(&sample_content(), &profile.user).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let raw = String::from_utf8_lossy(&bytes);
        assert!(raw.contains("Senior Engineer"));
        assert!(raw.contains("Acme Corp"));
        assert!(!raw.contains("CERTIFICATIONS"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_many_achievements_force_second_page() {
        let mut content = sample_content();
        content.experience.push(ExperienceBlock {
            position: "Staff Engineer".into(),
            company: "Globex".into(),
            location: "Remote".into(),
            period: "2015 - 2019".into(),
            achievements: (0..80)
                .map(|i| format!("Delivered improvement number {i} across the platform"))
                .collect(),
        });
        let bytes = render_pdf(&content, &sample_profile().user).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() >= 2, "got {} pages", doc.get_pages().len());
    }

    #[test]
    fn test_every_line_stays_inside_margins() {
        let mut content = sample_content();
        content.summary = "Seasoned engineer ".repeat(60);
        let pages = layout_pages(&compose(&content, &sample_profile().user));

        for op in pages.iter().flatten() {
            if let DrawOp::Text {
                face, size, x, y, text, ..
            } = op
            {
                let width = get_metrics(*face).width_of(text, *size);
                assert!(*x >= MARGIN - 0.01, "{text:?} starts at {x}");
                assert!(x + width <= PAGE_WIDTH - MARGIN + 0.01, "{text:?} overflows");
                assert!(*y >= BOTTOM_MARGIN && *y <= TOP, "{text:?} at y={y}");
            }
        }
    }

    #[test]
    fn test_name_is_centered_on_page() {
        let profile = sample_profile();
        let pages = layout_pages(&compose(&sample_content(), &profile.user));
        let DrawOp::Text { x, text, size, .. } = &pages[0][0] else {
            panic!("first op should be the name");
        };
        assert_eq!(text, &profile.user.full_name);
        let width = get_metrics(Typeface::Bold).width_of(text, *size);
        assert!((x - (306.0 - width / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_overlong_header_token_starts_at_left_margin() {
        let mut profile = sample_profile();
        profile.user.linkedin_profile = Some(format!("linkedin.com/in/{}", "x".repeat(200)));
        let pages = layout_pages(&compose(&sample_content(), &profile.user));
        let x = pages[0]
            .iter()
            .find_map(|op| match op {
                DrawOp::Text { x, text, .. } if text.contains("xxxx") => Some(*x),
                _ => None,
            })
            .unwrap();
        assert!(x >= MARGIN, "header line starts off-page at {x}");
    }

    #[test]
    fn test_bullets_are_indented_with_marker() {
        let pages = layout_pages(&compose(&sample_content(), &sample_profile().user));
        let bullet = pages
            .iter()
            .flatten()
            .find_map(|op| match op {
                DrawOp::Text { text, x, .. } if text.starts_with('\u{2022}') => Some(*x),
                _ => None,
            })
            .unwrap();
        assert_eq!(bullet, MARGIN + BULLET_INDENT);
    }

    #[test]
    fn test_empty_sections_draw_no_heading() {
        let content = SynthesizedContent {
            summary: "Short summary".into(),
            ..Default::default()
        };
        let pages = layout_pages(&compose(&content, &sample_profile().user));
        let drawn = texts(&pages);
        assert!(drawn.contains(&"PROFESSIONAL SUMMARY"));
        assert!(!drawn.contains(&"SKILLS"));
        assert!(!drawn.contains(&"PROFESSIONAL EXPERIENCE"));
    }

    #[test]
    fn test_win_ansi_mapping() {
        assert_eq!(encode_win_ansi("a \u{2022} b"), vec![b'a', b' ', 0x95, b' ', b'b']);
        assert_eq!(encode_win_ansi("caf\u{e9}"), b"caf\xe9".to_vec());
        assert_eq!(encode_win_ansi("\u{4E2D}"), b"?".to_vec());
    }
}
