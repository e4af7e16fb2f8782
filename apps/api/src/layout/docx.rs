//! Word-document encoder over the shared resume blocks.

use std::io::Cursor;

use docx_rs::{
    AlignmentType, BorderType, Docx, LineSpacing, PageMargin, Paragraph, ParagraphBorder,
    ParagraphBorderPosition, Run,
};

use crate::errors::AppError;
use crate::generation::content::SynthesizedContent;
use crate::layout::document::{compose, Block, ResumeDocument};
use crate::models::user::UserIdentity;

// Run sizes are half-points, spacing and indents are twentieths of a point.
const NAME_SIZE: usize = 32;
const CONTACT_SIZE: usize = 20;
const LINKS_SIZE: usize = 18;
const HEADING_SIZE: usize = 24;
const BODY_SIZE: usize = 22;
const META_SIZE: usize = 20;
const PAGE_MARGIN: i32 = 720;
const BULLET_INDENT: i32 = 360;

const LINK_COLOR: &str = "0066cc";
const MUTED_COLOR: &str = "666666";

fn spacing(before: u32, after: u32) -> LineSpacing {
    LineSpacing::new().before(before).after(after)
}

fn paragraph_for(block: &Block) -> Paragraph {
    match block {
        Block::Name(name) => Paragraph::new()
            .add_run(Run::new().add_text(name).bold().size(NAME_SIZE))
            .align(AlignmentType::Center)
            .line_spacing(spacing(0, 100)),
        Block::ContactLine(text) => Paragraph::new()
            .add_run(Run::new().add_text(text).size(CONTACT_SIZE))
            .align(AlignmentType::Center)
            .line_spacing(spacing(0, 100)),
        Block::LinksLine(text) => Paragraph::new()
            .add_run(
                Run::new()
                    .add_text(text)
                    .size(LINKS_SIZE)
                    .color(LINK_COLOR),
            )
            .align(AlignmentType::Center)
            .line_spacing(spacing(0, 200)),
        Block::Divider => {
            let mut paragraph = Paragraph::new().line_spacing(spacing(0, 200));
            paragraph.property = paragraph.property.set_border(
                ParagraphBorder::new(ParagraphBorderPosition::Bottom)
                    .val(BorderType::Single)
                    .size(6)
                    .color("000000"),
            );
            paragraph
        }
        Block::SectionHeading(title) => Paragraph::new()
            .add_run(Run::new().add_text(title).bold().size(HEADING_SIZE))
            .line_spacing(spacing(200, 100)),
        Block::Body(text) => Paragraph::new()
            .add_run(Run::new().add_text(text).size(BODY_SIZE))
            .line_spacing(spacing(0, 200)),
        Block::EntryTitle { emphasis, rest } => {
            let mut paragraph = Paragraph::new()
                .add_run(Run::new().add_text(emphasis).bold().size(BODY_SIZE))
                .line_spacing(spacing(150, 0));
            if !rest.is_empty() {
                paragraph = paragraph.add_run(Run::new().add_text(rest).size(BODY_SIZE));
            }
            paragraph
        }
        Block::Meta { text, muted } => {
            let mut run = Run::new().add_text(text).italic().size(META_SIZE);
            if *muted {
                run = run.color(MUTED_COLOR);
            }
            Paragraph::new().add_run(run).line_spacing(spacing(0, 50))
        }
        Block::Bullet(text) => Paragraph::new()
            .add_run(
                Run::new()
                    .add_text(format!("\u{2022} {text}"))
                    .size(BODY_SIZE),
            )
            .indent(Some(BULLET_INDENT), None, None, None),
    }
}

/// Builds the paragraph tree for a composed resume.
pub fn build_docx(document: &ResumeDocument) -> Docx {
    document.blocks.iter().fold(
        Docx::new().page_margin(
            PageMargin::new()
                .top(PAGE_MARGIN)
                .right(PAGE_MARGIN)
                .bottom(PAGE_MARGIN)
                .left(PAGE_MARGIN),
        ),
        |docx, block| docx.add_paragraph(paragraph_for(block)),
    )
}

/// Renders the resume as DOCX bytes.
pub fn render_docx(content: &SynthesizedContent, identity: &UserIdentity) -> Result<Vec<u8>, AppError> {
    let mut buffer = Cursor::new(Vec::new());
    build_docx(&compose(content, identity))
        .build()
        .pack(&mut buffer)
        .map_err(|e| AppError::Render(format!("DOCX packaging failed: {e}")))?;
    Ok(buffer.into_inner())
}
