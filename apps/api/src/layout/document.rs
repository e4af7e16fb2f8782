//! Format-neutral resume layout shared by the DOCX and PDF encoders.
//!
//! `compose` fixes the order and text of every line once, so both encoders only
//! decide how a block looks, never whether it appears.

use crate::generation::content::SynthesizedContent;
use crate::models::user::UserIdentity;

pub const SKILL_SEPARATOR: &str = " \u{2022} ";

/// One visual unit of the resume.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Candidate name, centered, largest type.
    Name(String),
    /// "email | phone | address", centered.
    ContactLine(String),
    /// "LinkedIn: ... | GitHub: ...", centered.
    LinksLine(String),
    /// Horizontal rule under the header.
    Divider,
    SectionHeading(String),
    Body(String),
    /// Bold lead ("Position") followed by plain text (" | Company").
    EntryTitle { emphasis: String, rest: String },
    /// Secondary detail line. Muted lines render in gray.
    Meta { text: String, muted: bool },
    Bullet(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeDocument {
    pub blocks: Vec<Block>,
}

impl ResumeDocument {
    pub fn headings(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().filter_map(|b| match b {
            Block::SectionHeading(h) => Some(h.as_str()),
            _ => None,
        })
    }
}

/// Lays out the header and every non-empty section in resume order.
pub fn compose(content: &SynthesizedContent, identity: &UserIdentity) -> ResumeDocument {
    let mut blocks = vec![Block::Name(identity.full_name.trim().to_string())];

    let contact = join_present(
        [
            Some(identity.email.as_str()),
            identity.phone_number.as_deref(),
            identity.address.as_deref(),
        ],
        " | ",
    );
    if !contact.is_empty() {
        blocks.push(Block::ContactLine(contact));
    }

    let links = join_present(
        [
            identity
                .linkedin_profile
                .as_deref()
                .and_then(non_blank)
                .map(|l| format!("LinkedIn: {l}"))
                .as_deref(),
            identity
                .github_link
                .as_deref()
                .and_then(non_blank)
                .map(|g| format!("GitHub: {g}"))
                .as_deref(),
        ],
        " | ",
    );
    if !links.is_empty() {
        blocks.push(Block::LinksLine(links));
    }

    blocks.push(Block::Divider);

    if let Some(summary) = non_blank(&content.summary) {
        blocks.push(heading("PROFESSIONAL SUMMARY"));
        blocks.push(Block::Body(summary.to_string()));
    }

    let skills: Vec<&str> = content.skills.iter().filter_map(|s| non_blank(s)).collect();
    if !skills.is_empty() {
        blocks.push(heading("SKILLS"));
        blocks.push(Block::Body(skills.join(SKILL_SEPARATOR)));
    }

    if !content.experience.is_empty() {
        blocks.push(heading("PROFESSIONAL EXPERIENCE"));
        for exp in &content.experience {
            blocks.push(entry_title(&exp.position, " | ", &exp.company));
            let meta = join_present([Some(exp.location.as_str()), Some(exp.period.as_str())], " | ");
            if !meta.is_empty() {
                blocks.push(Block::Meta { text: meta, muted: true });
            }
            blocks.extend(
                exp.achievements
                    .iter()
                    .filter_map(|a| non_blank(a))
                    .map(|a| Block::Bullet(a.to_string())),
            );
        }
    }

    if !content.education.is_empty() {
        blocks.push(heading("EDUCATION"));
        for edu in &content.education {
            blocks.push(entry_title(&edu.degree, " - ", &edu.institution));
            let meta = join_present(
                [Some(edu.graduation.as_str()), edu.details.as_deref()],
                " | ",
            );
            if !meta.is_empty() {
                blocks.push(Block::Meta { text: meta, muted: false });
            }
        }
    }

    let certifications: Vec<&str> = content
        .certifications
        .iter()
        .filter_map(|c| non_blank(c))
        .collect();
    if !certifications.is_empty() {
        blocks.push(heading("CERTIFICATIONS"));
        blocks.extend(certifications.into_iter().map(|c| Block::Bullet(c.to_string())));
    }

    for section in &content.additional_sections {
        let (Some(title), Some(body)) = (non_blank(&section.title), non_blank(&section.content))
        else {
            continue;
        };
        blocks.push(heading(&title.to_uppercase()));
        blocks.push(Block::Body(body.to_string()));
    }

    ResumeDocument { blocks }
}

fn heading(title: &str) -> Block {
    Block::SectionHeading(title.to_string())
}

fn entry_title(lead: &str, separator: &str, tail: &str) -> Block {
    let rest = match non_blank(tail) {
        Some(tail) => format!("{separator}{tail}"),
        None => String::new(),
    };
    Block::EntryTitle {
        emphasis: lead.trim().to_string(),
        rest,
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn join_present<'a, const N: usize>(parts: [Option<&'a str>; N], separator: &str) -> String {
    parts
        .into_iter()
        .flatten()
        .filter_map(non_blank)
        .collect::<Vec<_>>()
        .join(separator)
}
