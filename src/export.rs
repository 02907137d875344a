use std::fs;
use std::path::Path;

use anyhow::Result;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::model::{AnalysisResult, Theme};

// A4 in points
const PAGE_W: f32 = 595.0;
const PAGE_H: f32 = 842.0;
const MARGIN: f32 = 40.0;
const CONTENT_W: f32 = PAGE_W - 2.0 * MARGIN;

const BODY_SIZE: f32 = 11.0;
const LINE_H: f32 = 14.0;
const CELL_PAD: f32 = 6.0;
const TERM_COL_W: f32 = 160.0;
const DEF_COL_W: f32 = CONTENT_W - TERM_COL_W;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const FONT_ITALIC: &str = "F3";

const WHITE: Rgb = (255, 255, 255);
const ACCENT: Rgb = (99, 102, 241);

type Rgb = (u8, u8, u8);

/// Color parameters for one theme
pub struct Palette {
    pub background: Rgb,
    pub text: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub row_fill: Rgb,
    pub alt_row_fill: Rgb,
}

/// Fixed palettes keyed by theme; the accent is theme-invariant
pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            background: (30, 41, 59),
            text: (248, 250, 252),
            secondary: (148, 163, 184),
            accent: ACCENT,
            row_fill: (51, 65, 85),
            alt_row_fill: (30, 41, 59),
        },
        Theme::Light => Palette {
            background: (255, 255, 255),
            text: (15, 23, 42),
            secondary: (71, 85, 105),
            accent: ACCENT,
            row_fill: (248, 250, 252),
            alt_row_fill: (255, 255, 255),
        },
    }
}

/// Derive the export filename from the result title.
///
/// Every run of whitespace collapses to a single underscore, then the fixed
/// study guide suffix is appended.
pub fn file_name(title: &str) -> String {
    let mut collapsed = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                collapsed.push('_');
            }
            in_whitespace = true;
        } else {
            collapsed.push(c);
            in_whitespace = false;
        }
    }
    format!("{}_Study_Guide.pdf", collapsed)
}

/// Greedy word wrap against an estimated Helvetica line width
pub fn wrap_text(text: &str, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(&candidate, font_size) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// Average glyph width approximation for the built-in Helvetica faces
fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.5
}

/// Render the analysis result as a styled study guide PDF.
///
/// The document contains, in order: the brand mark, the title, a generation
/// timestamp, the word-wrapped summary, and a Term/Definition table with one
/// row per definition in input order. Context excerpts are not exported.
pub fn render_study_guide(result: &AnalysisResult, theme: Theme) -> Result<Vec<u8>> {
    let date_line = format!("Generated on {}", chrono::Local::now().format("%B %-d, %Y"));
    render_with_date(result, theme, &date_line)
}

// Split out so tests can render with a fixed date line
pub fn render_with_date(result: &AnalysisResult, theme: Theme, date_line: &str) -> Result<Vec<u8>> {
    let palette = palette(theme);
    let mut writer = PageWriter::new(palette, theme.is_dark());

    // Brand mark
    writer.text(FONT_BOLD, 10.0, writer.palette.accent, MARGIN, "TERMSCAN");
    writer.advance(42.0);

    // Title
    writer.text(FONT_BOLD, 22.0, writer.palette.text, MARGIN, &result.title);
    writer.advance(23.0);

    // Timestamp
    writer.text(FONT_REGULAR, 10.0, writer.palette.secondary, MARGIN, date_line);
    writer.advance(34.0);

    // Summary, wrapped to the content width
    for line in wrap_text(&result.summary, BODY_SIZE, CONTENT_W) {
        writer.text(FONT_ITALIC, BODY_SIZE, writer.palette.secondary, MARGIN, &line);
        writer.advance(LINE_H);
    }
    writer.advance(18.0);

    writer.table_header();
    for (i, def) in result.definitions.iter().enumerate() {
        writer.table_row(&def.term, &def.definition, i % 2 == 1);
    }

    writer.into_document()
}

/// Render and write the study guide to `path`
pub fn save_study_guide(result: &AnalysisResult, theme: Theme, path: &Path) -> Result<()> {
    let bytes = render_study_guide(result, theme)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Accumulates content stream operations page by page, paginating when the
/// vertical cursor runs out of room
struct PageWriter {
    palette: Palette,
    dark: bool,
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl PageWriter {
    fn new(palette: Palette, dark: bool) -> Self {
        let mut writer = Self {
            palette,
            dark,
            pages: Vec::new(),
            ops: Vec::new(),
            y: PAGE_H - MARGIN,
        };
        writer.paint_background();
        writer
    }

    fn paint_background(&mut self) {
        if self.dark {
            let background = self.palette.background;
            self.fill_rect(0.0, 0.0, PAGE_W, PAGE_H, background);
        }
    }

    fn new_page(&mut self) {
        let ops = std::mem::take(&mut self.ops);
        self.pages.push(ops);
        self.y = PAGE_H - MARGIN;
        self.paint_background();
    }

    /// Start a new page (repeating the table header) unless `height`
    /// points still fit above the bottom margin
    fn ensure_room_for_row(&mut self, height: f32) {
        if self.y - height < MARGIN {
            self.new_page();
            self.table_header();
        }
    }

    fn advance(&mut self, dy: f32) {
        self.y -= dy;
        if self.y < MARGIN {
            self.new_page();
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        let (r, g, b) = normalize(color);
        self.ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        self.ops.push(Operation::new("re", vec![x.into(), y.into(), w.into(), h.into()]));
        self.ops.push(Operation::new("f", vec![]));
    }

    /// Draw a single line of text with its baseline at the current cursor
    fn text(&mut self, font: &str, size: f32, color: Rgb, x: f32, content: &str) {
        self.text_at(font, size, color, x, self.y, content);
    }

    fn text_at(&mut self, font: &str, size: f32, color: Rgb, x: f32, y: f32, content: &str) {
        let (r, g, b) = normalize(color);
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        self.ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        self.ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        self.ops.push(Operation::new("Tj", vec![Object::string_literal(content)]));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn table_header(&mut self) {
        let height = LINE_H + 2.0 * CELL_PAD;
        let accent = self.palette.accent;
        self.fill_rect(MARGIN, self.y - height, CONTENT_W, height, accent);

        let baseline = self.y - CELL_PAD - BODY_SIZE;
        self.text_at(FONT_BOLD, BODY_SIZE, WHITE, MARGIN + CELL_PAD, baseline, "Term");
        self.text_at(
            FONT_BOLD,
            BODY_SIZE,
            WHITE,
            MARGIN + TERM_COL_W + CELL_PAD,
            baseline,
            "Definition",
        );
        self.y -= height;
    }

    fn table_row(&mut self, term: &str, definition: &str, alternate: bool) {
        let term_lines = wrap_text(term, BODY_SIZE, TERM_COL_W - 2.0 * CELL_PAD);
        let def_lines = wrap_text(definition, BODY_SIZE, DEF_COL_W - 2.0 * CELL_PAD);
        let line_count = term_lines.len().max(def_lines.len()).max(1);
        let height = line_count as f32 * LINE_H + 2.0 * CELL_PAD;

        self.ensure_room_for_row(height);

        let fill = if alternate {
            self.palette.alt_row_fill
        } else {
            self.palette.row_fill
        };
        self.fill_rect(MARGIN, self.y - height, CONTENT_W, height, fill);

        let text_color = self.palette.text;
        let mut baseline = self.y - CELL_PAD - BODY_SIZE;
        for i in 0..line_count {
            if let Some(line) = term_lines.get(i) {
                self.text_at(FONT_BOLD, BODY_SIZE, text_color, MARGIN + CELL_PAD, baseline, line);
            }
            if let Some(line) = def_lines.get(i) {
                self.text_at(
                    FONT_REGULAR,
                    BODY_SIZE,
                    text_color,
                    MARGIN + TERM_COL_W + CELL_PAD,
                    baseline,
                    line,
                );
            }
            baseline -= LINE_H;
        }
        self.y -= height;
    }

    /// Assemble the accumulated pages into a finished PDF
    fn into_document(mut self) -> Result<Vec<u8>> {
        let ops = std::mem::take(&mut self.ops);
        self.pages.push(ops);

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let font_bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let font_italic = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Oblique",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FONT_REGULAR => font_regular,
                FONT_BOLD => font_bold,
                FONT_ITALIC => font_italic,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for operations in self.pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), PAGE_W.into(), PAGE_H.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn normalize((r, g, b): Rgb) -> (f32, f32, f32) {
    (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}
