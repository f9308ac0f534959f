//! Content-stream interpreter.
//!
//! Reads the consolidated (decoded, concatenated) content bytes of one page
//! and folds the operator sequence into [`Operation`] records. Operands come
//! before operators, so the loop collects objects until it hits a keyword,
//! then dispatches.
//!
//! Two properties drive the design:
//!
//! - **Nothing is dropped silently.** Every byte of the stream belongs to
//!   exactly one emitted operation's span, unknown operators ride along as
//!   `Opaque`, and anything the interpreter cannot classify is a
//!   [`Error::MalformedContent`] that aborts the whole parse. A redactor
//!   that guesses is a redactor that leaks.
//! - **Order is preserved.** Operations are emitted in source order, so the
//!   rebuilder can serialize kept spans in original relative order.

use crate::content::graphics_state::{GraphicsStateStack, Matrix};
use crate::content::metrics;
use crate::content::operators::{Operation, PathPaint, RawSpan};
use crate::error::{Error, Result};
use crate::geometry::coords::rect_bottom_left_to_top_left;
use crate::geometry::{Point, Rect};
use crate::lexer::{is_delimiter, is_regular, is_whitespace};
use crate::object::Object;
use crate::parser::parse_object;

/// Upper bound on operands per operator; beyond this the stream is garbage.
const MAX_OPERANDS: usize = 64;

/// Per-glyph geometry recorded during text shows.
///
/// Rectangles are in PDF-native bottom-left points; the letter index
/// converts these into its `Letter` records.
#[derive(Debug, Clone)]
pub struct GlyphBox {
    /// Raw byte code from the show string
    pub code: u8,
    /// Glyph extent in PDF-native bottom-left points
    pub rect: Rect,
    /// Baseline start point of the glyph
    pub baseline_start: Point,
}

/// Result of interpreting one page's content.
#[derive(Debug)]
pub struct ParsedContent {
    /// Operations in source order
    pub operations: Vec<Operation>,
    /// Per-glyph geometry for all text shows, in source order
    pub glyphs: Vec<GlyphBox>,
}

/// Interpret a content stream.
///
/// `page_height` (PDF points) is needed to express bounding boxes in the
/// top-left convention.
///
/// # Errors
///
/// `MalformedContent` on unlexable bytes, operands with no operator,
/// unterminated inline images, or unbalanced `q`/`Q`.
pub fn parse_content(data: &[u8], page_height: f64) -> Result<ParsedContent> {
    Interpreter::new(data, page_height).run()
}

enum TextChunk<'a> {
    Bytes(&'a [u8]),
    /// TJ positioning adjustment in 1000ths of text space
    Offset(f64),
}

struct Interpreter<'a> {
    data: &'a [u8],
    page_height: f64,
    pos: usize,
    stack: GraphicsStateStack,
    operations: Vec<Operation>,
    glyphs: Vec<GlyphBox>,
    /// Accumulated path points in user space (untransformed)
    path_points: Vec<Point>,
    /// Span start of the first construction operator of the open path
    path_span_start: Option<usize>,
    /// End of the last construction operator seen
    path_span_end: usize,
    path_all_rects: bool,
}

impl<'a> Interpreter<'a> {
    fn new(data: &'a [u8], page_height: f64) -> Self {
        Self {
            data,
            page_height,
            pos: 0,
            stack: GraphicsStateStack::new(),
            operations: Vec::new(),
            glyphs: Vec::new(),
            path_points: Vec::new(),
            path_span_start: None,
            path_span_end: 0,
            path_all_rects: true,
        }
    }

    fn run(mut self) -> Result<ParsedContent> {
        loop {
            self.skip_ws();
            if self.pos >= self.data.len() {
                break;
            }
            self.step()?;
        }

        if self.stack.depth() != 1 {
            return Err(Error::MalformedContent {
                offset: self.data.len(),
                reason: format!("{} unmatched q at end of stream", self.stack.depth() - 1),
            });
        }

        // A path that was built but never painted draws nothing, but its
        // bytes still belong to the stream.
        self.flush_pending_path_span();

        Ok(ParsedContent {
            operations: self.operations,
            glyphs: self.glyphs,
        })
    }

    fn skip_ws(&mut self) {
        let rest = crate::lexer::skip_ws(&self.data[self.pos..]);
        self.pos = self.data.len() - rest.len();
    }

    fn malformed(&self, reason: impl Into<String>) -> Error {
        Error::MalformedContent {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    /// Parse operands until an operator keyword, then dispatch it.
    fn step(&mut self) -> Result<()> {
        let op_start = self.pos;
        let mut operands: Vec<Object> = Vec::new();

        loop {
            self.skip_ws();
            if self.pos >= self.data.len() {
                return Err(self.malformed("operands at end of stream without an operator"));
            }
            if operands.len() > MAX_OPERANDS {
                return Err(self.malformed("operand list exceeds any legal operator arity"));
            }

            let byte = self.data[self.pos];
            if byte.is_ascii_alphabetic() || byte == b'\'' || byte == b'"' {
                let keyword = self.read_keyword();
                match keyword.as_str() {
                    // Keyword-shaped operands.
                    "true" => operands.push(Object::Boolean(true)),
                    "false" => operands.push(Object::Boolean(false)),
                    "null" => operands.push(Object::Null),
                    _ => {
                        return self.dispatch(&keyword, operands, op_start);
                    },
                }
            } else {
                let input = &self.data[self.pos..];
                let (rest, object) = parse_object(input)
                    .map_err(|_| self.malformed(format!("unparseable token 0x{:02x}", byte)))?;
                self.pos = self.data.len() - rest.len();
                operands.push(object);
            }
        }
    }

    /// Read an operator keyword (letters plus `*`, or a lone `'`/`"`).
    fn read_keyword(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.data.len() && is_regular(self.data[self.pos]) {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.data[start..self.pos]).into_owned()
    }

    fn span(&self, start: usize) -> RawSpan {
        RawSpan {
            offset: start,
            len: self.pos - start,
        }
    }

    fn push_opaque(&mut self, start: usize) {
        let raw = self.span(start);
        self.operations.push(Operation::Opaque { raw });
    }

    fn dispatch(&mut self, keyword: &str, operands: Vec<Object>, op_start: usize) -> Result<()> {
        // An operator interleaved into path construction (illegal, but some
        // generators do it) must not end up inside the path's span as well
        // as its own; flush the construction bytes first so every byte is
        // emitted exactly once.
        match keyword {
            "m" | "l" | "c" | "v" | "y" | "h" | "re" | "W" | "W*" | "S" | "s" | "f" | "F"
            | "f*" | "B" | "B*" | "b" | "b*" | "n" => {},
            _ => self.flush_pending_path_span(),
        }

        match keyword {
            // --- Graphics state ---
            "q" => {
                self.stack.save();
                self.push_opaque(op_start);
            },
            "Q" => {
                if !self.stack.restore() {
                    self.pos = op_start;
                    return Err(self.malformed("unmatched Q (restore without save)"));
                }
                self.push_opaque(op_start);
            },
            "cm" => {
                let m = matrix_from(&operands);
                let state = self.stack.current_mut();
                state.ctm = m.multiply(&state.ctm);
                self.push_opaque(op_start);
            },
            "g" => {
                let v = number(&operands, 0);
                self.stack.current_mut().fill_rgb = [v, v, v];
                self.push_opaque(op_start);
            },
            "G" => {
                let v = number(&operands, 0);
                self.stack.current_mut().stroke_rgb = [v, v, v];
                self.push_opaque(op_start);
            },
            "rg" => {
                self.stack.current_mut().fill_rgb =
                    [number(&operands, 0), number(&operands, 1), number(&operands, 2)];
                self.push_opaque(op_start);
            },
            "RG" => {
                self.stack.current_mut().stroke_rgb =
                    [number(&operands, 0), number(&operands, 1), number(&operands, 2)];
                self.push_opaque(op_start);
            },
            "k" => {
                self.stack.current_mut().fill_rgb = cmyk_to_rgb(&operands);
                self.push_opaque(op_start);
            },
            "K" => {
                self.stack.current_mut().stroke_rgb = cmyk_to_rgb(&operands);
                self.push_opaque(op_start);
            },
            "cs" => {
                // Selecting a color space resets the fill color to its
                // initial value (black in the device spaces we track).
                self.stack.current_mut().fill_rgb = [0.0, 0.0, 0.0];
                self.push_opaque(op_start);
            },
            "CS" => {
                self.stack.current_mut().stroke_rgb = [0.0, 0.0, 0.0];
                self.push_opaque(op_start);
            },
            "sc" | "scn" => {
                if let Some(rgb) = components_to_rgb(&operands) {
                    self.stack.current_mut().fill_rgb = rgb;
                }
                self.push_opaque(op_start);
            },
            "SC" | "SCN" => {
                if let Some(rgb) = components_to_rgb(&operands) {
                    self.stack.current_mut().stroke_rgb = rgb;
                }
                self.push_opaque(op_start);
            },
            // Parameters we preserve but do not need numerically.
            "w" | "J" | "j" | "M" | "d" | "ri" | "i" | "gs" | "sh" | "Tr" | "BMC" | "BDC"
            | "EMC" | "MP" | "DP" => {
                self.push_opaque(op_start);
            },

            // --- Text object and state ---
            "BT" => {
                let state = self.stack.current_mut();
                state.text_matrix = Matrix::identity();
                state.text_line_matrix = Matrix::identity();
                self.push_opaque(op_start);
            },
            "ET" => self.push_opaque(op_start),
            "Tf" => {
                let state = self.stack.current_mut();
                state.font_name = name(&operands, 0).map(|s| s.to_string());
                state.font_size = number(&operands, 1);
                self.push_opaque(op_start);
            },
            "Td" => {
                self.text_move(number(&operands, 0), number(&operands, 1));
                self.push_opaque(op_start);
            },
            "TD" => {
                let ty = number(&operands, 1);
                self.stack.current_mut().leading = -ty;
                self.text_move(number(&operands, 0), ty);
                self.push_opaque(op_start);
            },
            "Tm" => {
                let m = matrix_from(&operands);
                let state = self.stack.current_mut();
                state.text_matrix = m;
                state.text_line_matrix = m;
                self.push_opaque(op_start);
            },
            "T*" => {
                let leading = self.stack.current().leading;
                self.text_move(0.0, -leading);
                self.push_opaque(op_start);
            },
            "TL" => {
                self.stack.current_mut().leading = number(&operands, 0);
                self.push_opaque(op_start);
            },
            "Tc" => {
                self.stack.current_mut().char_space = number(&operands, 0);
                self.push_opaque(op_start);
            },
            "Tw" => {
                self.stack.current_mut().word_space = number(&operands, 0);
                self.push_opaque(op_start);
            },
            "Tz" => {
                self.stack.current_mut().horizontal_scaling = number(&operands, 0);
                self.push_opaque(op_start);
            },
            "Ts" => {
                self.stack.current_mut().text_rise = number(&operands, 0);
                self.push_opaque(op_start);
            },

            // --- Text showing ---
            "Tj" => {
                let bytes = string(&operands, 0).unwrap_or_default();
                self.show_text(&[TextChunk::Bytes(&bytes)], op_start);
            },
            "'" => {
                let leading = self.stack.current().leading;
                self.text_move(0.0, -leading);
                let bytes = string(&operands, 0).unwrap_or_default();
                self.show_text(&[TextChunk::Bytes(&bytes)], op_start);
            },
            "\"" => {
                {
                    let state = self.stack.current_mut();
                    state.word_space = number(&operands, 0);
                    state.char_space = number(&operands, 1);
                }
                let leading = self.stack.current().leading;
                self.text_move(0.0, -leading);
                let bytes = string(&operands, 2).unwrap_or_default();
                self.show_text(&[TextChunk::Bytes(&bytes)], op_start);
            },
            "TJ" => {
                let empty = Vec::new();
                let array = operands.first().and_then(|o| o.as_array()).unwrap_or(&empty);
                let chunks: Vec<TextChunk<'_>> = array
                    .iter()
                    .filter_map(|element| match element {
                        Object::String(s) => Some(TextChunk::Bytes(s)),
                        Object::Integer(i) => Some(TextChunk::Offset(*i as f64)),
                        Object::Real(r) => Some(TextChunk::Offset(*r)),
                        _ => None,
                    })
                    .collect();
                self.show_text(&chunks, op_start);
            },

            // --- Path construction ---
            "m" => {
                self.begin_path_op(op_start, false);
                self.path_points
                    .push(Point::new(number(&operands, 0), number(&operands, 1)));
            },
            "l" => {
                self.begin_path_op(op_start, false);
                self.path_points
                    .push(Point::new(number(&operands, 0), number(&operands, 1)));
            },
            "c" => {
                self.begin_path_op(op_start, false);
                for i in 0..3 {
                    self.path_points
                        .push(Point::new(number(&operands, 2 * i), number(&operands, 2 * i + 1)));
                }
            },
            "v" | "y" => {
                self.begin_path_op(op_start, false);
                for i in 0..2 {
                    self.path_points
                        .push(Point::new(number(&operands, 2 * i), number(&operands, 2 * i + 1)));
                }
            },
            "h" => {
                self.begin_path_op(op_start, false);
            },
            "re" => {
                self.begin_path_op(op_start, true);
                let (x, y) = (number(&operands, 0), number(&operands, 1));
                let (w, h) = (number(&operands, 2), number(&operands, 3));
                self.path_points.push(Point::new(x, y));
                self.path_points.push(Point::new(x + w, y));
                self.path_points.push(Point::new(x + w, y + h));
                self.path_points.push(Point::new(x, y + h));
            },
            "W" | "W*" => {
                if self.path_span_start.is_some() {
                    // Bytes stay inside the open path's span.
                    self.path_span_end = self.pos;
                } else {
                    self.push_opaque(op_start);
                }
            },

            // --- Path painting ---
            "S" | "s" => self.paint_path(PathPaint::Stroke, op_start),
            "f" | "F" | "f*" => self.paint_path(PathPaint::Fill, op_start),
            "B" | "B*" | "b" | "b*" => self.paint_path(PathPaint::FillStroke, op_start),
            "n" => self.paint_path(PathPaint::Clip, op_start),

            // --- XObjects and inline images ---
            "Do" => {
                let resource_name = name(&operands, 0).unwrap_or("").to_string();
                let bbox_top_left = self.unit_square_bbox();
                let raw = self.span(op_start);
                self.operations.push(Operation::ImageXObject {
                    resource_name,
                    bbox_top_left,
                    raw,
                });
            },
            "BI" => {
                return self.parse_inline_image(op_start);
            },

            // --- Anything else rides along verbatim ---
            _ => {
                log::debug!("unknown content operator '{}', preserving verbatim", keyword);
                self.push_opaque(op_start);
            },
        }
        Ok(())
    }

    /// `Td`-style move: translate the line matrix, reset the text matrix.
    fn text_move(&mut self, tx: f64, ty: f64) {
        let state = self.stack.current_mut();
        state.text_line_matrix = Matrix::translation(tx, ty).multiply(&state.text_line_matrix);
        state.text_matrix = state.text_line_matrix;
    }

    /// Emit pending path-construction bytes as `Opaque`, keeping the
    /// accumulated geometry for a later painting operator.
    fn flush_pending_path_span(&mut self) {
        if let Some(start) = self.path_span_start.take() {
            let raw = RawSpan {
                offset: start,
                len: self.path_span_end.saturating_sub(start),
            };
            self.operations.push(Operation::Opaque { raw });
        }
    }

    /// Record the start of a path-construction run.
    fn begin_path_op(&mut self, op_start: usize, is_rect: bool) {
        if self.path_span_start.is_none() {
            self.path_span_start = Some(op_start);
            self.path_all_rects = true;
        }
        if !is_rect {
            self.path_all_rects = false;
        }
        self.path_span_end = self.pos;
    }

    /// Emit a `Path` operation for the accumulated subpaths.
    ///
    /// The span runs from the first construction operator through the
    /// painting operator, so removing the operation removes the geometry
    /// itself, not just the paint instruction.
    fn paint_path(&mut self, kind: PathPaint, op_start: usize) {
        let span_start = self.path_span_start.take().unwrap_or(op_start);
        let raw = self.span(span_start);
        let points = std::mem::take(&mut self.path_points);
        let from_rect = self.path_all_rects && !points.is_empty();
        self.path_all_rects = true;

        if points.is_empty() {
            // A painting operator with no path paints nothing; keep bytes.
            self.operations.push(Operation::Opaque { raw });
            return;
        }

        let ctm = self.stack.current().ctm;
        let bbox_native = aabb(points.iter().map(|p| ctm.transform_point(p.x, p.y)));
        let bbox_top_left = rect_bottom_left_to_top_left(&bbox_native, self.page_height);
        self.operations.push(Operation::Path {
            kind,
            bbox_top_left,
            fill_rgb: self.stack.current().fill_rgb,
            from_rect,
            raw,
        });
    }

    /// The CTM image of the unit square, Y-flipped to top-left points.
    fn unit_square_bbox(&self) -> Rect {
        let ctm = self.stack.current().ctm;
        let corners = [
            ctm.transform_point(0.0, 0.0),
            ctm.transform_point(1.0, 0.0),
            ctm.transform_point(1.0, 1.0),
            ctm.transform_point(0.0, 1.0),
        ];
        let bbox_native = aabb(corners.into_iter());
        rect_bottom_left_to_top_left(&bbox_native, self.page_height)
    }

    /// Walk the glyphs of a show operator, recording per-glyph geometry and
    /// emitting one `Text` operation.
    fn show_text(&mut self, chunks: &[TextChunk<'_>], op_start: usize) {
        let state = self.stack.current().clone();
        let font_size = state.font_size;
        let h_scale = state.horizontal_scaling / 100.0;
        let rise = state.text_rise;
        let to_device = state.text_matrix.multiply(&state.ctm);

        let mut cursor = 0.0f64;
        let mut decoded = String::new();
        let mut bbox_native: Option<Rect> = None;

        for chunk in chunks {
            match chunk {
                TextChunk::Offset(adjustment) => {
                    cursor -= adjustment / 1000.0 * font_size * h_scale;
                },
                TextChunk::Bytes(bytes) => {
                    for &code in *bytes {
                        let glyph_width =
                            metrics::glyph_width_units(code) / 1000.0 * font_size * h_scale;

                        // Glyph boxes hang one font size below the baseline
                        // start, the convention the viewer uses for its
                        // selection rectangles and letter table.
                        let x0 = cursor;
                        let x1 = cursor + glyph_width;
                        let y0 = rise - font_size;
                        let y1 = rise;
                        let rect = aabb(
                            [
                                to_device.transform_point(x0, y0),
                                to_device.transform_point(x1, y0),
                                to_device.transform_point(x1, y1),
                                to_device.transform_point(x0, y1),
                            ]
                            .into_iter(),
                        );
                        let baseline_start = to_device.transform_point(cursor, rise);
                        self.glyphs.push(GlyphBox {
                            code,
                            rect,
                            baseline_start,
                        });

                        bbox_native = Some(match bbox_native {
                            Some(b) => b.union(&rect),
                            None => rect,
                        });
                        if (0x20..=0x7E).contains(&code) {
                            decoded.push(code as char);
                        }

                        let mut advance = glyph_width + state.char_space * h_scale;
                        if code == b' ' {
                            advance += state.word_space * h_scale;
                        }
                        cursor += advance;
                    }
                },
            }
        }

        // Advance the text matrix past everything we showed.
        {
            let state = self.stack.current_mut();
            state.text_matrix = Matrix::translation(cursor, 0.0).multiply(&state.text_matrix);
        }

        let bbox_native = bbox_native.unwrap_or_else(|| {
            // Empty show: a degenerate box at the pen position.
            let pen = to_device.transform_point(0.0, rise);
            Rect::new(pen.x, pen.y, 0.0, 0.0)
        });
        let bbox_top_left = rect_bottom_left_to_top_left(&bbox_native, self.page_height);
        let raw = self.span(op_start);

        self.operations.push(Operation::Text {
            text: decoded,
            font_name: state.font_name.clone(),
            font_size,
            bbox_top_left,
            raw,
        });
    }

    /// Parse `BI <dict> ID <binary> EI` into one `InlineImage` operation.
    ///
    /// The hard part is finding `EI` inside binary data: it must be preceded
    /// by whitespace and followed by whitespace, a delimiter, or the end of
    /// the stream.
    fn parse_inline_image(&mut self, op_start: usize) -> Result<()> {
        let mut dict: Vec<(String, Object)> = Vec::new();

        loop {
            self.skip_ws();
            if self.pos >= self.data.len() {
                return Err(self.malformed("inline image without ID"));
            }
            if self.data[self.pos..].starts_with(b"ID")
                && self
                    .data
                    .get(self.pos + 2)
                    .map(|&b| is_whitespace(b))
                    .unwrap_or(true)
            {
                self.pos += 2;
                break;
            }
            let input = &self.data[self.pos..];
            let (rest, key) = parse_object(input)
                .map_err(|_| self.malformed("unparseable inline image key"))?;
            self.pos = self.data.len() - rest.len();
            let input = &self.data[self.pos..];
            let (rest, value) = parse_object(input)
                .map_err(|_| self.malformed("unparseable inline image value"))?;
            self.pos = self.data.len() - rest.len();
            if let Some(name) = key.as_name() {
                dict.push((name.to_string(), value));
            }
        }

        // One whitespace byte separates ID from the data.
        if self.pos < self.data.len() && is_whitespace(self.data[self.pos]) {
            self.pos += 1;
        }

        // Scan for whitespace + "EI" + (whitespace | delimiter | EOF).
        let rest = &self.data[self.pos..];
        let mut ei_at = None;
        for i in 0..rest.len().saturating_sub(2) {
            if is_whitespace(rest[i]) && &rest[i + 1..i + 3] == b"EI" {
                let after_ok = match rest.get(i + 3) {
                    None => true,
                    Some(&b) => is_whitespace(b) || is_delimiter(b),
                };
                if after_ok {
                    ei_at = Some(i);
                    break;
                }
            }
        }
        let ei_at = ei_at.ok_or_else(|| self.malformed("inline image without EI"))?;
        self.pos += ei_at + 3;

        let lookup = |keys: [&str; 2]| {
            dict.iter()
                .find(|(k, _)| k == keys[0] || k == keys[1])
                .and_then(|(_, v)| v.as_integer())
                .unwrap_or(0)
        };
        let width = lookup(["W", "Width"]);
        let height = lookup(["H", "Height"]);

        let bbox_top_left = self.unit_square_bbox();
        let raw = self.span(op_start);
        self.operations.push(Operation::InlineImage {
            width,
            height,
            bbox_top_left,
            raw,
        });
        Ok(())
    }
}

/// Axis-aligned bounding box of a set of points.
fn aabb(points: impl Iterator<Item = Point>) -> Rect {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

fn number(operands: &[Object], index: usize) -> f64 {
    operands.get(index).and_then(|o| o.as_number()).unwrap_or(0.0)
}

fn name(operands: &[Object], index: usize) -> Option<&str> {
    operands.get(index).and_then(|o| o.as_name())
}

fn string(operands: &[Object], index: usize) -> Option<Vec<u8>> {
    operands
        .get(index)
        .and_then(|o| o.as_string().map(|s| s.to_vec()))
}

fn matrix_from(operands: &[Object]) -> Matrix {
    Matrix {
        a: operands.first().and_then(|o| o.as_number()).unwrap_or(1.0),
        b: number(operands, 1),
        c: number(operands, 2),
        d: operands.get(3).and_then(|o| o.as_number()).unwrap_or(1.0),
        e: number(operands, 4),
        f: number(operands, 5),
    }
}

fn cmyk_to_rgb(operands: &[Object]) -> [f64; 3] {
    let c = number(operands, 0);
    let m = number(operands, 1);
    let y = number(operands, 2);
    let k = number(operands, 3);
    [
        (1.0 - c) * (1.0 - k),
        (1.0 - m) * (1.0 - k),
        (1.0 - y) * (1.0 - k),
    ]
}

/// Interpret `sc`/`scn` component lists as a color; pattern names have no
/// numeric components and leave the color untouched.
fn components_to_rgb(operands: &[Object]) -> Option<[f64; 3]> {
    let components: Vec<f64> = operands.iter().filter_map(|o| o.as_number()).collect();
    match components.len() {
        1 => Some([components[0], components[0], components[0]]),
        3 => Some([components[0], components[1], components[2]]),
        4 => {
            let as_objects: Vec<Object> = components.iter().map(|&v| Object::Real(v)).collect();
            Some(cmyk_to_rgb(&as_objects))
        },
        _ => None,
    }
}
