//! Graphics state tracking for content-stream execution.
//!
//! The state is a plain value type; `q`/`Q` push and pop copies on a stack.
//! Unlike a renderer, the redaction interpreter treats an unmatched `Q` as
//! fatal: a stream whose state nesting we cannot trust is a stream whose
//! geometry we cannot trust.

use crate::geometry::Point;

/// A 2D transformation matrix in PDF's six-number form.
///
/// ```text
/// [ a  b  0 ]
/// [ c  d  0 ]
/// [ e  f  1 ]
/// ```
///
/// (a,b,c,d) give scaling/rotation/skew, (e,f) translation. Points are row
/// vectors: `p' = p · M`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    /// Horizontal scaling component
    pub a: f64,
    /// Rotation/skew component
    pub b: f64,
    /// Rotation/skew component
    pub c: f64,
    /// Vertical scaling component
    pub d: f64,
    /// Horizontal translation
    pub e: f64,
    /// Vertical translation
    pub f: f64,
}

impl Matrix {
    /// The identity matrix.
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// A translation matrix.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: tx,
            f: ty,
        }
    }

    /// A scaling matrix.
    pub fn scaling(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Matrix concatenation: the result applies `self` first, then `other`.
    ///
    /// This is the composition order the `cm` and `Tm` operators need:
    /// `new_ctm = operand_matrix.multiply(&ctm)`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point through this matrix.
    pub fn transform_point(&self, x: f64, y: f64) -> Point {
        Point {
            x: self.a * x + self.c * y + self.e,
            y: self.b * x + self.d * y + self.f,
        }
    }

    /// The determinant of the 2x2 part.
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// Graphics state parameters the redaction interpreter cares about.
#[derive(Debug, Clone)]
pub struct GraphicsState {
    /// Current transformation matrix (user space to device space)
    pub ctm: Matrix,
    /// Text matrix (text space to user space)
    pub text_matrix: Matrix,
    /// Text line matrix (position at start of the current line)
    pub text_line_matrix: Matrix,

    /// Character spacing (Tc)
    pub char_space: f64,
    /// Word spacing (Tw)
    pub word_space: f64,
    /// Horizontal scaling percentage (Tz)
    pub horizontal_scaling: f64,
    /// Text leading (TL)
    pub leading: f64,
    /// Current font resource name
    pub font_name: Option<String>,
    /// Current font size (Tf)
    pub font_size: f64,
    /// Text rise (Ts)
    pub text_rise: f64,

    /// Fill color as RGB
    pub fill_rgb: [f64; 3],
    /// Stroke color as RGB
    pub stroke_rgb: [f64; 3],
}

impl GraphicsState {
    /// Initial state: identity CTM, black colors, PDF text-state defaults.
    pub fn new() -> Self {
        Self {
            ctm: Matrix::identity(),
            text_matrix: Matrix::identity(),
            text_line_matrix: Matrix::identity(),
            char_space: 0.0,
            word_space: 0.0,
            horizontal_scaling: 100.0,
            leading: 0.0,
            font_name: None,
            font_size: 0.0,
            text_rise: 0.0,
            fill_rgb: [0.0, 0.0, 0.0],
            stroke_rgb: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self::new()
    }
}

/// Stack of graphics states for `q`/`Q`.
#[derive(Debug, Clone)]
pub struct GraphicsStateStack {
    stack: Vec<GraphicsState>,
}

impl GraphicsStateStack {
    /// Create a stack holding the initial state.
    pub fn new() -> Self {
        Self {
            stack: vec![GraphicsState::new()],
        }
    }

    /// The current state.
    pub fn current(&self) -> &GraphicsState {
        self.stack.last().expect("stack holds at least the initial state")
    }

    /// Mutable access to the current state.
    pub fn current_mut(&mut self) -> &mut GraphicsState {
        self.stack.last_mut().expect("stack holds at least the initial state")
    }

    /// Push a copy of the current state (`q`).
    pub fn save(&mut self) {
        let state = self.current().clone();
        self.stack.push(state);
    }

    /// Pop the current state (`Q`). Returns false on an unmatched `Q`,
    /// which callers must treat as malformed content.
    #[must_use]
    pub fn restore(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Current stack depth; 1 means balanced.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl Default for GraphicsStateStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_identity() {
        let m = Matrix::identity();
        let p = m.transform_point(7.0, 9.0);
        assert_eq!((p.x, p.y), (7.0, 9.0));
    }

    #[test]
    fn test_matrix_translation() {
        let m = Matrix::translation(10.0, 20.0);
        let p = m.transform_point(5.0, 10.0);
        assert_eq!((p.x, p.y), (15.0, 30.0));
    }

    #[test]
    fn test_matrix_scaling() {
        let m = Matrix::scaling(2.0, 3.0);
        let p = m.transform_point(10.0, 10.0);
        assert_eq!((p.x, p.y), (20.0, 30.0));
    }

    #[test]
    fn test_matrix_multiply_order() {
        // self first, then other: translate then scale.
        let result = Matrix::translation(10.0, 20.0).multiply(&Matrix::scaling(2.0, 2.0));
        let p = result.transform_point(5.0, 5.0);
        assert_eq!((p.x, p.y), (30.0, 50.0));

        // The other way round: scale then translate.
        let result = Matrix::scaling(2.0, 2.0).multiply(&Matrix::translation(10.0, 20.0));
        let p = result.transform_point(5.0, 5.0);
        assert_eq!((p.x, p.y), (20.0, 30.0));
    }

    #[test]
    fn test_matrix_determinant() {
        assert_eq!(Matrix::scaling(2.0, 3.0).determinant(), 6.0);
        assert_eq!(Matrix::identity().determinant(), 1.0);
    }

    #[test]
    fn test_state_defaults() {
        let state = GraphicsState::new();
        assert_eq!(state.horizontal_scaling, 100.0);
        assert_eq!(state.fill_rgb, [0.0, 0.0, 0.0]);
        assert!(state.font_name.is_none());
    }

    #[test]
    fn test_stack_save_restore() {
        let mut stack = GraphicsStateStack::new();
        stack.current_mut().font_size = 14.0;
        stack.save();
        stack.current_mut().font_size = 16.0;
        assert!(stack.restore());
        assert_eq!(stack.current().font_size, 14.0);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_stack_underflow_reported() {
        let mut stack = GraphicsStateStack::new();
        assert!(!stack.restore());
        // The initial state survives a reported underflow.
        assert_eq!(stack.depth(), 1);
    }
}
