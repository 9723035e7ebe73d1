//! Transform composition
//!
//! Hands are drawn by rotating the canvas, and each rotation applies on top
//! of the previous one. Instead of a hidden save/restore stack on the
//! backend, the current transform is a plain value owned by [`Canvas`] and
//! restored by [`Canvas::save`] whatever the drawing closure returns.

use super::{Image, Position, Surface, TextStyle};

/// 2D affine transform mapping local coordinates to the screen.
///
/// `x' = a·x + c·y + tx`, `y' = b·x + d·y + ty`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    tx: f32,
    ty: f32,
    /// Net rotation, the sum of every rotation applied
    degrees: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
        degrees: 0.0,
    };

    /// Clockwise rotation by `degrees` about `pivot` (screen y points down).
    pub fn rotation(degrees: f32, pivot: Position) -> Self {
        let radians = degrees.to_radians();
        let (sin, cos) = (libm::sinf(radians), libm::cosf(radians));

        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: pivot.x - cos * pivot.x + sin * pivot.y,
            ty: pivot.y - sin * pivot.x - cos * pivot.y,
            degrees,
        }
    }

    /// Apply `local` first, then `self`.
    pub fn then(&self, local: &Transform) -> Self {
        Self {
            a: self.a * local.a + self.c * local.b,
            b: self.b * local.a + self.d * local.b,
            c: self.a * local.c + self.c * local.d,
            d: self.b * local.c + self.d * local.d,
            tx: self.a * local.tx + self.c * local.ty + self.tx,
            ty: self.b * local.tx + self.d * local.ty + self.ty,
            degrees: self.degrees + local.degrees,
        }
    }

    /// Rotate further by `degrees` about `pivot`, given in local coordinates.
    pub fn rotate(&self, degrees: f32, pivot: Position) -> Self {
        self.then(&Transform::rotation(degrees, pivot))
    }

    /// Net clockwise rotation in degrees.
    pub fn degrees(&self) -> f32 {
        self.degrees
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Map a local point to the screen.
    pub fn apply(&self, point: Position) -> Position {
        Position::new(
            self.a * point.x + self.c * point.y + self.tx,
            self.b * point.x + self.d * point.y + self.ty,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Drawing surface with a current transform
pub struct Canvas<'a, S: Surface> {
    surface: &'a mut S,
    transform: Transform,
}

impl<'a, S: Surface> Canvas<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        Self {
            surface,
            transform: Transform::IDENTITY,
        }
    }

    /// Run `draw` and put the transform back afterwards, including when it
    /// returns early with an error.
    pub fn save<R>(&mut self, draw: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.transform;
        let result = draw(self);
        self.transform = saved;
        result
    }

    /// Rotate by `degrees` about `pivot` on top of the current transform.
    pub fn rotate(&mut self, degrees: f32, pivot: Position) {
        self.transform = self.transform.rotate(degrees, pivot);
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn draw_image(&mut self, image: &Image, origin: Position) -> Result<(), S::Error> {
        self.surface.draw_image(image, origin, &self.transform)
    }

    pub fn draw_text(
        &mut self,
        text: &str,
        position: Position,
        style: &TextStyle,
    ) -> Result<(), S::Error> {
        self.surface.draw_text(text, position, style, &self.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    fn assert_close(actual: Position, expected: Position) {
        assert!(
            (actual.x - expected.x).abs() < EPSILON && (actual.y - expected.y).abs() < EPSILON,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn quarter_turn_is_clockwise() {
        let pivot = Position::new(10.0, 10.0);
        let transform = Transform::rotation(90.0, pivot);

        // twelve o'clock goes to three o'clock
        assert_close(transform.apply(Position::new(10.0, 0.0)), Position::new(20.0, 10.0));
        assert_close(transform.apply(pivot), pivot);
    }

    #[test]
    fn rotations_about_one_pivot_add_up() {
        let pivot = Position::new(120.0, 120.0);
        let stepwise = Transform::IDENTITY
            .rotate(97.5, pivot)
            .rotate(-7.5, pivot)
            .rotate(90.0, pivot);
        let direct = Transform::rotation(180.0, pivot);

        assert_eq!(stepwise.degrees(), 180.0);
        for point in [Position::new(120.0, 0.0), Position::new(7.0, 33.0)] {
            assert_close(stepwise.apply(point), direct.apply(point));
        }
    }

    #[test]
    fn rotations_about_different_pivots_compose() {
        let outer = Transform::rotation(90.0, Position::new(0.0, 0.0));
        let composed = outer.rotate(90.0, Position::new(10.0, 0.0));

        // (10, -10) -> (20, 0) about (10, 0), then -> (0, 20) about the origin
        assert_close(composed.apply(Position::new(10.0, -10.0)), Position::new(0.0, 20.0));
        assert_eq!(composed.degrees(), 180.0);
    }

    struct Recorder(Vec<Transform>);

    impl Surface for Recorder {
        type Error = ();

        fn draw_image(&mut self, _: &Image, _: Position, transform: &Transform) -> Result<(), ()> {
            self.0.push(*transform);
            Ok(())
        }

        fn draw_text(
            &mut self,
            _: &str,
            _: Position,
            _: &TextStyle,
            _: &Transform,
        ) -> Result<(), ()> {
            Err(())
        }
    }

    #[test]
    fn save_restores_after_error() {
        let mut recorder = Recorder(Vec::new());
        let mut canvas = Canvas::new(&mut recorder);

        let result = canvas.save(|canvas| -> Result<(), ()> {
            canvas.rotate(45.0, Position::new(5.0, 5.0));
            canvas.draw_text("x", Position::ORIGIN, &TextStyle::DATE)?;
            canvas.rotate(45.0, Position::new(5.0, 5.0));
            Ok(())
        });

        assert_eq!(result, Err(()));
        assert!(canvas.transform().is_identity());
    }
}
