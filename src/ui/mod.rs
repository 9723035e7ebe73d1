//! UI definitions module

use embedded_graphics::pixelcolor::Rgb888;

pub mod analog_watchface;
pub mod angles;
pub mod assets;
pub mod date;
pub mod layout;
pub mod transform;

pub use analog_watchface::{AnalogWatchFace, DrawError};
pub use assets::{AssetId, AssetProvider, AssetSet, Image, Variant};
pub use transform::{Canvas, Transform};

/// Rendering mode of the watch face
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Full color, second hand shown, redrawn every second
    #[default]
    Interactive,
    /// Low power, no second hand, redrawn on time ticks only
    Ambient,
}

impl Mode {
    pub fn from_ambient(ambient: bool) -> Self {
        if ambient {
            Mode::Ambient
        } else {
            Mode::Interactive
        }
    }

    pub fn is_ambient(self) -> bool {
        self == Mode::Ambient
    }

    /// Asset variant drawn in this mode
    pub fn variant(self) -> Variant {
        match self {
            Mode::Interactive => Variant::Normal,
            Mode::Ambient => Variant::Ambient,
        }
    }
}

/// Sub-pixel screen position, (0, 0) is the top-left corner
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Paint used for the date label
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub color: Rgb888,
    /// Text size in pixels
    pub size: f32,
    pub anti_alias: bool,
}

impl TextStyle {
    /// Date paint in interactive mode
    pub const DATE: TextStyle = TextStyle {
        color: Rgb888::new(0xD4, 0xB6, 0x82),
        size: 29.0,
        anti_alias: true,
    };

    /// Date paint in ambient mode
    pub const DATE_AMBIENT: TextStyle = TextStyle {
        color: Rgb888::new(0xFF, 0xFF, 0xFF),
        size: 29.0,
        anti_alias: false,
    };

    pub fn date(mode: Mode) -> Self {
        match mode {
            Mode::Interactive => Self::DATE,
            Mode::Ambient => Self::DATE_AMBIENT,
        }
    }
}

/// Drawing backend the watch face renders into.
///
/// Every call carries the absolute transform in effect, so a backend never
/// has to keep its own save/restore stack.
pub trait Surface {
    type Error;

    /// Draw `image` with its top-left corner at `origin` in local coordinates,
    /// then map it to the screen through `transform`.
    fn draw_image(
        &mut self,
        image: &Image,
        origin: Position,
        transform: &Transform,
    ) -> Result<(), Self::Error>;

    /// Draw `text` with its baseline starting at `position`.
    fn draw_text(
        &mut self,
        text: &str,
        position: Position,
        style: &TextStyle,
        transform: &Transform,
    ) -> Result<(), Self::Error>;
}
