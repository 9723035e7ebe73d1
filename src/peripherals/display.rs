//! ST7789 LCD as a watch face surface
//!
//! There are no bitmaps on the watch. The dial is a filled circle and every
//! hand is a filled rectangle of its image size, rotated by the transform.

use display_interface_spi::SPIInterface;
use embassy_nrf::{
    gpio::{AnyPin, Output},
    peripherals::SPI2,
    spim::Spim,
};
use embassy_time::Delay;
use embedded_graphics::{
    mono_font::MonoTextStyle,
    pixelcolor::{Rgb565, Rgb888},
    prelude::*,
    primitives::{Circle, PrimitiveStyle, Triangle},
    text::Text,
};
use mipidsi::{models::ST7789, Builder, Orientation};
use profont::PROFONT_18_POINT;

use pinetime_analog::ui::{
    AssetId, AssetProvider, Image, Position, Surface, TextStyle, Transform, Variant,
};

const LCD_W: u16 = 240;
const LCD_H: u16 = 240;

type Lcd = mipidsi::Display<
    SPIInterface<Spim<'static, SPI2>, Output<'static, AnyPin>, Output<'static, AnyPin>>,
    ST7789,
    Output<'static, AnyPin>,
>;

pub struct Display {
    lcd: Lcd,
}

impl Display {
    /// Initialize the LCD and blank it.
    pub fn init(
        spim: Spim<'static, SPI2>,
        cs: Output<'static, AnyPin>,
        dc: Output<'static, AnyPin>,
        rst: Output<'static, AnyPin>,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc, cs))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst))
            .map_err(|_| Error::Init)?;

        let mut display = Self { lcd };
        display.lcd.clear(Rgb565::BLACK).map_err(|_| Error::Interface)?;
        Ok(display)
    }

    pub fn size(&self) -> Size {
        self.lcd.size()
    }

    fn fill_quad(&mut self, corners: [Point; 4], color: Rgb565) -> Result<(), Error> {
        let style = PrimitiveStyle::with_fill(color);
        Triangle::new(corners[0], corners[1], corners[2])
            .into_styled(style)
            .draw(&mut self.lcd)
            .map_err(|_| Error::Interface)?;
        Triangle::new(corners[0], corners[2], corners[3])
            .into_styled(style)
            .draw(&mut self.lcd)
            .map_err(|_| Error::Interface)
    }
}

impl Surface for Display {
    type Error = Error;

    fn draw_image(
        &mut self,
        image: &Image,
        origin: Position,
        transform: &Transform,
    ) -> Result<(), Error> {
        let color = color_of(image.id, image.variant);
        let (width, height) = (image.size.width as f32, image.size.height as f32);

        if image.id == AssetId::Background {
            let center = transform.apply(Position::new(
                origin.x + width / 2.0,
                origin.y + height / 2.0,
            ));
            return Circle::with_center(to_point(center), image.size.width.min(image.size.height))
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(&mut self.lcd)
                .map_err(|_| Error::Interface);
        }

        let corners = [
            origin,
            Position::new(origin.x + width, origin.y),
            Position::new(origin.x + width, origin.y + height),
            Position::new(origin.x, origin.y + height),
        ]
        .map(|corner| to_point(transform.apply(corner)));
        self.fill_quad(corners, color)
    }

    fn draw_text(
        &mut self,
        text: &str,
        position: Position,
        style: &TextStyle,
        transform: &Transform,
    ) -> Result<(), Error> {
        // Fixed size font, the requested size only applies to scalable ones
        let style = MonoTextStyle::new(&PROFONT_18_POINT, Rgb565::from(style.color));
        Text::new(text, to_point(transform.apply(position)), style)
            .draw(&mut self.lcd)
            .map(|_| ())
            .map_err(|_| Error::Interface)
    }
}

fn to_point(position: Position) -> Point {
    Point::new(libm::roundf(position.x) as i32, libm::roundf(position.y) as i32)
}

fn color_of(id: AssetId, variant: Variant) -> Rgb565 {
    let rgb = match (id, variant) {
        (AssetId::Background, Variant::Normal) => Rgb888::new(0x1a, 0x1f, 0x2e),
        (AssetId::Background, Variant::Ambient) => Rgb888::BLACK,
        (AssetId::HourHand | AssetId::MinuteHand, Variant::Normal) => Rgb888::new(0xd4, 0xb6, 0x82),
        (AssetId::SecondHand, _) => Rgb888::new(0xe0, 0x40, 0x40),
        (AssetId::BatteryHand, Variant::Normal) => Rgb888::new(0x7f, 0xb7, 0x7e),
        (_, Variant::Ambient) => Rgb888::new(0xc0, 0xc0, 0xc0),
    };
    Rgb565::from(rgb)
}

/// Image sizes of the dial, at the 390 px reference resolution
pub struct DialAssets;

impl AssetProvider for DialAssets {
    fn size(&self, id: AssetId, variant: Variant) -> Option<Size> {
        match (id, variant) {
            (AssetId::Background, _) => Some(Size::new(390, 390)),
            (AssetId::HourHand, _) => Some(Size::new(24, 120)),
            (AssetId::MinuteHand, _) => Some(Size::new(16, 176)),
            (AssetId::SecondHand, Variant::Normal) => Some(Size::new(6, 196)),
            (AssetId::SecondHand, Variant::Ambient) => None,
            (AssetId::BatteryHand, _) => Some(Size::new(10, 56)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum Error {
    /// Controller did not come up
    Init,
    /// SPI transfer failed
    Interface,
}
