//! Layout of the watch face for one viewport size
//!
//! Everything is derived from the viewport width: the background is scaled
//! to fill it and every hand is scaled by the same factor. The height only
//! places things.

use embedded_graphics::geometry::Size;

use super::{AssetId, AssetSet, Position, Variant};

/// Resolved positions and scaled images for one viewport.
///
/// Origins are the top-left corner of each image before rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub viewport: Size,
    /// Viewport width over reference background width
    pub scale: f32,
    /// Pivot of the hour, minute and second hands
    pub center: Position,
    pub hour_origin: Position,
    pub minute_origin: Position,
    pub second_origin: Position,
    pub battery_origin: Position,
    /// Pivot of the battery hand
    pub battery_anchor: Position,
    /// Baseline start of the date label
    pub date_anchor: Position,
    /// Images scaled to the viewport
    pub assets: AssetSet,
}

impl Layout {
    /// Resolve the layout for `viewport` from the reference images.
    pub fn resolve(viewport: Size, reference: &AssetSet) -> Result<Self, Error> {
        if viewport.width == 0 || viewport.height == 0 {
            return Err(Error::DegenerateViewport);
        }
        let background = reference.size(AssetId::Background, Variant::Normal);
        if background.width == 0 {
            return Err(Error::EmptyBackground);
        }

        let width = viewport.width as f32;
        let height = viewport.height as f32;
        let scale = width / background.width as f32;
        let assets = reference.scaled(scale);

        let center = Position::new(width / 2.0, height / 2.0);

        // Hands hang below their pivot; each ratio is the pivot's distance
        // from the top of the image.
        let hour = assets.size(AssetId::HourHand, Variant::Normal);
        let hour_origin = Position::new(
            center.x - hour.width as f32 / 2.0,
            center.y - hour.height as f32 * 6.0 / 7.0,
        );

        let minute = assets.size(AssetId::MinuteHand, Variant::Normal);
        let minute_origin = Position::new(
            center.x - minute.width as f32 / 2.0,
            center.y - minute.height as f32 * 7.0 / 10.0,
        );

        let second = assets.size(AssetId::SecondHand, Variant::Normal);
        let second_origin = Position::new(
            center.x - second.width as f32 / 2.0,
            center.y - second.height as f32 * 29.0 / 40.0,
        );

        // Battery gauge sits in the left half of the dial
        let battery = assets.size(AssetId::BatteryHand, Variant::Normal);
        let battery_origin = Position::new(width * 14.0 / 39.0, height * 21.0 / 39.0);
        let battery_anchor = Position::new(
            battery_origin.x + battery.width as f32 / 2.0,
            battery_origin.y + battery.height as f32 * 7.0 / 10.0,
        );

        let date_anchor = Position::new(width * 51.0 / 78.0, height * 55.0 / 78.0);

        debug!(
            "Layout resolved for {}x{} (scale {})",
            viewport.width,
            viewport.height,
            scale
        );

        Ok(Self {
            viewport,
            scale,
            center,
            hour_origin,
            minute_origin,
            second_origin,
            battery_origin,
            battery_anchor,
            date_anchor,
            assets,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Viewport width or height is zero
    DegenerateViewport,
    /// Reference background has zero width, no scale can be derived
    EmptyBackground,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{assets::tests::ReferenceAssets, AssetProvider};

    fn reference() -> AssetSet {
        AssetSet::load(&ReferenceAssets).unwrap()
    }

    #[test]
    fn reference_viewport_is_unscaled() {
        let layout = Layout::resolve(Size::new(390, 390), &reference()).unwrap();

        assert_eq!(layout.scale, 1.0);
        assert_eq!(layout.center, Position::new(195.0, 195.0));
        // 28x126 hour hand, pivot 108 px from its top
        assert_eq!(layout.hour_origin, Position::new(181.0, 87.0));
        // 20x180 minute hand, pivot 126 px from its top
        assert_eq!(layout.minute_origin, Position::new(185.0, 69.0));
        // 10x200 second hand, pivot 145 px from its top
        assert_eq!(layout.second_origin, Position::new(190.0, 50.0));
        assert_eq!(layout.battery_origin, Position::new(140.0, 210.0));
        // 12x60 battery hand, pivot 42 px from its top
        assert_eq!(layout.battery_anchor, Position::new(146.0, 252.0));
        assert_eq!(layout.date_anchor, Position::new(255.0, 275.0));
    }

    #[test]
    fn half_size_viewport_scales_hands() {
        let layout = Layout::resolve(Size::new(195, 195), &reference()).unwrap();

        assert_eq!(layout.scale, 0.5);
        assert_eq!(
            layout.assets.size(AssetId::HourHand, Variant::Normal),
            Size::new(14, 63)
        );
        assert_eq!(layout.center, Position::new(97.5, 97.5));
        assert_eq!(layout.hour_origin, Position::new(90.5, 43.5));
    }

    #[test]
    fn height_only_positions() {
        let layout = Layout::resolve(Size::new(390, 468), &reference()).unwrap();

        assert_eq!(layout.scale, 1.0);
        assert_eq!(layout.center, Position::new(195.0, 234.0));
        assert_eq!(layout.battery_origin, Position::new(140.0, 252.0));
        assert_eq!(layout.date_anchor, Position::new(255.0, 330.0));
    }

    #[test]
    fn resolving_twice_is_identical() {
        let assets = reference();
        let first = Layout::resolve(Size::new(240, 240), &assets).unwrap();
        let second = Layout::resolve(Size::new(240, 240), &assets).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn huge_viewport_resolves() {
        let layout = Layout::resolve(Size::new(400_000_000, 400_000_000), &reference()).unwrap();
        assert!(layout.second_origin.y.is_finite());
        assert!(layout.second_origin.y < layout.center.y);
    }

    struct EmptyBackground;

    impl AssetProvider for EmptyBackground {
        fn size(&self, id: AssetId, variant: Variant) -> Option<Size> {
            match id {
                AssetId::Background => Some(Size::new(0, 390)),
                _ => ReferenceAssets.size(id, variant),
            }
        }
    }

    #[test]
    fn empty_background_is_rejected() {
        let assets = AssetSet::load(&EmptyBackground).unwrap();
        assert_eq!(
            Layout::resolve(Size::new(390, 390), &assets),
            Err(Error::EmptyBackground)
        );
    }

    #[test]
    fn degenerate_viewport_is_rejected() {
        let assets = reference();
        assert_eq!(
            Layout::resolve(Size::new(0, 390), &assets),
            Err(Error::DegenerateViewport)
        );
        assert_eq!(
            Layout::resolve(Size::new(390, 0), &assets),
            Err(Error::DegenerateViewport)
        );
    }
}
