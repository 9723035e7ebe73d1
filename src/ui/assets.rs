//! Watch face images
//!
//! The core never looks at pixels. An image is an identity, a variant and a
//! size; the surface knows how to paint it.

use embedded_graphics::geometry::Size;

/// Images making up the watch face
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssetId {
    Background = 0,
    HourHand = 1,
    MinuteHand = 2,
    SecondHand = 3,
    BatteryHand = 4,
}

impl AssetId {
    pub const ALL: [AssetId; 5] = [
        AssetId::Background,
        AssetId::HourHand,
        AssetId::MinuteHand,
        AssetId::SecondHand,
        AssetId::BatteryHand,
    ];

    /// The second hand is never drawn in ambient mode, so it has no
    /// low-bit version.
    pub fn has_ambient_variant(self) -> bool {
        self != AssetId::SecondHand
    }
}

/// Image set an asset is taken from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// Full color
    Normal,
    /// Low-bit, for ambient mode
    Ambient,
}

/// Source of image sizes, implemented by the host
pub trait AssetProvider {
    /// Native size of an image, `None` if it is not available.
    fn size(&self, id: AssetId, variant: Variant) -> Option<Size>;
}

/// Image reference handed to the surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Image {
    pub id: AssetId,
    pub variant: Variant,
    /// Size to draw at, already scaled to the viewport
    pub size: Size,
    /// Whether bitmap filtering is used when drawing
    pub filtered: bool,
}

/// Sizes of every image on the face
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssetSet {
    normal: [Size; 5],
    ambient: [Option<Size>; 5],
}

impl AssetSet {
    /// Query all images from the provider.
    ///
    /// Every image and its ambient variant must be present; there is no
    /// fallback rendering.
    pub fn load<P: AssetProvider>(provider: &P) -> Result<Self, Error> {
        let mut normal = [Size::zero(); 5];
        let mut ambient = [None; 5];

        for id in AssetId::ALL {
            normal[id as usize] = provider
                .size(id, Variant::Normal)
                .ok_or(Error::Missing(id, Variant::Normal))?;

            if id.has_ambient_variant() {
                ambient[id as usize] = Some(
                    provider
                        .size(id, Variant::Ambient)
                        .ok_or(Error::Missing(id, Variant::Ambient))?,
                );
            }
        }

        debug!("Loaded watch face assets");
        Ok(Self { normal, ambient })
    }

    /// Size of an image. Variants an image does not have resolve to the
    /// normal version.
    pub fn size(&self, id: AssetId, variant: Variant) -> Size {
        self.resolve(id, variant).1
    }

    /// Image reference for drawing
    pub fn image(&self, id: AssetId, variant: Variant) -> Image {
        let (variant, size) = self.resolve(id, variant);
        Image {
            id,
            variant,
            size,
            filtered: id != AssetId::Background && variant == Variant::Normal,
        }
    }

    /// Scale every image by the same factor, truncating to whole pixels.
    pub fn scaled(&self, scale: f32) -> Self {
        let scale_size = |size: Size| {
            Size::new(
                (size.width as f32 * scale) as u32,
                (size.height as f32 * scale) as u32,
            )
        };

        Self {
            normal: self.normal.map(scale_size),
            ambient: self.ambient.map(|size| size.map(scale_size)),
        }
    }

    fn resolve(&self, id: AssetId, variant: Variant) -> (Variant, Size) {
        match (variant, self.ambient[id as usize]) {
            (Variant::Ambient, Some(size)) => (Variant::Ambient, size),
            _ => (Variant::Normal, self.normal[id as usize]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The provider has no image for this asset and variant
    Missing(AssetId, Variant),
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Reference images of a 390 px face
    pub(crate) struct ReferenceAssets;

    impl AssetProvider for ReferenceAssets {
        fn size(&self, id: AssetId, variant: Variant) -> Option<Size> {
            match (id, variant) {
                (AssetId::Background, _) => Some(Size::new(390, 390)),
                (AssetId::HourHand, _) => Some(Size::new(28, 126)),
                (AssetId::MinuteHand, _) => Some(Size::new(20, 180)),
                (AssetId::SecondHand, Variant::Normal) => Some(Size::new(10, 200)),
                (AssetId::SecondHand, Variant::Ambient) => None,
                (AssetId::BatteryHand, _) => Some(Size::new(12, 60)),
            }
        }
    }

    struct WithoutAmbientMinuteHand;

    impl AssetProvider for WithoutAmbientMinuteHand {
        fn size(&self, id: AssetId, variant: Variant) -> Option<Size> {
            match (id, variant) {
                (AssetId::MinuteHand, Variant::Ambient) => None,
                _ => ReferenceAssets.size(id, variant),
            }
        }
    }

    #[test]
    fn load_reference_assets() {
        let assets = AssetSet::load(&ReferenceAssets).unwrap();
        assert_eq!(
            assets.size(AssetId::HourHand, Variant::Ambient),
            Size::new(28, 126)
        );
    }

    #[test]
    fn missing_asset_fails_to_load() {
        assert_eq!(
            AssetSet::load(&WithoutAmbientMinuteHand),
            Err(Error::Missing(AssetId::MinuteHand, Variant::Ambient))
        );
    }

    #[test]
    fn second_hand_falls_back_to_normal() {
        let assets = AssetSet::load(&ReferenceAssets).unwrap();
        let image = assets.image(AssetId::SecondHand, Variant::Ambient);
        assert_eq!(image.variant, Variant::Normal);
        assert_eq!(image.size, Size::new(10, 200));
    }

    #[test]
    fn only_normal_hands_are_filtered() {
        let assets = AssetSet::load(&ReferenceAssets).unwrap();
        assert!(assets.image(AssetId::HourHand, Variant::Normal).filtered);
        assert!(!assets.image(AssetId::HourHand, Variant::Ambient).filtered);
        assert!(!assets.image(AssetId::Background, Variant::Normal).filtered);
    }

    #[test]
    fn scaling_truncates() {
        let assets = AssetSet::load(&ReferenceAssets).unwrap().scaled(0.5);
        assert_eq!(assets.size(AssetId::HourHand, Variant::Normal), Size::new(14, 63));
        assert_eq!(assets.size(AssetId::MinuteHand, Variant::Normal), Size::new(10, 90));
        assert_eq!(assets.size(AssetId::BatteryHand, Variant::Ambient), Size::new(6, 30));
        assert_eq!(assets.size(AssetId::Background, Variant::Normal), Size::new(195, 195));
    }
}
