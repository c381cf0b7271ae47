//! The drawable style value model and the stock style constructors.
//!
//! These are plain data: the host renderer interprets them. Constructors
//! mirror the stock factory set — circle point markers, cluster count
//! badges, circle-with-icon stacks, line and polygon strokes/fills.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An RGBA color with components in `[0, 1]`.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema,
)]
pub struct Color {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
    /// Alpha component.
    pub a: f32,
}

impl Color {
    /// Opaque red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Opaque color from RGB components.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color from RGBA components.
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a `#rrggbb` or `#rgb` hex color (opaque).
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        let channel = |v: u32| v as f32 / 255.0;
        match digits.len() {
            6 => {
                let value = u32::from_str_radix(digits, 16).ok()?;
                Some(Self::rgb(
                    channel((value >> 16) & 0xff),
                    channel((value >> 8) & 0xff),
                    channel(value & 0xff),
                ))
            }
            3 => {
                let value = u32::from_str_radix(digits, 16).ok()?;
                let expand = |v: u32| channel(v | (v << 4));
                Some(Self::rgb(
                    expand((value >> 8) & 0xf),
                    expand((value >> 4) & 0xf),
                    expand(value & 0xf),
                ))
            }
            _ => None,
        }
    }

    /// The same color with its alpha replaced by `opacity`.
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: opacity.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Area fill.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Fill {
    /// Fill color.
    pub color: Color,
}

/// Outline stroke.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Stroke {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

/// A circular marker image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct CircleImage {
    /// Radius in pixels.
    pub radius: f32,
    /// Optional fill.
    pub fill: Option<Fill>,
    /// Optional outline.
    pub stroke: Option<Stroke>,
}

/// A bitmap icon marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct IconImage {
    /// Icon source (URL or asset key, opaque to the engine).
    pub src: String,
    /// Display scale factor.
    pub scale: f32,
}

/// Marker image variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImageStyle {
    /// A circle marker.
    Circle(CircleImage),
    /// A bitmap icon.
    Icon(IconImage),
}

/// A text label drawn with a marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct TextStyle {
    /// Label content.
    pub content: String,
    /// Display scale factor.
    pub scale: f32,
    /// Label fill color.
    pub fill: Fill,
}

/// One drawable style: any combination of a marker image, stroke, fill,
/// and text label. Absent parts are simply not drawn.
#[derive(
    Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema,
)]
#[serde(default)]
pub struct Style {
    /// Point marker image.
    pub image: Option<ImageStyle>,
    /// Line/outline stroke.
    pub stroke: Option<Stroke>,
    /// Area fill.
    pub fill: Option<Fill>,
    /// Text label.
    pub text: Option<TextStyle>,
}

/// The result of style resolution: one style or an ordered stack of styles
/// drawn bottom-up.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// A single style.
    Single(Style),
    /// Several styles drawn in order.
    Stack(Vec<Style>),
}

impl StyleValue {
    /// The contained styles in draw order.
    #[must_use]
    pub fn styles(&self) -> &[Style] {
        match self {
            Self::Single(style) => std::slice::from_ref(style),
            Self::Stack(styles) => styles,
        }
    }
}

/// Parameters for [`point_style`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyleParams {
    /// Marker fill color.
    pub fill_color: Color,
    /// Marker outline color.
    pub stroke_color: Color,
    /// Marker radius in pixels.
    pub radius: f32,
}

impl Default for PointStyleParams {
    fn default() -> Self {
        Self {
            fill_color: Color::RED,
            stroke_color: Color::BLACK,
            radius: 5.0,
        }
    }
}

/// A circular point marker with a 1px outline.
#[must_use]
pub fn point_style(params: PointStyleParams) -> Style {
    Style {
        image: Some(ImageStyle::Circle(CircleImage {
            radius: params.radius,
            fill: Some(Fill {
                color: params.fill_color,
            }),
            stroke: Some(Stroke {
                color: params.stroke_color,
                width: 1.0,
            }),
        })),
        ..Style::default()
    }
}

/// Radius of the stock cluster badge circle.
pub const CLUSTER_BADGE_RADIUS: f32 = 15.0;

/// A cluster badge: fixed-radius circle with the member count as a label.
#[must_use]
pub fn cluster_point_style(count: u32) -> Style {
    Style {
        image: Some(ImageStyle::Circle(CircleImage {
            radius: CLUSTER_BADGE_RADIUS,
            fill: Some(Fill { color: Color::RED }),
            stroke: None,
        })),
        text: Some(TextStyle {
            content: count.to_string(),
            scale: 1.5,
            fill: Fill {
                color: Color::WHITE,
            },
        }),
        ..Style::default()
    }
}

/// Parameters for [`circle_with_icon_style`].
#[derive(Debug, Clone, PartialEq)]
pub struct CircleWithIconParams {
    /// Icon source (URL or asset key).
    pub icon_src: String,
    /// Icon scale factor.
    pub icon_scale: f32,
    /// Backing circle radius in pixels.
    pub circle_radius: f32,
    /// Backing circle color.
    pub circle_color: Color,
}

impl Default for CircleWithIconParams {
    fn default() -> Self {
        Self {
            icon_src: String::new(),
            icon_scale: 1.0,
            circle_radius: 15.0,
            circle_color: Color::RED,
        }
    }
}

/// A two-part style: a backing circle drawn under an icon.
#[must_use]
pub fn circle_with_icon_style(params: CircleWithIconParams) -> StyleValue {
    let circle = Style {
        image: Some(ImageStyle::Circle(CircleImage {
            radius: params.circle_radius,
            fill: Some(Fill {
                color: params.circle_color,
            }),
            stroke: None,
        })),
        ..Style::default()
    };
    let icon = Style {
        image: Some(ImageStyle::Icon(IconImage {
            src: params.icon_src,
            scale: params.icon_scale,
        })),
        ..Style::default()
    };
    StyleValue::Stack(vec![circle, icon])
}

/// Parameters for [`line_string_style`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStringStyleParams {
    /// Line color.
    pub stroke_color: Color,
    /// Line width in pixels.
    pub width: f32,
}

impl Default for LineStringStyleParams {
    fn default() -> Self {
        Self {
            stroke_color: Color::BLUE,
            width: 2.0,
        }
    }
}

/// A stroked polyline style.
#[must_use]
pub fn line_string_style(params: LineStringStyleParams) -> Style {
    Style {
        stroke: Some(Stroke {
            color: params.stroke_color,
            width: params.width,
        }),
        ..Style::default()
    }
}

/// Parameters for [`polygon_style`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonStyleParams {
    /// Outline color.
    pub stroke_color: Color,
    /// Interior fill color.
    pub fill_color: Color,
    /// Outline width in pixels.
    pub width: f32,
}

impl Default for PolygonStyleParams {
    fn default() -> Self {
        Self {
            stroke_color: Color::GREEN,
            fill_color: Color::GREEN.with_opacity(0.4),
            width: 2.0,
        }
    }
}

/// An outlined, filled polygon style.
#[must_use]
pub fn polygon_style(params: PolygonStyleParams) -> Style {
    Style {
        stroke: Some(Stroke {
            color: params.stroke_color,
            width: params.width,
        }),
        fill: Some(Fill {
            color: params.fill_color,
        }),
        ..Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_long_and_short() {
        let c = Color::from_hex("#349BFA").unwrap();
        assert!((c.r - 0x34 as f32 / 255.0).abs() < 1e-6);
        assert!((c.g - 0x9b as f32 / 255.0).abs() < 1e-6);
        assert!((c.b - 0xfa as f32 / 255.0).abs() < 1e-6);
        assert_eq!(c.a, 1.0);

        assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
        assert_eq!(Color::from_hex("#000").unwrap(), Color::BLACK);
    }

    #[test]
    fn hex_parsing_rejects_garbage() {
        assert!(Color::from_hex("red").is_none());
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn opacity_is_clamped() {
        assert_eq!(Color::RED.with_opacity(0.4).a, 0.4);
        assert_eq!(Color::RED.with_opacity(7.0).a, 1.0);
        assert_eq!(Color::RED.with_opacity(-1.0).a, 0.0);
    }

    #[test]
    fn cluster_badge_carries_count_text() {
        let style = cluster_point_style(12);
        let text = style.text.unwrap();
        assert_eq!(text.content, "12");
        assert_eq!(text.scale, 1.5);
    }

    #[test]
    fn circle_with_icon_is_a_two_part_stack() {
        let value = circle_with_icon_style(CircleWithIconParams {
            icon_src: "marker.png".to_owned(),
            ..CircleWithIconParams::default()
        });
        let styles = value.styles();
        assert_eq!(styles.len(), 2);
        assert!(matches!(styles[0].image, Some(ImageStyle::Circle(_))));
        assert!(matches!(
            &styles[1].image,
            Some(ImageStyle::Icon(icon)) if icon.src == "marker.png"
        ));
    }

    #[test]
    fn style_round_trips_through_toml() {
        let style = point_style(PointStyleParams::default());
        let text = toml::to_string(&style).unwrap();
        let parsed: Style = toml::from_str(&text).unwrap();
        assert_eq!(style, parsed);
    }
}
