//! Named widget styles and the card template they render through

use askama::Template;
use std::collections::BTreeMap;

use super::assets::{EncodedImage, WidgetImages};
use super::frame::CardText;
use super::options::WidgetOptions;
use crate::errors::{WidgetError, WidgetResult};
use crate::models::BotRecord;

/// Which of the bundled backgrounds a theme draws behind the card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundVariant {
    Normal,
    Dark,
    Inverted,
}

impl BackgroundVariant {
    fn pick(self, images: &WidgetImages) -> &EncodedImage {
        match self {
            Self::Normal => &images.background,
            Self::Dark => &images.dark_background,
            Self::Inverted => &images.inverted_background,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub stats: &'static str,
    pub shadow_opacity: f64,
    pub background: BackgroundVariant,
}

pub const DEFAULT: Theme = Theme {
    name: "default",
    title: "#23272a",
    description: "#4f545c",
    stats: "#747f8d",
    shadow_opacity: 0.15,
    background: BackgroundVariant::Normal,
};

pub const DARK: Theme = Theme {
    name: "dark",
    title: "#ffffff",
    description: "#dcddde",
    stats: "#b9bbbe",
    shadow_opacity: 0.5,
    background: BackgroundVariant::Dark,
};

pub const INVERTED: Theme = Theme {
    name: "inverted",
    title: "#ffffff",
    description: "#f6f6f6",
    stats: "#e3e7f8",
    shadow_opacity: 0.35,
    background: BackgroundVariant::Inverted,
};

pub const ALL: [Theme; 3] = [DEFAULT, DARK, INVERTED];

/// Everything a style needs to draw one card
pub struct WidgetBindings<'a> {
    pub bot: &'a BotRecord,
    pub text: &'a CardText,
    pub options: &'a WidgetOptions,
    pub avatar: &'a EncodedImage,
    pub images: &'a WidgetImages,
}

#[derive(Template)]
#[template(path = "widgets/card.svg", escape = "html")]
struct CardTemplate<'a> {
    theme: &'a Theme,
    bot: &'a BotRecord,
    text: &'a CardText,
    options: &'a WidgetOptions,
    avatar: &'a EncodedImage,
    background: &'a EncodedImage,
    logo: &'a EncodedImage,
}

impl CardTemplate<'_> {
    fn corner_radius(&self) -> u32 {
        if self.options.rounded { 12 } else { 0 }
    }
}

/// Read-only mapping of style name to theme
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    styles: BTreeMap<&'static str, Theme>,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new(ALL)
    }
}

impl StyleRegistry {
    pub fn new(themes: impl IntoIterator<Item = Theme>) -> Self {
        Self {
            styles: themes.into_iter().map(|theme| (theme.name, theme)).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.styles.keys().copied()
    }

    pub fn render(&self, name: &str, bindings: &WidgetBindings<'_>) -> WidgetResult<String> {
        let theme = self
            .styles
            .get(name)
            .ok_or_else(|| WidgetError::UnknownStyle(name.to_string()))?;

        let template = CardTemplate {
            theme,
            bot: bindings.bot,
            text: bindings.text,
            options: bindings.options,
            avatar: bindings.avatar,
            background: theme.background.pick(bindings.images),
            logo: &bindings.images.logo,
        };

        Ok(template.render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_bot;
    use crate::widget::frame::TextBlock;

    fn images() -> WidgetImages {
        WidgetImages {
            background: EncodedImage::from_bytes("image/svg+xml", b"normal"),
            dark_background: EncodedImage::from_bytes("image/svg+xml", b"dark"),
            inverted_background: EncodedImage::from_bytes("image/svg+xml", b"inverted"),
            logo: EncodedImage::from_bytes("image/png", b"logo"),
        }
    }

    fn text() -> CardText {
        let block = |path: &str| TextBlock {
            path: path.to_string(),
            x: 10.0,
            y: 20.5,
        };
        CardText {
            title: block("M0 0L1 1Z"),
            description: block("M2 2L3 3Z"),
            stats: block("M4 4L5 5Z"),
        }
    }

    fn render(style: &str, options: &WidgetOptions) -> WidgetResult<String> {
        let mut bot = test_bot("42");
        bot.username = "Tom & <Jerry>".to_string();
        let text = text();
        let images = images();
        let avatar = EncodedImage::from_bytes("image/png", b"avatar");

        StyleRegistry::default().render(
            style,
            &WidgetBindings {
                bot: &bot,
                text: &text,
                options,
                avatar: &avatar,
                images: &images,
            },
        )
    }

    #[test]
    fn test_builtin_styles() {
        let registry = StyleRegistry::default();
        assert!(registry.contains("default"));
        assert!(registry.contains("dark"));
        assert!(registry.contains("inverted"));
        assert!(!registry.contains("neon"));
        assert_eq!(registry.names().count(), 3);
    }

    #[test]
    fn test_unknown_style() {
        let err = render("neon", &WidgetOptions::default()).unwrap_err();
        assert!(matches!(err, WidgetError::UnknownStyle(name) if name == "neon"));
    }

    #[test]
    fn test_renders_paths_positions_and_images() {
        let svg = render("default", &WidgetOptions::default()).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"d="M0 0L1 1Z""#));
        assert!(svg.contains(r#"d="M4 4L5 5Z""#));
        assert!(svg.contains("translate(10 20.5)"));
        assert!(svg.contains(&EncodedImage::from_bytes("", b"normal").base64));
        assert!(svg.contains(&EncodedImage::from_bytes("", b"avatar").base64));
        assert!(svg.contains("filter=\"url(#shadow)\""));
        assert!(svg.contains(r#"rx="0""#));
    }

    #[test]
    fn test_theme_selects_background_variant() {
        let svg = render("dark", &WidgetOptions::default()).unwrap();
        assert!(svg.contains(&EncodedImage::from_bytes("", b"dark").base64));
        assert!(!svg.contains(&EncodedImage::from_bytes("", b"normal").base64));
    }

    #[test]
    fn test_options_change_markup() {
        let options = WidgetOptions {
            shadows: false,
            rounded: true,
            background: Some("#123456".to_string()),
        };
        let svg = render("default", &options).unwrap();

        assert!(!svg.contains("feDropShadow"));
        assert!(svg.contains(r#"rx="12""#));
        assert!(svg.contains(r##"fill="#123456""##));
        assert!(!svg.contains(&EncodedImage::from_bytes("", b"normal").base64));
    }

    #[test]
    fn test_bot_name_is_escaped() {
        let svg = render("default", &WidgetOptions::default()).unwrap();
        assert!(svg.contains("Tom &amp; &lt;Jerry&gt;"));
    }
}
