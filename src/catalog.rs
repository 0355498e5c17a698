//! Rule Catalog - Closed Vocabularies of CarouselSchema v1
//!
//! Pure data. Every membership question the validators ask is answered here.

use std::sync::LazyLock;

use regex::Regex;

/// Slide layout templates understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Cover,
    TitleBody,
    FullText,
    ImageTop,
    ImageBottom,
    ImageFull,
    Quote,
    List,
    Highlight,
    Cta,
    Freeform,
}

impl Layout {
    pub const ALL: [Layout; 11] = [
        Layout::Cover,
        Layout::TitleBody,
        Layout::FullText,
        Layout::ImageTop,
        Layout::ImageBottom,
        Layout::ImageFull,
        Layout::Quote,
        Layout::List,
        Layout::Highlight,
        Layout::Cta,
        Layout::Freeform,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Cover => "cover",
            Layout::TitleBody => "title-body",
            Layout::FullText => "full-text",
            Layout::ImageTop => "image-top",
            Layout::ImageBottom => "image-bottom",
            Layout::ImageFull => "image-full",
            Layout::Quote => "quote",
            Layout::List => "list",
            Layout::Highlight => "highlight",
            Layout::Cta => "cta",
            Layout::Freeform => "freeform",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == name)
    }

    /// Cover and CTA slides are expected to carry typography alone.
    pub fn exempt_from_text_only(self) -> bool {
        matches!(self, Layout::Cover | Layout::Cta)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Tag,
    Heading,
    Paragraph,
    Subtitle,
    Emoji,
    Image,
    Overlay,
    Quote,
    ListItem,
    Highlight,
    Divider,
    Spacer,
}

impl ElementType {
    pub const ALL: [ElementType; 12] = [
        ElementType::Tag,
        ElementType::Heading,
        ElementType::Paragraph,
        ElementType::Subtitle,
        ElementType::Emoji,
        ElementType::Image,
        ElementType::Overlay,
        ElementType::Quote,
        ElementType::ListItem,
        ElementType::Highlight,
        ElementType::Divider,
        ElementType::Spacer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Tag => "tag",
            ElementType::Heading => "heading",
            ElementType::Paragraph => "paragraph",
            ElementType::Subtitle => "subtitle",
            ElementType::Emoji => "emoji",
            ElementType::Image => "image",
            ElementType::Overlay => "overlay",
            ElementType::Quote => "quote",
            ElementType::ListItem => "list-item",
            ElementType::Highlight => "highlight",
            ElementType::Divider => "divider",
            ElementType::Spacer => "spacer",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// Placement variants accepted on `image` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVariant {
    Area,
    Background,
    Inline,
}

impl ImageVariant {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "area" => Some(ImageVariant::Area),
            "background" => Some(ImageVariant::Background),
            "inline" => Some(ImageVariant::Inline),
            _ => None,
        }
    }
}

/// Heading levels a `heading` element may declare.
pub const HEADING_LEVELS: [u8; 3] = [1, 2, 3];

/// Color roles every theme must define.
pub const REQUIRED_THEME_COLORS: [&str; 13] = [
    "background",
    "backgroundSubtle",
    "text",
    "textSecondary",
    "textMuted",
    "highlight",
    "accent",
    "divider",
    "cardBackground",
    "highlightSoft",
    "highlightBorder",
    "iconColor",
    "iconColorAlt",
];

/// Typography categories every theme must define.
pub const REQUIRED_TYPOGRAPHY: [&str; 5] = ["heading", "paragraph", "subtitle", "tag", "quote"];

/// Font families bundled with the editor.
pub const VALID_FONTS: [&str; 12] = [
    "Afacad",
    "Adamina",
    "Archivo",
    "Inter",
    "Space Grotesk",
    "DM Sans",
    "Poppins",
    "Montserrat",
    "Playfair Display",
    "Merriweather",
    "JetBrains Mono",
    "Fira Code",
];

pub fn is_valid_font(family: &str) -> bool {
    VALID_FONTS.contains(&family)
}

static FORBIDDEN_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(div|p|h[1-6]|style|script|link)\b").expect("forbidden markup pattern")
});

/// True when `content` embeds a block-level or executable HTML tag.
pub fn contains_forbidden_markup(content: &str) -> bool {
    FORBIDDEN_MARKUP.is_match(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_names_round_trip() {
        for layout in Layout::ALL {
            assert_eq!(Layout::parse(layout.as_str()), Some(layout));
        }
        assert_eq!(Layout::parse("stats"), None);
        assert_eq!(Layout::parse("Cover"), None);
    }

    #[test]
    fn test_element_type_lookup() {
        assert_eq!(ElementType::parse("list-item"), Some(ElementType::ListItem));
        assert_eq!(ElementType::parse("stat"), None);
    }

    #[test]
    fn test_forbidden_markup() {
        assert!(contains_forbidden_markup("<script>alert(1)</script>"));
        assert!(contains_forbidden_markup("hello <DIV class='x'>"));
        assert!(contains_forbidden_markup("<h3>title"));
        assert!(contains_forbidden_markup("<p>"));
        assert!(!contains_forbidden_markup("no markup here"));
        assert!(!contains_forbidden_markup("<b>bold</b> and <span>"));
        assert!(!contains_forbidden_markup("<pre>code</pre>"));
        assert!(!contains_forbidden_markup("a < p"));
    }

    #[test]
    fn test_font_allow_list() {
        assert!(is_valid_font("Space Grotesk"));
        assert!(!is_valid_font("Comic Sans"));
        assert!(!is_valid_font("inter"));
    }
}
