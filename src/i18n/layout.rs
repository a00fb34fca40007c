//! Direction-aware presentation tokens consumed by cards, tables and the
//! side navigation.

use serde::Serialize;

use super::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Right,
    Center,
}

impl TextAlign {
    pub fn mirrored(self) -> Self {
        match self {
            TextAlign::Left => TextAlign::Right,
            TextAlign::Right => TextAlign::Left,
            TextAlign::Center => TextAlign::Center,
        }
    }

    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Right => "right",
            TextAlign::Center => "center",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    Row,
    RowReverse,
}

/// Physical side of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Tokens for one element, derived from the document direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutTokens {
    pub text_align: TextAlign,
    pub flex_direction: FlexDirection,
    /// Where leading icons sit.
    pub icon_side: Side,
    /// Side that receives the gap between icon and label.
    pub margin_side: Side,
    /// Where the side navigation is docked.
    pub drawer_side: Side,
}

impl LayoutTokens {
    pub fn for_direction(dir: Direction) -> Self {
        let start = match dir {
            Direction::Ltr => Side::Left,
            Direction::Rtl => Side::Right,
        };
        Self {
            text_align: match start {
                Side::Left => TextAlign::Left,
                Side::Right => TextAlign::Right,
            },
            flex_direction: match dir {
                Direction::Ltr => FlexDirection::Row,
                Direction::Rtl => FlexDirection::RowReverse,
            },
            icon_side: start,
            margin_side: start.opposite(),
            drawer_side: start,
        }
    }
}

/// Which way the side-navigation toggle points.
///
/// Expanded drawers point toward their docked edge (collapse), collapsed
/// ones point away from it (expand).
pub fn drawer_chevron(dir: Direction, collapsed: bool) -> Side {
    let docked = LayoutTokens::for_direction(dir).drawer_side;
    if collapsed {
        docked.opposite()
    } else {
        docked
    }
}
