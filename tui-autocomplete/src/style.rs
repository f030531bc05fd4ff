//! Layered style resolution
//!
//! Every region of the field is styled by three [`StyleLayer`]s merged key by
//! key: the universal base, the variant for the current [`Platform`], and the
//! caller's override. A key set in a later layer replaces the earlier value;
//! unset keys fall through.

use std::str::FromStr;
use std::sync::OnceLock;

use bitflags::bitflags;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};
use serde::{Deserialize, Serialize};

const BORDER_GREY: Color = Color::Rgb(0xb9, 0xb9, 0xb9);

bitflags! {
    /// Border edges drawn around a region
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Edges: u8 {
        const TOP = 0b0001;
        const RIGHT = 0b0010;
        const BOTTOM = 0b0100;
        const LEFT = 0b1000;
        const ALL = Self::TOP.bits() | Self::RIGHT.bits() | Self::BOTTOM.bits() | Self::LEFT.bits();
    }
}

impl From<Edges> for Borders {
    fn from(edges: Edges) -> Self {
        let mut borders = Borders::NONE;
        if edges.contains(Edges::TOP) {
            borders |= Borders::TOP;
        }
        if edges.contains(Edges::RIGHT) {
            borders |= Borders::RIGHT;
        }
        if edges.contains(Edges::BOTTOM) {
            borders |= Borders::BOTTOM;
        }
        if edges.contains(Edges::LEFT) {
            borders |= Borders::LEFT;
        }
        borders
    }
}

/// How the list region is placed relative to the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Normal block below the input, inside the container
    #[default]
    Flow,
    /// Drawn on top of whatever is below the input, sized to its rows
    Overlay,
}

/// One layer of style keys; `None` means "not set by this layer"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleLayer {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: Option<bool>,
    pub borders: Option<Edges>,
    pub border_color: Option<Color>,
    pub margin_top: Option<u16>,
    pub margin_bottom: Option<u16>,
    /// Left and right margin
    pub margin_x: Option<u16>,
    /// Left and right padding inside the borders
    pub padding_x: Option<u16>,
    /// Content height in rows, borders excluded
    pub height: Option<u16>,
    pub position: Option<Placement>,
    pub z_index: Option<i16>,
    /// Share of leftover vertical space (0 = size to content)
    pub flex: Option<u16>,
}

macro_rules! merge_keys {
    ($base:expr, $over:expr, $($key:ident),+ $(,)?) => {
        StyleLayer {
            $($key: $over.$key.or($base.$key),)+
        }
    };
}

impl StyleLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay `over` on top of `self`, key by key
    pub fn merge(&self, over: &StyleLayer) -> StyleLayer {
        merge_keys!(
            self,
            over,
            fg,
            bg,
            bold,
            borders,
            border_color,
            margin_top,
            margin_bottom,
            margin_x,
            padding_x,
            height,
            position,
            z_index,
            flex,
        )
    }

    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn with_borders(mut self, edges: Edges) -> Self {
        self.borders = Some(edges);
        self
    }

    pub fn with_border_color(mut self, color: Color) -> Self {
        self.border_color = Some(color);
        self
    }

    pub fn with_margin_x(mut self, margin: u16) -> Self {
        self.margin_x = Some(margin);
        self
    }

    pub fn with_padding_x(mut self, padding: u16) -> Self {
        self.padding_x = Some(padding);
        self
    }

    pub fn with_height(mut self, rows: u16) -> Self {
        self.height = Some(rows);
        self
    }

    pub fn with_position(mut self, position: Placement) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_z_index(mut self, z: i16) -> Self {
        self.z_index = Some(z);
        self
    }

    pub fn edges(&self) -> Edges {
        self.borders.unwrap_or(Edges::empty())
    }

    pub fn placement(&self) -> Placement {
        self.position.unwrap_or_default()
    }

    /// Text style (colors and weight) for content drawn in this region
    pub fn text_style(&self) -> Style {
        let mut style = Style::default();
        if let Some(fg) = self.fg {
            style = style.fg(fg);
        }
        if let Some(bg) = self.bg {
            style = style.bg(bg);
        }
        if self.bold == Some(true) {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }

    /// Block drawing the borders and background, if the layer has any
    pub fn block(&self) -> Option<Block<'static>> {
        let edges = self.edges();
        if edges.is_empty() && self.bg.is_none() {
            return None;
        }
        let mut block = Block::default().borders(Borders::from(edges));
        if let Some(color) = self.border_color {
            block = block.border_style(Style::default().fg(color));
        }
        if let Some(bg) = self.bg {
            block = block.style(Style::default().bg(bg));
        }
        Some(block)
    }

    /// Rows taken by the top and bottom borders
    pub fn border_rows(&self) -> u16 {
        let edges = self.edges();
        u16::from(edges.contains(Edges::TOP)) + u16::from(edges.contains(Edges::BOTTOM))
    }

    /// Area left after applying margins
    pub fn outer(&self, area: Rect) -> Rect {
        let mx = self.margin_x.unwrap_or(0);
        shrink(
            area,
            self.margin_top.unwrap_or(0),
            mx,
            self.margin_bottom.unwrap_or(0),
            mx,
        )
    }

    /// Area left for content after borders and padding
    pub fn inner(&self, area: Rect) -> Rect {
        let edges = self.edges();
        let pad = self.padding_x.unwrap_or(0);
        shrink(
            area,
            u16::from(edges.contains(Edges::TOP)),
            u16::from(edges.contains(Edges::RIGHT)) + pad,
            u16::from(edges.contains(Edges::BOTTOM)),
            u16::from(edges.contains(Edges::LEFT)) + pad,
        )
    }

    /// Full height of a region showing `content_rows`, margins included
    pub fn outer_height(&self, content_rows: u16) -> u16 {
        content_rows
            .saturating_add(self.border_rows())
            .saturating_add(self.margin_top.unwrap_or(0))
            .saturating_add(self.margin_bottom.unwrap_or(0))
    }
}

fn shrink(area: Rect, top: u16, right: u16, bottom: u16, left: u16) -> Rect {
    let left = left.min(area.width);
    let right = right.min(area.width - left);
    let top = top.min(area.height);
    let bottom = bottom.min(area.height - top);
    Rect::new(
        area.x + left,
        area.y + top,
        area.width - left - right,
        area.height - top - bottom,
    )
}

/// One style layer per region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegionStyles {
    pub container: StyleLayer,
    pub input_container: StyleLayer,
    pub input: StyleLayer,
    pub list_container: StyleLayer,
    pub list: StyleLayer,
}

impl RegionStyles {
    /// Merge `over` on top of `self`, region by region
    pub fn merge(&self, over: &RegionStyles) -> RegionStyles {
        RegionStyles {
            container: self.container.merge(&over.container),
            input_container: self.input_container.merge(&over.input_container),
            input: self.input.merge(&over.input),
            list_container: self.list_container.merge(&over.list_container),
            list: self.list.merge(&over.list),
        }
    }
}

/// Platform style variant
///
/// Android places the list inline below the input; iOS draws it as a
/// full-width overlay stacked above sibling content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

static PLATFORM: OnceLock<Platform> = OnceLock::new();

impl Platform {
    /// Platform for this process, chosen on first use
    pub fn current() -> Platform {
        *PLATFORM.get_or_init(Platform::detect)
    }

    /// Pin the process platform before anything reads it
    ///
    /// Returns the already-selected platform if one was chosen earlier.
    pub fn select(platform: Platform) -> Result<(), Platform> {
        PLATFORM.set(platform).map_err(|_| Platform::current())
    }

    fn detect() -> Platform {
        if cfg!(any(target_os = "ios", target_os = "macos")) {
            Platform::Ios
        } else {
            Platform::Android
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Styles shared by every platform
pub fn base_styles() -> RegionStyles {
    RegionStyles {
        input: StyleLayer::new().with_height(1).with_padding_x(1),
        ..Default::default()
    }
}

/// Styles specific to one platform
pub fn platform_styles(platform: Platform) -> RegionStyles {
    let bordered = StyleLayer::new()
        .with_borders(Edges::ALL)
        .with_border_color(BORDER_GREY);
    let list = StyleLayer::new()
        .with_borders(Edges::LEFT | Edges::RIGHT | Edges::BOTTOM)
        .with_border_color(BORDER_GREY);

    match platform {
        Platform::Android => RegionStyles {
            container: StyleLayer {
                flex: Some(1),
                ..Default::default()
            },
            input_container: StyleLayer {
                margin_bottom: Some(0),
                ..bordered
            },
            list: StyleLayer {
                margin_top: Some(0),
                margin_bottom: Some(1),
                ..list.with_margin_x(1).with_position(Placement::Flow)
            },
            ..Default::default()
        },
        Platform::Ios => RegionStyles {
            container: StyleLayer::new().with_z_index(1),
            input_container: bordered,
            input: StyleLayer::new().with_height(1).with_padding_x(1),
            list: list.with_margin_x(0).with_position(Placement::Overlay),
            ..Default::default()
        },
    }
}

/// Merges base, platform and caller styles into the final region styles
///
/// The platform is fixed when the resolver is built, so resolution itself is
/// a pure function of the caller's overrides.
#[derive(Debug, Clone)]
pub struct StyleResolver {
    platform: Platform,
    defaults: RegionStyles,
}

impl StyleResolver {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            defaults: base_styles().merge(&platform_styles(platform)),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Base and platform layers, before any caller override
    pub fn defaults(&self) -> &RegionStyles {
        &self.defaults
    }

    pub fn resolve(&self, overrides: &RegionStyles) -> RegionStyles {
        self.defaults.merge(overrides)
    }
}
