use foldermenu_config::{MenuConfiguration, MenuFontSize, MenuIconStyle, TitleStyle};

/// Presentation attributes for menu rows, computed from style settings only.
/// 僅依樣式設定計算的選單列顯示屬性。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowStyle {
    /// Square icon edge in pixels; `None` renders no icon.
    pub icon_px: Option<u32>,
    pub font_pt: f32,
    /// Negative offsets drop the text baseline so titles stay visually
    /// centred against larger icons.
    pub baseline_offset: f32,
}

/// What the status-bar button itself shows for a configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusItemStyle {
    pub show_icon: bool,
    pub show_title: bool,
    pub font_pt: f32,
    /// Icon-only items use the fixed square status-item length.
    pub square_length: bool,
}

/// Table-driven row style: icon tier × font tier.
pub fn row_style(configuration: &MenuConfiguration) -> RowStyle {
    let font_pt = match configuration.menu_font_size {
        MenuFontSize::Small => 12.0,
        MenuFontSize::Regular => 14.0,
        MenuFontSize::Large => 16.0,
    };

    let icon_px = match configuration.menu_icon_style {
        MenuIconStyle::LargeIcons => Some(32),
        MenuIconStyle::SmallIcons => match configuration.menu_font_size {
            MenuFontSize::Small => Some(14),
            _ => Some(16),
        },
        MenuIconStyle::NoIcons => None,
    };

    let baseline_offset = match (configuration.menu_icon_style, configuration.menu_font_size) {
        (MenuIconStyle::LargeIcons, MenuFontSize::Small) => -4.0,
        (MenuIconStyle::LargeIcons, _) => -2.0,
        (_, MenuFontSize::Large) => -2.0,
        _ => 0.0,
    };

    RowStyle {
        icon_px,
        font_pt,
        baseline_offset,
    }
}

/// Status-item presentation for the configuration's title style.
pub fn status_item_style(configuration: &MenuConfiguration) -> StatusItemStyle {
    let (show_icon, show_title) = match configuration.title_style {
        TitleStyle::IconAndTitle => (true, true),
        TitleStyle::IconOnly => (true, false),
        TitleStyle::TitleOnly => (false, true),
    };
    StatusItemStyle {
        show_icon,
        show_title,
        font_pt: 13.0,
        square_length: configuration.title_style == TitleStyle::IconOnly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldermenu_config::FolderReference;

    fn configuration(icon: MenuIconStyle, font: MenuFontSize) -> MenuConfiguration {
        let mut config =
            MenuConfiguration::new("Test", FolderReference::for_directory("/tmp/test"));
        config.menu_icon_style = icon;
        config.menu_font_size = font;
        config
    }

    #[test]
    fn font_tiers_map_to_fixed_point_sizes() {
        let cases = [
            (MenuFontSize::Small, 12.0),
            (MenuFontSize::Regular, 14.0),
            (MenuFontSize::Large, 16.0),
        ];
        for (font, expected) in cases {
            let style = row_style(&configuration(MenuIconStyle::SmallIcons, font));
            assert_eq!(style.font_pt, expected);
        }
    }

    #[test]
    fn small_icons_shrink_with_the_small_font() {
        let style = row_style(&configuration(MenuIconStyle::SmallIcons, MenuFontSize::Small));
        assert_eq!(style.icon_px, Some(14));
        let style = row_style(&configuration(
            MenuIconStyle::SmallIcons,
            MenuFontSize::Regular,
        ));
        assert_eq!(style.icon_px, Some(16));
    }

    #[test]
    fn large_icons_lower_the_baseline() {
        let style = row_style(&configuration(MenuIconStyle::LargeIcons, MenuFontSize::Small));
        assert_eq!(style.icon_px, Some(32));
        assert_eq!(style.baseline_offset, -4.0);

        let style = row_style(&configuration(
            MenuIconStyle::LargeIcons,
            MenuFontSize::Regular,
        ));
        assert_eq!(style.baseline_offset, -2.0);
    }

    #[test]
    fn large_font_without_large_icons_still_offsets() {
        let style = row_style(&configuration(MenuIconStyle::NoIcons, MenuFontSize::Large));
        assert_eq!(style.icon_px, None);
        assert_eq!(style.baseline_offset, -2.0);

        let style = row_style(&configuration(
            MenuIconStyle::NoIcons,
            MenuFontSize::Regular,
        ));
        assert_eq!(style.baseline_offset, 0.0);
    }

    #[test]
    fn title_styles_control_the_status_button() {
        let mut config = configuration(MenuIconStyle::SmallIcons, MenuFontSize::Regular);

        config.title_style = TitleStyle::IconAndTitle;
        let style = status_item_style(&config);
        assert!(style.show_icon && style.show_title);
        assert!(!style.square_length);

        config.title_style = TitleStyle::IconOnly;
        let style = status_item_style(&config);
        assert!(style.show_icon && !style.show_title);
        assert!(style.square_length);

        config.title_style = TitleStyle::TitleOnly;
        let style = status_item_style(&config);
        assert!(!style.show_icon && style.show_title);
    }
}
