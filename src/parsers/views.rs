//! Post-processing of the views computed inside the browser.

use super::navigation::nav_style_from_computed;
use crate::results::{
    ColorPalette, Components, ContentSections, DesignSystem, NavStyle, Spacing, Typography,
};
use serde::Deserialize;
use std::collections::HashMap;

/// Number of spacing values kept per pool
const TOP_SPACING: usize = 3;

/// Raw design data as returned by the in-page script
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignProbe {
    pub colors: ColorPalette,
    pub typography: Typography,
    pub components: Components,
    pub spacing_pools: SpacingPools,
}

/// Every margin/padding value observed on block-level and text elements
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SpacingPools {
    pub margins: Vec<i64>,
    pub paddings: Vec<i64>,
}

impl DesignProbe {
    pub fn into_design_system(self) -> DesignSystem {
        DesignSystem {
            colors: self.colors,
            typography: self.typography,
            components: self.components,
            spacing: Spacing {
                common_margins: most_frequent(&self.spacing_pools.margins),
                common_paddings: most_frequent(&self.spacing_pools.paddings),
            },
        }
    }
}

/// The most frequent positive values, most frequent first
///
/// Ties are broken by `HashMap` iteration order, which is randomized per
/// process. Only the choice among equally frequent values is affected.
pub fn most_frequent(values: &[i64]) -> Vec<u32> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for value in values.iter().copied().filter(|v| *v > 0) {
        let Ok(value) = u32::try_from(value) else {
            continue;
        };
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut ranked: Vec<(u32, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(TOP_SPACING).map(|(value, _)| value).collect()
}

/// Put main-content sections into reading order (ascending `bounds.y`)
pub fn order_sections(mut sections: ContentSections) -> ContentSections {
    let main = &mut sections.main_content;
    main.sections.sort_by(|a, b| a.bounds.y.total_cmp(&b.bounds.y));
    main.total_sections = main.sections.len();
    sections
}

/// Computed display of the primary navigation element
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavProbe {
    pub display: String,
    pub flex_direction: String,
}

impl NavProbe {
    pub fn nav_style(&self) -> NavStyle {
        nav_style_from_computed(&self.display, &self.flex_direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{ContentSection, VerticalBounds};

    #[test]
    fn test_most_frequent_ranks_by_count() {
        let values = [16, 8, 16, 24, 16, 8, 32, 0, -4, 8, 24, 8];
        assert_eq!(most_frequent(&values), vec![8, 16, 24]);
    }

    #[test]
    fn test_most_frequent_ignores_non_positive() {
        assert!(most_frequent(&[0, 0, -1]).is_empty());
        assert_eq!(most_frequent(&[12]), vec![12]);
    }

    #[test]
    fn test_most_frequent_tie_picks_from_tied_values() {
        // 10 is the clear winner; one of the three tied values fills each remaining slot
        let result = most_frequent(&[10, 10, 10, 4, 5, 6]);
        assert_eq!(result.len(), 3);
        assert_eq!(result[0], 10);
        assert!(result[1..].iter().all(|v| [4, 5, 6].contains(v)));
        assert_ne!(result[1], result[2]);
    }

    #[test]
    fn test_design_probe_from_script_output() {
        let json = serde_json::json!({
            "colors": {"primary": {"background": "rgb(255, 255, 255)", "text": "rgb(17, 17, 17)", "fontFamily": "Inter"}},
            "typography": {"headings": {"h1": {"fontSize": "48px", "fontWeight": "700"}}},
            "components": {"button": {"backgroundColor": "rgb(0, 0, 255)", "borderRadius": "4px"}},
            "spacingPools": {"margins": [16, 16, 8], "paddings": [4]}
        });
        let probe: DesignProbe = serde_json::from_value(json).unwrap();
        let design = probe.into_design_system();
        let primary = design.colors.primary.unwrap();
        assert_eq!(primary.font_family, "Inter");
        assert_eq!(design.typography.headings["h1"].font_size, "48px");
        assert_eq!(design.components.button.unwrap().border_radius, "4px");
        assert!(design.components.link.is_none());
        assert_eq!(design.spacing.common_margins, vec![16, 8]);
        assert_eq!(design.spacing.common_paddings, vec![4]);
    }

    #[test]
    fn test_order_sections_by_vertical_position() {
        let section = |y: f64| ContentSection {
            bounds: VerticalBounds { y, height: 40.0 },
            ..ContentSection::default()
        };
        let mut sections = ContentSections::default();
        sections.main_content.sections = vec![section(300.0), section(10.0), section(120.0)];

        let ordered = order_sections(sections);
        let ys: Vec<f64> = ordered
            .main_content
            .sections
            .iter()
            .map(|s| s.bounds.y)
            .collect();
        assert_eq!(ys, vec![10.0, 120.0, 300.0]);
        assert_eq!(ordered.main_content.total_sections, 3);
    }
}
