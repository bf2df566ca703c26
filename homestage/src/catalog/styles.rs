//! Interior style catalog.

use serde::Serialize;

/// A selectable furnishing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InteriorStyle {
    /// Stable identifier used by callers.
    pub id: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Design description used by prompt-driven staging backends.
    pub design_prompt: &'static str,
    /// Value in the furniture-placement capability's style vocabulary.
    pub staging_style: &'static str,
}

/// Every furnishing style a request may select.
pub const INTERIOR_STYLES: &[InteriorStyle] = &[
    InteriorStyle {
        id: "modern",
        label: "Modern",
        design_prompt: "modern interior design, sleek furniture, clean lines, neutral colors with accent pieces, contemporary lighting, minimalist decor, high-end finishes",
        staging_style: "Modern",
    },
    InteriorStyle {
        id: "scandinavian",
        label: "Scandinavian",
        design_prompt: "scandinavian interior design, light wood furniture, white and beige tones, cozy textiles, hygge atmosphere, natural materials, simple elegant forms",
        staging_style: "Scandinavian",
    },
    InteriorStyle {
        id: "classic",
        label: "Classic",
        design_prompt: "classic traditional interior design, elegant furniture, rich fabrics, warm wood tones, ornamental details, sophisticated lighting, timeless decor",
        staging_style: "Traditional",
    },
    InteriorStyle {
        id: "industrial",
        label: "Industrial",
        design_prompt: "industrial interior design, exposed brick, metal accents, raw wood, Edison bulbs, leather furniture, loft-style decor, urban atmosphere",
        staging_style: "Urban Industrial",
    },
    InteriorStyle {
        id: "minimalist",
        label: "Minimalist",
        design_prompt: "minimalist interior design, essential furniture only, monochromatic palette, clean surfaces, plenty of open space, zen-like atmosphere, less is more",
        staging_style: "Modern Organic",
    },
    InteriorStyle {
        id: "boho",
        label: "Boho",
        design_prompt: "bohemian interior design, eclectic mix of patterns and textures, warm earthy colors, plants, macrame, vintage furniture, layered textiles, cozy and artistic",
        staging_style: "Farmhouse",
    },
];

/// Looks up a furnishing style by id.
#[must_use]
pub fn find_style(id: &str) -> Option<&'static InteriorStyle> {
    INTERIOR_STYLES.iter().find(|style| style.id == id)
}
