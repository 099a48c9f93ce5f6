//! The fixed catalog of the 30 cell-nucleus features.
//!
//! Ten base measurements are recorded in three variants each. Column names are
//! listed explicitly rather than derived, because the dataset is not consistent
//! about separators: `concave points_mean` keeps its space while
//! `fractal_dimension_mean` uses an underscore.

use serde::Serialize;

/// Number of numeric features in a record.
pub const FEATURE_COUNT: usize = 30;

/// One of the ten base measurements, used as a radar axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Radius,
    Texture,
    Perimeter,
    Area,
    Smoothness,
    Compactness,
    Concavity,
    ConcavePoints,
    Symmetry,
    FractalDimension,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Radius,
        Category::Texture,
        Category::Perimeter,
        Category::Area,
        Category::Smoothness,
        Category::Compactness,
        Category::Concavity,
        Category::ConcavePoints,
        Category::Symmetry,
        Category::FractalDimension,
    ];

    /// Axis label shown on the radar chart.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::Radius => "Radius",
            Category::Texture => "Texture",
            Category::Perimeter => "Perimeter",
            Category::Area => "Area",
            Category::Smoothness => "Smoothness",
            Category::Compactness => "Compactness",
            Category::Concavity => "Concavity",
            Category::ConcavePoints => "Concave Points",
            Category::Symmetry => "Symmetry",
            Category::FractalDimension => "Fractal Dimension",
        }
    }
}

/// Which statistic of a base measurement a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Variant {
    Mean,
    StandardError,
    Worst,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Mean, Variant::StandardError, Variant::Worst];

    /// Legend entry of the radar trace drawn for this variant.
    pub fn trace_name(self) -> &'static str {
        match self {
            Variant::Mean => "Mean Value",
            Variant::StandardError => "Standard Error",
            Variant::Worst => "Worst Value",
        }
    }

    /// Sidebar group heading.
    pub fn heading(self) -> &'static str {
        match self {
            Variant::Mean => "Mean",
            Variant::StandardError => "Standard error",
            Variant::Worst => "Worst",
        }
    }
}

/// A single dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Feature {
    /// Exact header name in the CSV and in the artifacts.
    pub column: &'static str,
    /// Human readable slider label.
    pub label: &'static str,
    pub category: Category,
    pub variant: Variant,
}

const fn feature(
    column: &'static str,
    label: &'static str,
    category: Category,
    variant: Variant,
) -> Feature {
    Feature {
        column,
        label,
        category,
        variant,
    }
}

use Category::*;
use Variant::*;

/// All features in input order: grouped by variant, then by category.
pub static FEATURES: [Feature; FEATURE_COUNT] = [
    feature("radius_mean", "Radius (mean)", Radius, Mean),
    feature("texture_mean", "Texture (mean)", Texture, Mean),
    feature("perimeter_mean", "Perimeter (mean)", Perimeter, Mean),
    feature("area_mean", "Area (mean)", Area, Mean),
    feature("smoothness_mean", "Smoothness (mean)", Smoothness, Mean),
    feature("compactness_mean", "Compactness (mean)", Compactness, Mean),
    feature("concavity_mean", "Concavity (mean)", Concavity, Mean),
    feature("concave points_mean", "Concave points (mean)", ConcavePoints, Mean),
    feature("symmetry_mean", "Symmetry (mean)", Symmetry, Mean),
    feature("fractal_dimension_mean", "Fractal dimension (mean)", FractalDimension, Mean),
    feature("radius_se", "Radius (se)", Radius, StandardError),
    feature("texture_se", "Texture (se)", Texture, StandardError),
    feature("perimeter_se", "Perimeter (se)", Perimeter, StandardError),
    feature("area_se", "Area (se)", Area, StandardError),
    feature("smoothness_se", "Smoothness (se)", Smoothness, StandardError),
    feature("compactness_se", "Compactness (se)", Compactness, StandardError),
    feature("concavity_se", "Concavity (se)", Concavity, StandardError),
    feature("concave points_se", "Concave points (se)", ConcavePoints, StandardError),
    feature("symmetry_se", "Symmetry (se)", Symmetry, StandardError),
    feature("fractal_dimension_se", "Fractal dimension (se)", FractalDimension, StandardError),
    feature("radius_worst", "Radius (worst)", Radius, Worst),
    feature("texture_worst", "Texture (worst)", Texture, Worst),
    feature("perimeter_worst", "Perimeter (worst)", Perimeter, Worst),
    feature("area_worst", "Area (worst)", Area, Worst),
    feature("smoothness_worst", "Smoothness (worst)", Smoothness, Worst),
    feature("compactness_worst", "Compactness (worst)", Compactness, Worst),
    feature("concavity_worst", "Concavity (worst)", Concavity, Worst),
    feature("concave points_worst", "Concave points (worst)", ConcavePoints, Worst),
    feature("symmetry_worst", "Symmetry (worst)", Symmetry, Worst),
    feature("fractal_dimension_worst", "Fractal dimension (worst)", FractalDimension, Worst),
];

/// Position of a column in [`FEATURES`].
pub fn index_of(column: &str) -> Option<usize> {
    FEATURES.iter().position(|f| f.column == column)
}

/// Position of the feature recording `variant` of `category`.
pub fn index_for(category: Category, variant: Variant) -> usize {
    let v = Variant::ALL.iter().position(|&x| x == variant).unwrap_or(0);
    let c = Category::ALL.iter().position(|&x| x == category).unwrap_or(0);
    v * Category::ALL.len() + c
}

/// Column names in input order, as the artifacts must list them.
pub fn column_names() -> Vec<String> {
    FEATURES.iter().map(|f| f.column.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_grouped_by_variant_then_category() {
        for (i, f) in FEATURES.iter().enumerate() {
            assert_eq!(index_for(f.category, f.variant), i, "{}", f.column);
        }
    }

    #[test]
    fn concave_points_keeps_its_space() {
        let f = &FEATURES[index_for(ConcavePoints, Worst)];
        assert_eq!(f.column, "concave points_worst");
        assert_eq!(ConcavePoints.display_name(), "Concave Points");
        assert_eq!(index_of("concave_points_worst"), None);
    }

    #[test]
    fn columns_are_unique() {
        let mut names = column_names();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), FEATURE_COUNT);
    }
}
