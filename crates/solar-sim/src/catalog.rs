//! Celestial body catalog: static visual and descriptive data for every body.
//!
//! The catalog is loaded once at startup and never mutated. Its order is the
//! tour order. Bodies are addressed through [`BodyId`] handles, which only a
//! catalog hands out, so a selection can never point outside it.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// RON source of the compiled-in solar system.
const BUILTIN_CATALOG: &str = include_str!("../assets/solar_system.ron");

/// Errors raised while loading or validating a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The source is not valid RON for a list of bodies.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The catalog has no bodies at all.
    #[error("catalog is empty")]
    Empty,

    /// Two bodies share an identifier.
    #[error("duplicate body id `{0}`")]
    DuplicateId(String),

    /// Exactly one body must sit at distance 0.
    #[error("expected exactly one central star at distance 0, found {0}")]
    StarCount(usize),

    /// A body has a negative orbital distance or visual radius.
    #[error("body `{id}` has negative {field}: {value}")]
    Negative {
        id: String,
        field: &'static str,
        value: f64,
    },

    /// A numeric field is NaN or infinite.
    #[error("body `{id}` has non-finite {field}: {value}")]
    NonFinite {
        id: String,
        field: &'static str,
        value: f64,
    },

    /// The body at distance 0 must be categorized as a star, and only it.
    #[error("body `{id}` at distance {distance} is categorized as {category}")]
    StarCategory {
        id: String,
        distance: f64,
        category: BodyCategory,
    },
}

/// Broad classification shown in the info panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyCategory {
    Star,
    TerrestrialPlanet,
    GasGiant,
    IceGiant,
}

impl fmt::Display for BodyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BodyCategory::Star => "Star",
            BodyCategory::TerrestrialPlanet => "Terrestrial Planet",
            BodyCategory::GasGiant => "Gas Giant",
            BodyCategory::IceGiant => "Ice Giant",
        };
        f.write_str(name)
    }
}

/// Fixed-shape attribute record. Display strings only, never computed with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyDetails {
    pub radius: String,
    pub mass: String,
    pub gravity: String,
    pub day_length: String,
    pub orbital_period: String,
    pub temperature: String,
    pub moons: u32,
    pub atmosphere: String,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    /// Unique identifier, e.g. `"earth"`.
    pub id: String,
    /// Display name.
    pub name: String,
    pub category: BodyCategory,
    #[serde(default)]
    pub description: String,
    /// `#RRGGBB` hex color.
    #[serde(default = "default_color")]
    pub color: String,
    /// Visual radius in scene units.
    pub radius: f64,
    /// Orbital distance from the star. 0 for the star itself.
    pub distance: f64,
    /// Angular speed in radians per second.
    pub speed: f64,
    #[serde(default)]
    pub details: BodyDetails,
}

fn default_color() -> String {
    "#FFFFFF".to_string()
}

impl CelestialBody {
    /// Whether this body is the central star.
    pub fn is_star(&self) -> bool {
        self.distance == 0.0
    }

    /// Linear RGB in `[0, 1]` parsed from [`color`](Self::color).
    ///
    /// Malformed colors fall back to white.
    pub fn rgb(&self) -> [f32; 3] {
        parse_hex_color(&self.color).unwrap_or([1.0, 1.0, 1.0])
    }
}

fn parse_hex_color(hex: &str) -> Option<[f32; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Handle to a body in a [`Catalog`]. Only the catalog creates these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(usize);

impl BodyId {
    /// Position of the body in catalog (tour) order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Validated, ordered list of bodies.
#[derive(Debug, Clone)]
pub struct Catalog {
    bodies: Vec<CelestialBody>,
}

impl Catalog {
    /// Validate `bodies` and build a catalog in the given order.
    pub fn new(bodies: Vec<CelestialBody>) -> Result<Self, CatalogError> {
        if bodies.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(bodies.len());
        for body in &bodies {
            if !seen.insert(body.id.as_str()) {
                return Err(CatalogError::DuplicateId(body.id.clone()));
            }
            let fields = [
                ("distance", body.distance),
                ("radius", body.radius),
                ("speed", body.speed),
            ];
            for (field, value) in fields {
                if !value.is_finite() {
                    return Err(CatalogError::NonFinite {
                        id: body.id.clone(),
                        field,
                        value,
                    });
                }
            }
            for (field, value) in [("distance", body.distance), ("radius", body.radius)] {
                if value < 0.0 {
                    return Err(CatalogError::Negative {
                        id: body.id.clone(),
                        field,
                        value,
                    });
                }
            }
            if body.is_star() != (body.category == BodyCategory::Star) {
                return Err(CatalogError::StarCategory {
                    id: body.id.clone(),
                    distance: body.distance,
                    category: body.category,
                });
            }
        }

        let stars = bodies.iter().filter(|b| b.is_star()).count();
        if stars != 1 {
            return Err(CatalogError::StarCount(stars));
        }

        Ok(Self { bodies })
    }

    /// Parse a RON list of bodies and validate it.
    pub fn from_ron(source: &str) -> Result<Self, CatalogError> {
        let bodies: Vec<CelestialBody> = ron::from_str(source)?;
        Self::new(bodies)
    }

    /// The Sun and the eight planets.
    pub fn builtin() -> Result<Self, CatalogError> {
        let catalog = Self::from_ron(BUILTIN_CATALOG)?;
        tracing::debug!("Loaded built-in catalog with {} bodies", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Always false for a validated catalog.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: BodyId) -> &CelestialBody {
        &self.bodies[id.0]
    }

    /// Handle for the body at `index`, if in range.
    pub fn id_at(&self, index: usize) -> Option<BodyId> {
        (index < self.bodies.len()).then_some(BodyId(index))
    }

    /// First body in tour order.
    pub fn first(&self) -> BodyId {
        BodyId(0)
    }

    /// Look a body up by its string identifier.
    pub fn find(&self, id: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.id == id).map(BodyId)
    }

    /// The central star.
    pub fn star(&self) -> BodyId {
        // Validation guarantees exactly one star.
        BodyId(self.bodies.iter().position(|b| b.is_star()).unwrap_or(0))
    }

    pub fn ids(&self) -> impl ExactSizeIterator<Item = BodyId> + '_ {
        (0..self.bodies.len()).map(BodyId)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (BodyId, &CelestialBody)> + '_ {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(id: &str, distance: f64) -> CelestialBody {
        CelestialBody {
            id: id.to_string(),
            name: id.to_string(),
            category: if distance == 0.0 {
                BodyCategory::Star
            } else {
                BodyCategory::TerrestrialPlanet
            },
            description: String::new(),
            color: default_color(),
            radius: 1.0,
            distance,
            speed: 0.1,
            details: BodyDetails::default(),
        }
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.get(catalog.first()).name, "Sun");
        assert_eq!(catalog.star(), catalog.first());
        let neptune = catalog.find("neptune").unwrap();
        assert_eq!(neptune.index(), 8);
        assert_eq!(catalog.get(neptune).category, BodyCategory::IceGiant);
    }

    #[test]
    fn test_builtin_planets_ordered_outward() {
        let catalog = Catalog::builtin().unwrap();
        let distances: Vec<f64> = catalog.bodies().iter().map(|b| b.distance).collect();
        assert!(distances.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(catalog.get(catalog.find("earth").unwrap()).details.moons, 1);
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(Catalog::new(Vec::new()), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = Catalog::new(vec![body("sun", 0.0), body("a", 1.0), body("a", 2.0)]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(ref id) if id == "a"));
    }

    #[test]
    fn test_star_count_enforced() {
        let none = Catalog::new(vec![body("a", 1.0)]).unwrap_err();
        assert!(matches!(none, CatalogError::StarCount(0)));
        let two = Catalog::new(vec![body("a", 0.0), body("b", 0.0)]).unwrap_err();
        assert!(matches!(two, CatalogError::StarCount(2)));
    }

    #[test]
    fn test_negative_distance_rejected() {
        let err = Catalog::new(vec![body("sun", 0.0), body("x", -3.0)]).unwrap_err();
        assert!(matches!(err, CatalogError::Negative { field: "distance", .. }));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let mut fast = body("x", 4.0);
        fast.speed = f64::NAN;
        let err = Catalog::new(vec![body("sun", 0.0), fast]).unwrap_err();
        assert!(matches!(err, CatalogError::NonFinite { field: "speed", ref id, .. } if id == "x"));

        let mut far = body("y", 4.0);
        far.distance = f64::INFINITY;
        let err = Catalog::new(vec![body("sun", 0.0), far]).unwrap_err();
        assert!(matches!(err, CatalogError::NonFinite { field: "distance", .. }));

        let mut huge = body("z", 4.0);
        huge.radius = f64::NEG_INFINITY;
        let err = Catalog::new(vec![body("sun", 0.0), huge]).unwrap_err();
        assert!(matches!(err, CatalogError::NonFinite { field: "radius", .. }));
    }

    #[test]
    fn test_central_body_must_be_star_category() {
        let mut sun = body("sun", 0.0);
        sun.category = BodyCategory::GasGiant;
        let err = Catalog::new(vec![sun, body("a", 1.0)]).unwrap_err();
        assert!(matches!(err, CatalogError::StarCategory { ref id, .. } if id == "sun"));
    }

    #[test]
    fn test_orbiting_body_cannot_be_star_category() {
        let mut rogue = body("rogue", 7.0);
        rogue.category = BodyCategory::Star;
        let err = Catalog::new(vec![body("sun", 0.0), rogue]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::StarCategory { ref id, category: BodyCategory::Star, .. } if id == "rogue"
        ));
    }

    #[test]
    fn test_optional_fields_default() {
        let src = r#"[(id: "sun", name: "Sun", category: Star, radius: 2.0, distance: 0.0, speed: 0.0)]"#;
        let catalog = Catalog::from_ron(src).unwrap();
        let sun = catalog.get(catalog.first());
        assert_eq!(sun.color, "#FFFFFF");
        assert_eq!(sun.details, BodyDetails::default());
    }

    #[test]
    fn test_invalid_ron_is_parse_error() {
        assert!(matches!(Catalog::from_ron("[(id: )]"), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_id_at_bounds() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.id_at(8).is_some());
        assert!(catalog.id_at(9).is_none());
    }

    #[test]
    fn test_hex_color_parsing() {
        let mut b = body("sun", 0.0);
        b.color = "#FF8000".to_string();
        let [r, g, bl] = b.rgb();
        assert!((r - 1.0).abs() < 1e-6);
        assert!((g - 128.0 / 255.0).abs() < 1e-6);
        assert!(bl.abs() < 1e-6);

        b.color = "orange".to_string();
        assert_eq!(b.rgb(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(BodyCategory::TerrestrialPlanet.to_string(), "Terrestrial Planet");
        assert_eq!(BodyCategory::IceGiant.to_string(), "Ice Giant");
    }
}
