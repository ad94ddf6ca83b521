//! Text shown to the user: the info panel, the tour overlay and the status
//! line the HUD puts in the window title.

use std::fmt::Write as _;

use crate::catalog::{BodyDetails, CelestialBody};
use crate::explorer::ExplorerState;
use crate::view::ViewMode;

/// Contents of the info panel for one body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPanel {
    pub name: String,
    pub category: String,
    /// Three-letter code, e.g. `EAR`.
    pub code: String,
    pub description: String,
    /// `(label, value)` rows in display order.
    pub attributes: Vec<(String, String)>,
}

impl InfoPanel {
    pub fn for_body(body: &CelestialBody) -> Self {
        Self {
            name: body.name.clone(),
            category: body.category.to_string(),
            code: short_code(&body.name),
            description: body.description.clone(),
            attributes: attribute_rows(&body.details),
        }
    }
}

impl std::fmt::Display for InfoPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} [{}] ({})", self.name, self.code, self.category)?;
        writeln!(f, "{}", self.description)?;
        for (label, value) in &self.attributes {
            writeln!(f, "  {label}: {value}")?;
        }
        Ok(())
    }
}

/// First three letters of `name`, upper-cased.
pub fn short_code(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .take(3)
        .flat_map(char::to_uppercase)
        .collect()
}

/// `day_length` -> `Day Length`.
pub fn attribute_label(field: &str) -> String {
    field
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn attribute_rows(details: &BodyDetails) -> Vec<(String, String)> {
    [
        ("radius", details.radius.clone()),
        ("mass", details.mass.clone()),
        ("gravity", details.gravity.clone()),
        ("day_length", details.day_length.clone()),
        ("orbital_period", details.orbital_period.clone()),
        ("temperature", details.temperature.clone()),
        ("moons", details.moons.to_string()),
        ("atmosphere", details.atmosphere.clone()),
    ]
    .into_iter()
    .map(|(field, value)| (attribute_label(field), value))
    .collect()
}

/// "Exploring <name>" headline of the tour overlay.
pub fn tour_headline(body: &CelestialBody) -> String {
    format!("Exploring {}", body.name)
}

/// One-line summary for the window title.
pub fn status_line(mode: ViewMode, explorer: Option<&ExplorerState>, loading: f32) -> String {
    let mut line = String::new();
    match mode {
        ViewMode::Loading => {
            let _ = write!(line, "Loading {:.0}%", loading.clamp(0.0, 1.0) * 100.0);
        }
        ViewMode::Landing => line.push_str("Welcome - press Enter to explore"),
        ViewMode::Simulation => {
            let Some(explorer) = explorer else {
                return mode.to_string();
            };
            let catalog = explorer.catalog();
            match (explorer.tour().index(), explorer.selection()) {
                (Some(index), Some(id)) => {
                    let body = catalog.get(id);
                    let _ = write!(
                        line,
                        "{} ({}/{})",
                        tour_headline(body),
                        index + 1,
                        catalog.len()
                    );
                    if let Some(progress) = explorer.tour_progress() {
                        let _ = write!(line, " {:.0}%", progress * 100.0);
                    }
                }
                (_, Some(id)) => {
                    let body = catalog.get(id);
                    let _ = write!(line, "{} - {}", body.name, body.category);
                }
                (_, None) => line.push_str("Click a body or press T for a tour"),
            }
        }
    }
    line
}
