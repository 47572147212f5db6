// src/catalog.rs

use crate::config::ElementConfig;
use crate::errors::CatalogError;
use crate::{AppState, CliArgs};
use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use futures_lite::future;

const EMBEDDED_CATALOG: &str = include_str!("../assets/elements.json");

/// Every element the viewer can show, sorted by atomic number.
#[derive(Resource, Default, Debug, Clone)]
pub struct ElementCatalog {
    elements: Vec<ElementConfig>,
}

impl ElementCatalog {
    /// Parses a JSON array of element descriptors.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Self::from_elements(serde_json::from_str(json)?)
    }

    /// Invalid entries are logged and skipped; duplicates keep the first
    /// occurrence.
    pub fn from_elements(parsed: Vec<ElementConfig>) -> Result<Self, CatalogError> {
        let mut elements: Vec<ElementConfig> = parsed
            .into_iter()
            .filter(|element| match element.validate() {
                Ok(()) => true,
                Err(e) => {
                    error!("Skipping element: {}", e);
                    false
                }
            })
            .collect();
        elements.sort_by_key(|element| element.atomic_number);
        elements.dedup_by_key(|element| element.atomic_number);
        if elements.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { elements })
    }

    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json_str(EMBEDDED_CATALOG)
    }

    pub fn get(&self, atomic_number: u32) -> Option<&ElementConfig> {
        self.elements
            .binary_search_by_key(&atomic_number, |element| element.atomic_number)
            .ok()
            .map(|index| &self.elements[index])
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<&ElementConfig> {
        self.elements
            .iter()
            .find(|element| element.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementConfig> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[derive(Component)]
struct CatalogFetchTask(Task<Result<ElementCatalog, CatalogError>>);

pub struct CatalogPlugin;

impl Plugin for CatalogPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ElementCatalog>()
            .add_systems(Startup, start_catalog_load)
            .add_systems(
                Update,
                poll_catalog_task.run_if(in_state(AppState::LoadingCatalog)),
            );
    }
}

fn elements_url(base_url: &str) -> String {
    format!("{}/elements", base_url.trim_end_matches('/'))
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_remote_catalog(base_url: String) -> Result<ElementCatalog, CatalogError> {
    let elements = reqwest::blocking::get(elements_url(&base_url))?
        .error_for_status()?
        .json::<Vec<ElementConfig>>()?;
    ElementCatalog::from_elements(elements)
}

#[cfg(target_arch = "wasm32")]
async fn fetch_remote_catalog(base_url: String) -> Result<ElementCatalog, CatalogError> {
    let elements = reqwest::get(elements_url(&base_url))
        .await?
        .error_for_status()?
        .json::<Vec<ElementConfig>>()
        .await?;
    ElementCatalog::from_elements(elements)
}

fn embedded_catalog() -> ElementCatalog {
    match ElementCatalog::embedded() {
        Ok(catalog) => {
            info!("Loaded {} elements from the embedded catalog", catalog.len());
            catalog
        }
        Err(e) => {
            error!("Embedded catalog is unusable: {}", e);
            ElementCatalog::default()
        }
    }
}

fn start_catalog_load(
    mut commands: Commands,
    args: Res<CliArgs>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(api_url) = args.api_url.clone() else {
        commands.insert_resource(embedded_catalog());
        next_state.set(AppState::Ready);
        return;
    };
    info!("Fetching element catalog from {}", elements_url(&api_url));
    let task = AsyncComputeTaskPool::get().spawn(fetch_remote_catalog(api_url));
    commands.spawn(CatalogFetchTask(task));
}

fn poll_catalog_task(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut CatalogFetchTask)>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    for (entity, mut task) in &mut tasks {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();
        let catalog = match result {
            Ok(catalog) => {
                info!("Loaded {} elements from the element service", catalog.len());
                catalog
            }
            Err(e) => {
                warn!("{}; falling back to the embedded catalog", e);
                embedded_catalog()
            }
        };
        commands.insert_resource(catalog);
        next_state.set(AppState::Ready);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_is_valid_and_sorted() {
        let catalog = ElementCatalog::embedded().unwrap();
        assert!(!catalog.is_empty());
        let numbers: Vec<u32> = catalog.iter().map(|e| e.atomic_number).collect();
        assert!(numbers.windows(2).all(|pair| pair[0] < pair[1]));
        for element in catalog.iter() {
            assert_eq!(element.protons, element.atomic_number);
            assert_eq!(element.electron_count(), element.protons);
        }
    }

    #[test]
    fn lookups_by_number_and_symbol() {
        let catalog = ElementCatalog::embedded().unwrap();
        assert_eq!(catalog.get(6).map(|e| e.symbol.as_str()), Some("C"));
        assert_eq!(catalog.by_symbol("fe").map(|e| e.atomic_number), Some(26));
        assert!(catalog.get(999).is_none());
        assert!(catalog.by_symbol("Xx").is_none());
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let json = r#"[
            { "atomicNumber": 2, "symbol": "He", "name": "Helium", "protons": 2,
              "neutrons": 2, "electronShells": [{ "electrons": 2, "radius": 2.0 }] },
            { "atomicNumber": 1, "symbol": "H", "name": "Hydrogen", "protons": 1,
              "neutrons": 0, "electronShells": [{ "electrons": 1, "radius": -1.0 }] }
        ]"#;
        let catalog = ElementCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(1).is_none());
        assert!(catalog.get(2).is_some());
    }

    #[test]
    fn empty_and_malformed_documents_fail() {
        assert!(matches!(
            ElementCatalog::from_json_str("[]"),
            Err(CatalogError::Empty)
        ));
        assert!(matches!(
            ElementCatalog::from_json_str("{ not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn decoded_elements_go_through_the_same_validation() {
        let mut elements: Vec<ElementConfig> =
            serde_json::from_str(EMBEDDED_CATALOG).unwrap();
        let total = elements.len();
        elements[0].particle_radius = 0.0;
        let duplicate = elements[1].clone();
        elements.push(duplicate);

        let catalog = ElementCatalog::from_elements(elements).unwrap();
        assert_eq!(catalog.len(), total - 1);
        assert!(catalog.get(1).is_none());
        assert!(matches!(
            ElementCatalog::from_elements(Vec::new()),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn elements_url_tolerates_trailing_slash() {
        assert_eq!(
            elements_url("http://localhost:3000/api/"),
            "http://localhost:3000/api/elements"
        );
    }
}
