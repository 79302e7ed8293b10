use log::{debug, info};
use regex::Regex;

use crate::configuration::catalog_item::CatalogItem;
use crate::configuration::category::{self, Category};
use crate::error::{PlannerError, Result};
use crate::size::SizeValue;

/// The software that can be selected, together with the categories it is
/// grouped into.
#[derive(Clone, Debug)]
pub struct Catalog {
    categories: Vec<Category>,
    items: Vec<CatalogItem>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>, items: Vec<CatalogItem>) -> Result<Catalog> {
        let mut catalog = Catalog::empty();

        for category in categories {
            if catalog.categories.iter().any(|c| c.id == category.id) {
                return Err(PlannerError::DuplicateId {
                    kind: "category",
                    id: category.id,
                });
            }
            catalog.categories.push(category);
        }
        for item in items {
            catalog.push(item)?;
        }

        Ok(catalog)
    }

    pub fn empty() -> Catalog {
        Catalog {
            categories: Vec::new(),
            items: Vec::new(),
        }
    }

    fn push(&mut self, item: CatalogItem) -> Result<()> {
        if self.get(&item.id).is_some() {
            return Err(PlannerError::DuplicateId {
                kind: "software",
                id: item.id,
            });
        }
        self.items.push(item);

        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Gets the categories sorted by their order, led by the `all` category.
    pub fn categories(&self) -> Vec<Category> {
        let mut sorted = self.categories.clone();
        sorted.sort_by_key(|c| c.order);

        if !sorted.iter().any(|c| c.id == category::ALL) {
            sorted.insert(0, Category::with_id(category::ALL, 0));
        }

        sorted
    }

    /// Builds the id of a custom item from its name: `Final Cut Pro` becomes
    /// `final-cut-pro`.
    pub fn slug(name: &str) -> String {
        lazy_static! {
            static ref REGEX_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
        }

        REGEX_WHITESPACE
            .replace_all(name.trim().to_lowercase().as_str(), "-")
            .into_owned()
    }

    /// Appends an item the user typed in. It lands in the `others` category.
    pub fn add_custom(&mut self, name: &str, size: SizeValue) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlannerError::InvalidItem(String::from(
                "custom software needs a name",
            )));
        }

        let id = Catalog::slug(name);
        self.push(CatalogItem::new(
            id.clone(),
            name.to_string(),
            size,
            category::OTHERS.to_string(),
        ))?;
        info!("added custom software '{}' ({}) as '{}'", name, size, id);

        Ok(id)
    }

    fn is_predefined_category(&self, id: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.is_predefined() && c.id == id)
    }

    /// Called when an item leaves the selection. Items that don't belong to
    /// one of the data categories are moved to `others`; returns whether the
    /// category changed.
    pub fn release(&mut self, id: &str) -> bool {
        let predefined = match self.get(id) {
            Some(item) => self.is_predefined_category(&item.category),
            None => return false,
        };
        if predefined {
            return false;
        }

        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) if item.category != category::OTHERS => {
                debug!(
                    "moving '{}' from category '{}' to '{}'",
                    id,
                    item.category,
                    category::OTHERS
                );
                item.category = category::OTHERS.to_string();
                true
            }
            _ => false,
        }
    }

    /// Items that can still be picked: not selected, name containing the
    /// query (case-insensitive) and in the given category. A non-empty query
    /// searches all categories.
    pub fn available(
        &self,
        selection: &[String],
        query: &str,
        category: Option<&str>,
    ) -> Vec<&CatalogItem> {
        let query = query.trim().to_lowercase();
        let category = match category {
            Some(c) if query.is_empty() && !c.eq_ignore_ascii_case(category::ALL) => {
                Some(c.to_lowercase())
            }
            _ => None,
        };

        self.items
            .iter()
            .filter(|item| !selection.contains(&item.id))
            .filter(|item| item.name.to_lowercase().contains(&query))
            .filter(|item| match &category {
                Some(c) => item.category.to_lowercase() == *c,
                None => true,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                Category::with_id("productivity", 2),
                Category::with_id("development", 1),
                Category::with_id(category::OTHERS, 9),
            ],
            vec![
                CatalogItem::new(
                    "xcode",
                    "Xcode",
                    "35 GB".parse().unwrap(),
                    "development",
                ),
                CatalogItem::new(
                    "vscode",
                    "Visual Studio Code",
                    "350 MB".parse().unwrap(),
                    "development",
                ),
                CatalogItem::new(
                    "office",
                    "Microsoft Office",
                    "10 GB".parse().unwrap(),
                    "productivity",
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_ids() {
        let item = CatalogItem::new("xcode", "Xcode", "35 GB".parse().unwrap(), "development");
        match Catalog::new(Vec::new(), vec![item.clone(), item]) {
            Err(PlannerError::DuplicateId { kind, id }) => {
                assert_eq!(kind, "software");
                assert_eq!(id, "xcode");
            }
            other => panic!("expected DuplicateId, got {:?}", other),
        }
    }

    #[test]
    fn sorts_categories_and_prepends_all() {
        let ids: Vec<String> = catalog().categories().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["all", "development", "productivity", "others"]);
    }

    #[test]
    fn slugs_custom_names() {
        assert_eq!(Catalog::slug("Final Cut  Pro"), "final-cut-pro");
        assert_eq!(Catalog::slug("  Blender "), "blender");
    }

    #[test]
    fn adds_custom_items_to_others() {
        let mut catalog = catalog();
        let id = catalog
            .add_custom("Final Cut Pro", "4.5 GB".parse().unwrap())
            .unwrap();
        assert_eq!(id, "final-cut-pro");
        let item = catalog.get(&id).unwrap();
        assert_eq!(item.category, category::OTHERS);
        assert_eq!(item.size_gb(), 4.5);

        assert!(matches!(
            catalog.add_custom("final cut pro", "1 GB".parse().unwrap()),
            Err(PlannerError::DuplicateId { .. })
        ));
        assert!(matches!(
            catalog.add_custom("   ", "1 GB".parse().unwrap()),
            Err(PlannerError::InvalidItem(_))
        ));
    }

    #[test]
    fn release_moves_unknown_categories_to_others() {
        let mut catalog = Catalog::new(
            vec![Category::with_id("development", 1)],
            vec![
                CatalogItem::new("xcode", "Xcode", "35 GB".parse().unwrap(), "development"),
                CatalogItem::new("blender", "Blender", "1 GB".parse().unwrap(), "3d"),
            ],
        )
        .unwrap();

        assert!(!catalog.release("xcode"));
        assert_eq!(catalog.get("xcode").unwrap().category, "development");
        assert!(catalog.release("blender"));
        assert_eq!(catalog.get("blender").unwrap().category, category::OTHERS);
        assert!(!catalog.release("blender"));
        assert!(!catalog.release("missing"));
    }

    #[test]
    fn filters_available_items() {
        let catalog = catalog();
        let selection = vec![String::from("xcode")];

        let ids = |items: Vec<&CatalogItem>| -> Vec<String> {
            items.into_iter().map(|i| i.id.clone()).collect()
        };

        assert_eq!(ids(catalog.available(&selection, "", None)), vec!["vscode", "office"]);
        assert_eq!(
            ids(catalog.available(&selection, "", Some("Development"))),
            vec!["vscode"]
        );
        assert_eq!(
            ids(catalog.available(&selection, "", Some("all"))),
            vec!["vscode", "office"]
        );
        assert_eq!(
            ids(catalog.available(&selection, "OFFICE", Some("development"))),
            vec!["office"]
        );
        assert!(catalog.available(&selection, "xco", None).is_empty());
    }
}
