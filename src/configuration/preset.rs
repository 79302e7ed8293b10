use crate::accounting;
use crate::catalog::Catalog;

#[derive(Clone, Debug, PartialEq)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub item_ids: Vec<String>,
}

impl Preset {
    pub fn new() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            item_ids: Vec::new(),
        }
    }

    /// Gets the combined size of the preset in GB. Ids the catalog doesn't
    /// know count as zero.
    pub fn size_gb(&self, catalog: &Catalog) -> f64 {
        accounting::total_size(&self.item_ids, catalog)
    }

    /// Short description of the preset content, e.g. `Xcode +2 more`.
    pub fn summary(&self, catalog: &Catalog) -> String {
        let first = match self.item_ids.first() {
            Some(id) => match catalog.get(id) {
                Some(item) => item.name.clone(),
                None => id.clone(),
            },
            None => return String::new(),
        };

        if self.item_ids.len() > 1 {
            format!("{} +{} more", first, self.item_ids.len() - 1)
        } else {
            first
        }
    }
}
