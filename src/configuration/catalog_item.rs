use crate::size::SizeValue;

#[derive(Clone, Debug, PartialEq)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub size: SizeValue,
    pub category: String,
}

impl CatalogItem {
    pub fn new<S: Into<String>>(id: S, name: S, size: SizeValue, category: S) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size,
            category: category.into(),
        }
    }

    pub fn size_gb(&self) -> f64 {
        self.size.to_canonical()
    }
}
