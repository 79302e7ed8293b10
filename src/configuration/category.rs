pub const ALL: &str = "all";
pub const OTHERS: &str = "others";

#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    pub id: String,
    pub order: i32,
}

impl Category {
    pub fn new() -> Self {
        Self {
            id: String::new(),
            order: 0,
        }
    }

    pub fn with_id<S: Into<String>>(id: S, order: i32) -> Self {
        Self {
            id: id.into(),
            order,
        }
    }

    pub fn is_predefined(&self) -> bool {
        self.id != ALL && self.id != OTHERS
    }
}
