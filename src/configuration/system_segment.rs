use crate::size::SizeValue;

/// Space the system claims before any user software is installed
/// (operating system, pre-installed apps, headroom for upgrades).
#[derive(Clone, Debug, PartialEq)]
pub struct SystemSegment {
    pub id: String,
    pub label: String,
    pub size: SizeValue,
}

impl SystemSegment {
    pub fn new<S: Into<String>>(id: S, label: S, size: SizeValue) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            size,
        }
    }
}
