/// Ordered diagnostic labels. Index `i` of every probability sequence the
/// inference service returns denotes `labels[i]`.
#[derive(Debug, PartialEq, Eq)]
pub struct ClassRegistry {
    labels: &'static [&'static str],
}

pub static DIAGNOSTIC_CLASSES: ClassRegistry = ClassRegistry {
    labels: &["Normal", "Osteopenia", "Osteoporosis"],
};

impl ClassRegistry {
    pub fn label(&self, index: usize) -> Option<&'static str> {
        self.labels.get(index).copied()
    }

    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    pub fn class_count(&self) -> usize {
        self.labels.len()
    }
}
