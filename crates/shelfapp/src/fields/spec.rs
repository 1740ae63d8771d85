//! Field specifications.
//!
//! Each record kind declares a `&'static [FieldSpec]` registry. The registry is
//! the single source of truth for which fields the text query scans and which
//! fields can be used as facets.

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text (e.g., `title`, `member_email`)
    Text,

    /// Categorical value drawn from a closed set present in the data
    /// (e.g., `status`, `category`, `fine_type`)
    Category,

    /// Integer or decimal quantity (e.g., `downloads`, `fine_amount`)
    Number,

    /// Boolean flag (e.g., `is_featured`)
    Flag,

    /// Optional calendar date (e.g., `return_date`)
    Date,
}

/// Specification for a single record field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Field name as used by filters and the CLI (e.g., "status")
    pub name: &'static str,

    /// The kind of value this field holds
    pub kind: FieldKind,

    /// Whether the free-text query scans this field
    pub searchable: bool,

    /// Whether this field can be used as a categorical facet
    pub facet: bool,

    /// A value present in the data that is never offered as a facet option
    ///
    /// Fines carry a `fine_type` of "None" for returns without a fine; it is
    /// not a meaningful filter choice.
    pub omit_option: Option<&'static str>,
}

impl FieldSpec {
    /// Create a new field spec with all flags off.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            searchable: false,
            facet: false,
            omit_option: None,
        }
    }

    /// Set the searchable flag.
    pub const fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Set the facet flag.
    pub const fn facet(mut self) -> Self {
        self.facet = true;
        self
    }

    /// Exclude one value from the facet's options.
    pub const fn omit_option(mut self, value: &'static str) -> Self {
        self.omit_option = Some(value);
        self
    }
}

/// Look up a field spec by name.
pub fn find_spec(specs: &'static [FieldSpec], name: &str) -> Option<&'static FieldSpec> {
    specs.iter().find(|spec| spec.name == name)
}

/// Names of the fields the text query scans, in declaration order.
pub fn searchable_fields(specs: &'static [FieldSpec]) -> impl Iterator<Item = &'static str> {
    specs
        .iter()
        .filter(|spec| spec.searchable)
        .map(|spec| spec.name)
}

/// Names of the fields usable as facets, in declaration order.
pub fn facet_fields(specs: &'static [FieldSpec]) -> impl Iterator<Item = &'static str> {
    specs.iter().filter(|spec| spec.facet).map(|spec| spec.name)
}
