//! Source and binary package records.
//!
//! Records start out empty and are filled in field by field while parsing. Every
//! optional field reads as `None` until it has been set, which keeps "not present
//! in the file" apart from "present with a default-looking value".
use crate::changelog::Change;
use crate::fields::{Priority, StandardsVersion};
use crate::person::Person;
use crate::relations::Relation;

/// Accessors for optional string fields.
macro_rules! string_fields {
    ($($(#[$meta:meta])* $field:ident, $setter:ident, $clearer:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $field(&self) -> Option<&str> {
                self.$field.as_deref()
            }

            #[doc = concat!("Set the `", stringify!($field), "` field")]
            pub fn $setter(&mut self, value: &str) {
                self.$field = Some(value.to_string());
            }

            #[doc = concat!("Unset the `", stringify!($field), "` field")]
            pub fn $clearer(&mut self) {
                self.$field = None;
            }
        )*
    };
}

/// Accessors for optional fields holding small `Copy` values.
macro_rules! value_fields {
    ($($(#[$meta:meta])* $field:ident: $ty:ty, $setter:ident, $clearer:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $field(&self) -> Option<$ty> {
                self.$field
            }

            #[doc = concat!("Set the `", stringify!($field), "` field")]
            pub fn $setter(&mut self, value: $ty) {
                self.$field = Some(value);
            }

            #[doc = concat!("Unset the `", stringify!($field), "` field")]
            pub fn $clearer(&mut self) {
                self.$field = None;
            }
        )*
    };
}

/// Accessors for repeated fields. Changes made through the `_mut` accessor are
/// visible on subsequent reads.
macro_rules! repeated_fields {
    ($($(#[$meta:meta])* $field:ident: $ty:ty, $mutator:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $field(&self) -> &[$ty] {
                &self.$field
            }

            #[doc = concat!("Mutable access to the `", stringify!($field), "` field")]
            pub fn $mutator(&mut self) -> &mut Vec<$ty> {
                &mut self.$field
            }
        )*
    };
}

/// Accessors for the maintainer sub-record, shared by both package kinds.
macro_rules! maintainer_field {
    () => {
        /// The maintainer of the package.
        pub fn maintainer(&self) -> Option<&Person> {
            self.maintainer.as_ref()
        }

        /// Set the maintainer of the package
        pub fn set_maintainer(&mut self, maintainer: Person) {
            self.maintainer = Some(maintainer);
        }

        /// Mutable access to the maintainer, creating an empty one if unset.
        pub fn maintainer_mut(&mut self) -> &mut Person {
            self.maintainer.get_or_insert_with(Person::default)
        }

        /// Unset the maintainer
        pub fn clear_maintainer(&mut self) {
            self.maintainer = None;
        }
    };
}

/// A control field without a dedicated slot in the package record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdditionalField {
    /// Field name, as written in the control file
    pub key: String,

    /// Field value
    pub value: String,
}

impl AdditionalField {
    /// Create a new additional field
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// A `Vcs-*` field, kept as opaque passthrough data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vcs {
    /// The part of the field name after `Vcs-`, e.g. `Git`
    pub kind: String,

    /// Field value, usually a URL
    pub value: String,
}

impl Vcs {
    /// The control field name for this entry
    pub fn field_name(&self) -> String {
        format!("Vcs-{}", self.kind)
    }
}

/// A Debian source package, as described in chapter 4 of the Debian Policy Manual.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourcePackage {
    name: Option<String>,
    section: Option<String>,
    priority: Option<Priority>,
    homepage: Option<String>,
    vcs_browser: Option<String>,
    maintainer: Option<Person>,
    uploaders: Vec<Person>,
    build_depends: Vec<Relation>,
    build_depends_indep: Vec<Relation>,
    build_conflicts: Vec<Relation>,
    build_conflicts_indep: Vec<Relation>,
    standards_version: Option<StandardsVersion>,
    changelog: Vec<Change>,
    binary_packages: Vec<BinaryPackage>,
    vcs: Vec<Vcs>,
    additional_fields: Vec<AdditionalField>,
}

impl SourcePackage {
    /// Create an empty source package
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source package with just a name
    pub fn with_name(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Whether the package has everything required for export.
    pub fn is_valid(&self) -> bool {
        self.name.is_some()
    }

    string_fields! {
        /// The name of the source package.
        name, set_name, clear_name;
        /// The section of the archive the package belongs to.
        section, set_section, clear_section;
        /// The upstream homepage.
        homepage, set_homepage, clear_homepage;
        /// The `Vcs-Browser` URL.
        vcs_browser, set_vcs_browser, clear_vcs_browser;
    }

    value_fields! {
        /// The default priority of the packages built from this source package.
        priority: Priority, set_priority, clear_priority;
        /// The version of Debian Policy the package complies with.
        standards_version: StandardsVersion, set_standards_version, clear_standards_version;
    }

    maintainer_field!();

    repeated_fields! {
        /// Co-maintainers allowed to upload the package.
        uploaders: Person, uploaders_mut;
        /// Build dependencies.
        build_depends: Relation, build_depends_mut;
        /// Build dependencies needed for the architecture-independent packages only.
        build_depends_indep: Relation, build_depends_indep_mut;
        /// Packages that must not be installed while building.
        build_conflicts: Relation, build_conflicts_mut;
        /// Build conflicts for the architecture-independent packages only.
        build_conflicts_indep: Relation, build_conflicts_indep_mut;
        /// Changelog entries, in the reverse of their order in the changelog file.
        changelog: Change, changelog_mut;
        /// Binary packages built from this source package.
        binary_packages: BinaryPackage, binary_packages_mut;
        /// `Vcs-*` fields other than `Vcs-Browser`.
        vcs: Vcs, vcs_mut;
        /// Fields without a dedicated slot, in the order they were read.
        additional_fields: AdditionalField, additional_fields_mut;
    }

    /// The homepage, parsed as a URL.
    pub fn homepage_url(&self) -> Option<url::Url> {
        self.homepage.as_deref().and_then(|s| s.parse().ok())
    }

    /// Look up an additional field by name.
    pub fn additional_field(&self, key: &str) -> Option<&str> {
        self.additional_fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
    }
}

/// A Debian binary package, as described in chapter 3 of the Debian Policy Manual.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryPackage {
    name: Option<String>,
    section: Option<String>,
    priority: Option<Priority>,
    homepage: Option<String>,
    maintainer: Option<Person>,
    architecture: Option<String>,
    version: Option<String>,
    essential: Option<bool>,
    provides: Option<String>,
    description: Option<String>,
    package_type: Option<String>,
    depends: Vec<Relation>,
    recommends: Vec<Relation>,
    suggests: Vec<Relation>,
    enhances: Vec<Relation>,
    pre_depends: Vec<Relation>,
    conflicts: Vec<Relation>,
    breaks: Vec<Relation>,
    replaces: Vec<Relation>,
    additional_fields: Vec<AdditionalField>,
}

impl BinaryPackage {
    /// Create an empty binary package
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a binary package with just a name
    pub fn with_name(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    string_fields! {
        /// The name of the binary package.
        name, set_name, clear_name;
        /// The section of the archive the package belongs to.
        section, set_section, clear_section;
        /// The upstream homepage.
        homepage, set_homepage, clear_homepage;
        /// The architecture, e.g. `any` or `all`.
        architecture, set_architecture, clear_architecture;
        /// The version of the package.
        version, set_version, clear_version;
        /// Virtual packages provided by this package.
        provides, set_provides, clear_provides;
        /// The description: synopsis, then the long description on further lines.
        description, set_description, clear_description;
        /// The package type, e.g. `udeb`.
        package_type, set_package_type, clear_package_type;
    }

    value_fields! {
        /// The priority of the package.
        priority: Priority, set_priority, clear_priority;
        /// Whether the package is essential.
        essential: bool, set_essential, clear_essential;
    }

    maintainer_field!();

    repeated_fields! {
        /// Dependencies
        depends: Relation, depends_mut;
        /// Recommendations
        recommends: Relation, recommends_mut;
        /// Suggestions
        suggests: Relation, suggests_mut;
        /// Packages this package enhances
        enhances: Relation, enhances_mut;
        /// Pre-dependencies
        pre_depends: Relation, pre_depends_mut;
        /// Conflicts
        conflicts: Relation, conflicts_mut;
        /// Breaks
        breaks: Relation, breaks_mut;
        /// Packages this package replaces
        replaces: Relation, replaces_mut;
        /// Fields without a dedicated slot, in the order they were read.
        additional_fields: AdditionalField, additional_fields_mut;
    }

    /// The version, parsed as a Debian version.
    pub fn parsed_version(&self) -> Option<debversion::Version> {
        self.version.as_deref().and_then(|v| v.parse().ok())
    }

    /// The homepage, parsed as a URL.
    pub fn homepage_url(&self) -> Option<url::Url> {
        self.homepage.as_deref().and_then(|s| s.parse().ok())
    }
}
