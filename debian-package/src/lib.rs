//! A model of Debian source and binary packages, with conversion from and to
//! `debian/changelog` and `debian/control` files.
//!
//! # Examples
//!
//! ```rust
//! use debian_package::SourcePackage;
//! use debian_package::fields::Urgency;
//!
//! let control = r#"Source: hello
//! Maintainer: Santiago Vila <sanvila@debian.org>
//! Build-Depends: debhelper (>= 9)
//! Standards-Version: 3.9.5
//! "#;
//!
//! let changelog = r#"hello (2.10-1) unstable; urgency=medium
//!
//!   * New upstream release.
//!
//!  -- Santiago Vila <sanvila@debian.org>  Sun, 16 Nov 2014 19:17:07 +0100
//! "#;
//!
//! let mut package = debian_package::control::parse_control(control.as_bytes()).unwrap();
//! package.import_changelog(changelog.as_bytes()).unwrap();
//!
//! let change = &package.changelog()[0];
//! assert_eq!(change.urgency, Urgency::Medium);
//! assert_eq!(change.maintainer.name, "Santiago Vila");
//! assert_eq!(change.timezone, 60);
//! ```

pub mod changelog;
pub mod control;
pub mod error;
pub mod fields;
pub mod package;
pub mod person;
pub mod relations;

pub use changelog::Change;
pub use error::{ChangelogError, ControlError};
pub use package::{AdditionalField, BinaryPackage, SourcePackage, Vcs};
pub use person::Person;
pub use relations::Relation;
