//! Flavor wheel builder.
//!
//! Folds flat `Basic`/`Middle`/`Final` taxonomy rows into a three-level tree
//! shaped for sunburst charts:
//!
//! ```
//! use flavorwheel::domain::{HierarchyBuilder, Row};
//!
//! let tree = HierarchyBuilder::build(vec![
//!     Row::new("Fruity", "Berry", "Blackberry"),
//!     Row::new("Fruity", "Berry", "Blackberry"),
//!     Row::new("Floral", "", ""),
//! ]);
//! assert_eq!(tree.name, "flavors");
//! assert_eq!(tree.children.len(), 2);
//! assert_eq!(tree.children[0].children[0].children.len(), 1);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
