//! PyMOL-RS Settings
//!
//! Typed settings for the command language: the definition table, name
//! resolution (index, full name or unique abbreviation), text conversion
//! and a scoped store.
//!
//! ```text
//! global < object < object-state
//! ```
//!
//! # Example
//!
//! ```rust
//! use pymol_settings::{id, SettingScope, SettingStore};
//!
//! let store = SettingStore::new();
//! store.set_text("sphere_s", "0.5", &SettingScope::Global).unwrap();
//! assert_eq!(store.get_float(id::sphere_scale), 0.5);
//! ```

pub mod color;
mod convert;
mod definitions;
mod error;
mod setting;
mod shortcut;
mod store;

pub use convert::{format_value, parse_bool, parse_float3, parse_value};
pub use definitions::{
    get_setting, get_setting_id, resolve_setting, setting_names, LEGACY_NAMES, SETTINGS,
};
pub use error::SettingError;
pub use setting::{DefaultValue, Setting, SettingLevel, SettingType, SettingValue};
pub use shortcut::{Lookup, Shortcut};
pub use store::{SettingScope, SettingStore};

/// Setting ID constants
pub mod id {
    pub use crate::definitions::id::*;
}

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::definitions::id;
    pub use crate::{
        Setting, SettingError, SettingLevel, SettingScope, SettingStore, SettingType,
        SettingValue,
    };
}
